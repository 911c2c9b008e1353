//! Key and nonce material for out-of-band attachments.
//!
//! Blob contents travel outside the message envelope and are sealed with the
//! secret box. How the key and nonce are chosen depends on the purpose:
//!
//! - **File**: fresh random key, fixed [`FILE_NONCE`]
//! - **Thumbnail**: the file's key, fixed [`THUMBNAIL_NONCE`]
//! - **Image**: key agreement of sender and receiver, fresh random nonce
//!
//! Fixed nonces are safe only because every file key is used for exactly one
//! file and one thumbnail.

use std::fmt;

use courier_crypto::{agree, open, seal, X25519PrivateKey, X25519PublicKey};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::{debug, trace};

use crate::error::{ProtocolError, Result};
use crate::limits::MAX_BLOB_SIZE;
use crate::types::{BlobId, Nonce, SymmetricKey};

/// Nonce for file blob contents.
pub const FILE_NONCE: Nonce = Nonce::from_array([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
]);

/// Nonce for thumbnail blob contents.
pub const THUMBNAIL_NONCE: Nonce = Nonce::from_array([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2,
]);

/// What a blob carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobPurpose {
    /// Image referenced by an image message.
    Image,
    /// File referenced by a file message.
    File,
    /// Thumbnail of a file.
    Thumbnail,
}

impl fmt::Display for BlobPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Image => "image",
            Self::File => "file",
            Self::Thumbnail => "thumbnail",
        })
    }
}

/// A key and nonce pair for sealing one attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    purpose: BlobPurpose,
    key: SymmetricKey,
    nonce: Nonce,
}

impl Blob {
    /// New file blob with a random key from `OsRng`.
    pub fn new_file() -> Self {
        Self::new_file_with(&mut OsRng)
    }

    /// New file blob with a key drawn from `rng`.
    pub fn new_file_with<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::file(SymmetricKey::generate_with(rng))
    }

    /// File blob for a known key.
    pub fn file(key: SymmetricKey) -> Self {
        Self {
            purpose: BlobPurpose::File,
            key,
            nonce: FILE_NONCE,
        }
    }

    /// New image blob from `sender` to `receiver` with a nonce from `OsRng`.
    pub fn new_image(sender: &X25519PrivateKey, receiver: &X25519PublicKey) -> Self {
        Self::new_image_with(&mut OsRng, sender, receiver)
    }

    /// New image blob with a nonce drawn from `rng`.
    pub fn new_image_with<R: RngCore + CryptoRng>(
        rng: &mut R,
        sender: &X25519PrivateKey,
        receiver: &X25519PublicKey,
    ) -> Self {
        Self::image(agree(sender, receiver), Nonce::generate_with(rng))
    }

    /// Image blob for a known key and nonce.
    pub fn image(key: SymmetricKey, nonce: Nonce) -> Self {
        Self {
            purpose: BlobPurpose::Image,
            key,
            nonce,
        }
    }

    /// Thumbnail blob sharing this blob's key.
    pub fn thumbnail(&self) -> Self {
        Self {
            purpose: BlobPurpose::Thumbnail,
            key: self.key.clone(),
            nonce: THUMBNAIL_NONCE,
        }
    }

    /// What this blob carries.
    pub fn purpose(&self) -> BlobPurpose {
        self.purpose
    }

    /// Secret-box key.
    pub fn key(&self) -> &SymmetricKey {
        &self.key
    }

    /// Secret-box nonce.
    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    /// Seal attachment contents for upload.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        trace!(purpose = %self.purpose, len = plaintext.len(), "Encrypting blob");
        Ok(seal(&self.key, &self.nonce, plaintext)?)
    }

    /// Open downloaded attachment contents.
    ///
    /// # Errors
    ///
    /// Returns `DecryptionFailed` if the contents do not authenticate.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        open(&self.key, &self.nonce, ciphertext).map_err(|e| {
            debug!(purpose = %self.purpose, len = ciphertext.len(), "Blob failed to decrypt");
            ProtocolError::from(e)
        })
    }

    /// Record the server-assigned id and encrypted size after upload.
    ///
    /// # Errors
    ///
    /// Returns `BlobTooLarge` if `size` does not fit the signed 32-bit wire
    /// field.
    pub fn uploaded(&self, id: BlobId, size: usize) -> Result<UploadedBlob> {
        let size = u32::try_from(size)
            .ok()
            .filter(|&s| s <= MAX_BLOB_SIZE)
            .ok_or(ProtocolError::BlobTooLarge {
                max: MAX_BLOB_SIZE,
                actual: size as u64,
            })?;
        Ok(UploadedBlob::from_parts(self.clone(), id, size))
    }
}

/// A blob that has been uploaded and has a server-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedBlob {
    blob: Blob,
    id: BlobId,
    size: u32,
}

impl UploadedBlob {
    /// `size` must already be within [`MAX_BLOB_SIZE`].
    pub(crate) fn from_parts(blob: Blob, id: BlobId, size: u32) -> Self {
        Self { blob, id, size }
    }

    /// Key and nonce.
    pub fn blob(&self) -> &Blob {
        &self.blob
    }

    /// Server-assigned id.
    pub fn id(&self) -> &BlobId {
        &self.id
    }

    /// Encrypted size in bytes.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Secret-box key.
    pub fn key(&self) -> &SymmetricKey {
        self.blob.key()
    }

    /// Secret-box nonce.
    pub fn nonce(&self) -> &Nonce {
        self.blob.nonce()
    }

    /// Thumbnail blob sharing this blob's key.
    pub fn thumbnail(&self) -> Blob {
        self.blob.thumbnail()
    }

    /// Open downloaded attachment contents.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.blob.decrypt(ciphertext)
    }
}
