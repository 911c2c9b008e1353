//! Image message.

use std::fmt;

use courier_crypto::{agree, X25519PrivateKey, X25519PublicKey, NONCE_SIZE};

use crate::blob::{Blob, UploadedBlob};
use crate::error::{ProtocolError, Result};
use crate::limits::{BLOB_ID_SIZE, IMAGE_BODY_SIZE};
use crate::types::{BlobId, Nonce, SymmetricKey};

/// Reference to an uploaded image blob.
///
/// The image key is not transmitted; the receiver derives it by key
/// agreement with the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Image {
    blob_id: BlobId,
    size: u32,
    nonce: Nonce,
}

impl Image {
    /// Reference an uploaded image blob.
    pub fn new(blob: &UploadedBlob) -> Self {
        Self {
            blob_id: *blob.id(),
            size: blob.size(),
            nonce: *blob.nonce(),
        }
    }

    /// Server-assigned blob id.
    pub fn blob_id(&self) -> &BlobId {
        &self.blob_id
    }

    /// Encrypted size in bytes.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Nonce the blob was sealed with.
    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    /// Rebuild the uploaded blob given the agreed key.
    pub fn blob(&self, key: SymmetricKey) -> UploadedBlob {
        UploadedBlob::from_parts(Blob::image(key, self.nonce), self.blob_id, self.size)
    }

    /// Rebuild the uploaded blob on the receiving side.
    pub fn blob_for(
        &self,
        receiver: &X25519PrivateKey,
        sender: &X25519PublicKey,
    ) -> UploadedBlob {
        self.blob(agree(receiver, sender))
    }

    pub(crate) fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.blob_id.as_bytes());
        out.extend_from_slice(&self.size.to_be_bytes());
        out.extend_from_slice(self.nonce.as_bytes());
    }

    pub(crate) fn decode(body: &[u8]) -> Result<Self> {
        if body.len() != IMAGE_BODY_SIZE {
            return Err(ProtocolError::format(
                "image message",
                format!("expected {} bytes, got {}", IMAGE_BODY_SIZE, body.len()),
            ));
        }
        let (id, rest) = body.split_at(BLOB_ID_SIZE);
        let (size, nonce) = rest.split_at(4);
        debug_assert_eq!(nonce.len(), NONCE_SIZE);

        let size = i32::from_be_bytes([size[0], size[1], size[2], size[3]]);
        let size = u32::try_from(size)
            .map_err(|_| ProtocolError::format("image message", format!("negative size {}", size)))?;

        Ok(Self {
            blob_id: BlobId::from_bytes(id)?,
            size,
            nonce: Nonce::from_bytes(nonce)?,
        })
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Image[{}, {}]", self.blob_id, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use courier_crypto::X25519KeyPair;

    fn sample() -> Image {
        let blob = Blob::image(SymmetricKey::from([1; 32]), Nonce::from_array([2; 24]));
        Image::new(&blob.uploaded(BlobId::from_array([3; 16]), 0x0102).unwrap())
    }

    #[test]
    fn test_encode_layout() {
        let mut out = Vec::new();
        sample().encode_into(&mut out);
        assert_eq!(out.len(), 44);
        assert_eq!(&out[..16], &[3; 16]);
        assert_eq!(&out[16..20], &[0, 0, 1, 2]);
        assert_eq!(&out[20..], &[2; 24]);
    }

    #[test]
    fn test_decode_roundtrip() {
        let mut out = Vec::new();
        sample().encode_into(&mut out);
        assert_eq!(Image::decode(&out).unwrap(), sample());
    }

    #[test]
    fn test_decode_wrong_length() {
        assert_eq!(Image::decode(&[0; 43]).unwrap_err().kind(), ErrorKind::Format);
        assert_eq!(Image::decode(&[0; 45]).unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn test_decode_negative_size() {
        let mut body = [0u8; 44];
        body[16] = 0x80;
        assert_eq!(Image::decode(&body).unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn test_receiver_rebuilds_blob() {
        let alice = X25519KeyPair::generate();
        let bob = X25519KeyPair::generate();
        let sent = Blob::new_image(alice.private_key(), bob.public_key());
        let ct = sent.encrypt(b"pixels").unwrap();
        let image = Image::new(&sent.uploaded(BlobId::from_array([5; 16]), ct.len()).unwrap());

        let received = image.blob_for(bob.private_key(), alice.public_key());
        assert_eq!(received.decrypt(&ct).unwrap(), b"pixels");
        assert_eq!(received.id(), image.blob_id());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            sample().to_string(),
            format!("Image[{}, 258]", "03".repeat(16))
        );
    }
}
