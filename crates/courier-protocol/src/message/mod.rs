//! Plain message variants and their type-tagged binary encoding.
//!
//! An encoded message is a single type tag byte followed by the
//! variant-specific body:
//!
//! | Tag | Variant | Body |
//! |-----|---------|------|
//! | `0x01` | Text | raw UTF-8 |
//! | `0x02` | Image | blob id, big-endian size, nonce |
//! | `0x10` | Location | `lat,lon[,accuracy]` plus optional name/address lines |
//! | `0x17` | File | UTF-8 JSON record |
//! | `0x80` | DeliveryReceipt | receipt type byte, then message ids |
//!
//! Decoding never yields a partially populated value: any malformed body
//! fails the whole message.

mod file;
mod image;
mod location;
mod receipt;

use std::fmt;

pub use file::{File, FileBuilder, RenderingType};
pub use image::Image;
pub use location::Location;
pub use receipt::{DeliveryReceipt, ReceiptType};

use crate::error::{ProtocolError, Result};

/// Wire type tag of a plain message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Simple text message.
    Text = 0x01,
    /// Image referencing an uploaded blob.
    Image = 0x02,
    /// Geographic location.
    Location = 0x10,
    /// File referencing an uploaded blob and optional thumbnail.
    File = 0x17,
    /// Delivery receipt for earlier messages.
    DeliveryReceipt = 0x80,
}

impl MessageType {
    /// Get the tag byte.
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Look up a tag byte.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMessageType` carrying the tag if it is not recognized.
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::Text),
            0x02 => Ok(Self::Image),
            0x10 => Ok(Self::Location),
            0x17 => Ok(Self::File),
            0x80 => Ok(Self::DeliveryReceipt),
            other => Err(ProtocolError::UnknownMessageType(other)),
        }
    }
}

/// An unencrypted message.
#[derive(Debug, Clone, PartialEq)]
pub enum PlainMessage {
    /// Simple text message.
    Text(String),
    /// Geographic location.
    Location(Location),
    /// Image referencing an uploaded blob.
    Image(Image),
    /// File referencing an uploaded blob.
    File(File),
    /// Delivery receipt.
    DeliveryReceipt(DeliveryReceipt),
}

impl PlainMessage {
    /// Create a text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// The wire type of this message.
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Text(_) => MessageType::Text,
            Self::Location(_) => MessageType::Location,
            Self::Image(_) => MessageType::Image,
            Self::File(_) => MessageType::File,
            Self::DeliveryReceipt(_) => MessageType::DeliveryReceipt,
        }
    }

    /// Encode as tag byte followed by body.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![self.message_type().as_u8()];
        match self {
            Self::Text(text) => out.extend_from_slice(text.as_bytes()),
            Self::Location(location) => location.encode_into(&mut out),
            Self::Image(image) => image.encode_into(&mut out),
            Self::File(file) => file.encode_into(&mut out),
            Self::DeliveryReceipt(receipt) => receipt.encode_into(&mut out),
        }
        out
    }

    /// Decode an unpadded message.
    ///
    /// # Errors
    ///
    /// - `UnknownMessageType` for an unrecognized tag
    /// - `InvalidFormat` for an empty buffer or a malformed body
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let (&tag, body) = bytes
            .split_first()
            .ok_or_else(|| ProtocolError::format("message", "missing type tag"))?;

        match MessageType::from_u8(tag)? {
            MessageType::Text => {
                let text = std::str::from_utf8(body)
                    .map_err(|e| ProtocolError::format("text message", e.to_string()))?;
                Ok(Self::Text(text.to_owned()))
            }
            MessageType::Location => Location::decode(body).map(Self::Location),
            MessageType::Image => Image::decode(body).map(Self::Image),
            MessageType::File => File::decode(body).map(Self::File),
            MessageType::DeliveryReceipt => {
                DeliveryReceipt::decode(body).map(Self::DeliveryReceipt)
            }
        }
    }
}

impl fmt::Display for PlainMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "Text[{}]", text),
            Self::Location(location) => fmt::Display::fmt(location, f),
            Self::Image(image) => fmt::Display::fmt(image, f),
            Self::File(file) => fmt::Display::fmt(file, f),
            Self::DeliveryReceipt(receipt) => fmt::Display::fmt(receipt, f),
        }
    }
}

impl From<Location> for PlainMessage {
    fn from(location: Location) -> Self {
        Self::Location(location)
    }
}

impl From<Image> for PlainMessage {
    fn from(image: Image) -> Self {
        Self::Image(image)
    }
}

impl From<File> for PlainMessage {
    fn from(file: File) -> Self {
        Self::File(file)
    }
}

impl From<DeliveryReceipt> for PlainMessage {
    fn from(receipt: DeliveryReceipt) -> Self {
        Self::DeliveryReceipt(receipt)
    }
}
