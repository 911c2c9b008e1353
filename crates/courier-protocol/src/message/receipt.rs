//! Delivery receipt message.
//!
//! Body layout: one receipt type byte followed by zero or more 8-byte
//! message ids.

use std::fmt;

use crate::error::{ProtocolError, Result};
use crate::limits::MESSAGE_ID_SIZE;
use crate::types::MessageId;

const CONTEXT: &str = "delivery receipt";

/// Kind of acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ReceiptType {
    /// Reserved.
    Undefined = 0,
    /// Message reached the recipient's device.
    Received = 1,
    /// Message was opened by the recipient.
    Read = 2,
    /// Recipient agreed.
    ThumbsUp = 3,
    /// Recipient disagreed.
    ThumbsDown = 4,
}

impl ReceiptType {
    /// Get the numeric value of the receipt type.
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Create a receipt type from a numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a valid receipt type.
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Undefined),
            1 => Ok(Self::Received),
            2 => Ok(Self::Read),
            3 => Ok(Self::ThumbsUp),
            4 => Ok(Self::ThumbsDown),
            other => Err(ProtocolError::format(
                CONTEXT,
                format!("unknown receipt type {}", other),
            )),
        }
    }
}

impl fmt::Display for ReceiptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Undefined => "UNDEFINED",
            Self::Received => "RECEIVED",
            Self::Read => "READ",
            Self::ThumbsUp => "THUMBSUP",
            Self::ThumbsDown => "THUMBSDOWN",
        })
    }
}

/// Acknowledgement of one or more earlier messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    receipt_type: ReceiptType,
    message_ids: Vec<MessageId>,
}

impl DeliveryReceipt {
    /// Create a receipt for the given messages.
    pub fn new(receipt_type: ReceiptType, message_ids: Vec<MessageId>) -> Self {
        Self {
            receipt_type,
            message_ids,
        }
    }

    /// Kind of acknowledgement.
    pub fn receipt_type(&self) -> ReceiptType {
        self.receipt_type
    }

    /// Acknowledged messages.
    pub fn message_ids(&self) -> &[MessageId] {
        &self.message_ids
    }

    pub(crate) fn encode_into(&self, out: &mut Vec<u8>) {
        out.reserve(1 + self.message_ids.len() * MESSAGE_ID_SIZE);
        out.push(self.receipt_type.as_u8());
        for id in &self.message_ids {
            out.extend_from_slice(id.as_bytes());
        }
    }

    pub(crate) fn decode(body: &[u8]) -> Result<Self> {
        let (&kind, ids) = body
            .split_first()
            .ok_or_else(|| ProtocolError::format(CONTEXT, "missing receipt type"))?;
        if ids.len() % MESSAGE_ID_SIZE != 0 {
            return Err(ProtocolError::format(
                CONTEXT,
                format!(
                    "{} trailing bytes are not a whole number of message ids",
                    ids.len()
                ),
            ));
        }
        let message_ids = ids
            .chunks_exact(MESSAGE_ID_SIZE)
            .map(MessageId::from_bytes)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(ReceiptType::from_u8(kind)?, message_ids))
    }
}

impl fmt::Display for DeliveryReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeliveryReceipt[{}", self.receipt_type)?;
        for id in &self.message_ids {
            write!(f, ", {}", id)?;
        }
        f.write_str("]")
    }
}
