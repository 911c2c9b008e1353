//! File message.
//!
//! The body is a JSON record with single-letter keys. Optional fields are
//! omitted when absent, never written as `null`, and keys are emitted in the
//! order `b, t, k, m, n, d, c, s, j`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::blob::{Blob, UploadedBlob};
use crate::error::{ProtocolError, Result};
use crate::limits::MAX_BLOB_SIZE;
use crate::types::{key_from_hex, BlobId};

const CONTEXT: &str = "file message";

/// Hint for how the receiver should render the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum RenderingType {
    /// Render as a generic file.
    #[default]
    Default = 0,
    /// Render inline as media.
    Media = 1,
    /// Render as a sticker.
    Sticker = 2,
}

impl RenderingType {
    /// Get the wire ordinal.
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Look up a wire ordinal.
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Default),
            1 => Ok(Self::Media),
            2 => Ok(Self::Sticker),
            other => Err(ProtocolError::format(
                CONTEXT,
                format!("unknown rendering type {}", other),
            )),
        }
    }
}

impl fmt::Display for RenderingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Default => "DEFAULT",
            Self::Media => "MEDIA",
            Self::Sticker => "STICKER",
        })
    }
}

/// JSON record as sent on the wire.
#[derive(Serialize, Deserialize)]
struct FileRecord {
    b: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    t: Option<String>,
    k: String,
    m: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    n: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    d: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    c: Option<String>,
    s: u32,
    #[serde(default)]
    j: u8,
}

/// Reference to an uploaded file blob and optional thumbnail.
///
/// Built with [`FileBuilder`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    file: UploadedBlob,
    thumbnail: Option<BlobId>,
    mime_type: String,
    rendering: RenderingType,
    file_name: Option<String>,
    description: Option<String>,
    correlation_id: Option<String>,
}

impl File {
    /// Start building a file message.
    pub fn builder(
        file: UploadedBlob,
        mime_type: impl Into<String>,
        rendering: RenderingType,
    ) -> FileBuilder {
        FileBuilder::new(file, mime_type, rendering)
    }

    /// The uploaded file blob, including its key.
    pub fn file(&self) -> &UploadedBlob {
        &self.file
    }

    /// Blob id of the thumbnail, if one was attached.
    pub fn thumbnail_id(&self) -> Option<&BlobId> {
        self.thumbnail.as_ref()
    }

    /// The uploaded thumbnail, if one was attached.
    ///
    /// Shares the file key under the thumbnail nonce. Only the id travels on
    /// the wire, so the size reported is the file's.
    pub fn thumbnail_blob(&self) -> Option<UploadedBlob> {
        self.thumbnail
            .map(|id| UploadedBlob::from_parts(self.file.thumbnail(), id, self.file.size()))
    }

    /// MIME type of the file.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Rendering hint.
    pub fn rendering(&self) -> RenderingType {
        self.rendering
    }

    /// Original file name.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Caption.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Groups related files on the receiving side.
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    fn to_record(&self) -> FileRecord {
        FileRecord {
            b: self.file.id().to_hex(),
            t: self.thumbnail.map(|id| id.to_hex()),
            k: self.file.key().to_hex(),
            m: self.mime_type.clone(),
            n: self.file_name.clone(),
            d: self.description.clone(),
            c: self.correlation_id.clone(),
            s: self.file.size(),
            j: self.rendering.as_u8(),
        }
    }

    pub(crate) fn encode_into(&self, out: &mut Vec<u8>) {
        // A record of strings and integers always serializes.
        out.extend(serde_json::to_vec(&self.to_record()).unwrap_or_default());
    }

    pub(crate) fn decode(body: &[u8]) -> Result<Self> {
        let record: FileRecord = serde_json::from_slice(body)
            .map_err(|e| ProtocolError::format(CONTEXT, e.to_string()))?;

        if record.s > MAX_BLOB_SIZE {
            return Err(ProtocolError::format(
                CONTEXT,
                format!("size {} out of range", record.s),
            ));
        }
        let key = key_from_hex(&record.k, "file key").map_err(|e| e.in_decode(CONTEXT))?;
        let id = BlobId::from_hex(&record.b).map_err(|e| e.in_decode(CONTEXT))?;
        let thumbnail = record
            .t
            .as_deref()
            .map(BlobId::from_hex)
            .transpose()
            .map_err(|e| e.in_decode(CONTEXT))?;

        Ok(Self {
            file: UploadedBlob::from_parts(Blob::file(key), id, record.s),
            thumbnail,
            mime_type: record.m,
            rendering: RenderingType::from_u8(record.j)?,
            file_name: record.n,
            description: record.d,
            correlation_id: record.c,
        })
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "File[{}", self.file.id())?;
        if let Some(thumbnail) = &self.thumbnail {
            write!(f, ", {}", thumbnail)?;
        }
        write!(f, ", {}, {}", self.mime_type, self.rendering)?;
        if let Some(description) = &self.description {
            write!(f, ", {}", description)?;
        }
        f.write_str("]")
    }
}

/// Builder for [`File`].
#[derive(Debug, Clone)]
pub struct FileBuilder {
    file: UploadedBlob,
    thumbnail: Option<BlobId>,
    mime_type: String,
    rendering: RenderingType,
    file_name: Option<String>,
    description: Option<String>,
    correlation_id: Option<String>,
}

impl FileBuilder {
    /// Create a builder for the given uploaded file.
    pub fn new(file: UploadedBlob, mime_type: impl Into<String>, rendering: RenderingType) -> Self {
        Self {
            file,
            thumbnail: None,
            mime_type: mime_type.into(),
            rendering,
            file_name: None,
            description: None,
            correlation_id: None,
        }
    }

    /// Attach an uploaded thumbnail.
    ///
    /// The thumbnail must have been sealed with the blob returned by
    /// [`UploadedBlob::thumbnail`] on the file; only its id is transmitted.
    pub fn thumbnail(mut self, thumbnail: &UploadedBlob) -> Self {
        self.thumbnail = Some(*thumbnail.id());
        self
    }

    /// Set the file name.
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Set the caption.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the correlation id.
    pub fn correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Build the message.
    pub fn build(self) -> File {
        File {
            file: self.file,
            thumbnail: self.thumbnail,
            mime_type: self.mime_type,
            rendering: self.rendering,
            file_name: self.file_name,
            description: self.description,
            correlation_id: self.correlation_id,
        }
    }
}
