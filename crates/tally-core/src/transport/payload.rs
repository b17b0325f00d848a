//! Request and response payloads that are not JSON

use crate::error::{TallyError, TallyResult};
use std::path::Path;

/// A file attached to a multipart request under the `file` field
#[derive(Debug, Clone)]
pub struct FilePart {
    /// File name sent to the server
    pub file_name: String,
    /// MIME type of the content
    pub mime: String,
    /// File content
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Build a part from in-memory content
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing the MIME type from its extension
    pub async fn from_path(path: &Path) -> TallyResult<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| TallyError::io_with_path(e.to_string(), path.display().to_string()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = mime_for(path);
        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    /// Whether the file has no content
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn mime_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}

/// Binary response body
#[derive(Debug, Clone)]
pub struct Download {
    /// Raw payload
    pub bytes: Vec<u8>,
    /// `Content-Type` reported by the server
    pub content_type: Option<String>,
    /// File name from `Content-Disposition`, if any
    pub suggested_name: Option<String>,
}

impl Download {
    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Extract `filename=...` from a `Content-Disposition` header value
pub(crate) fn disposition_file_name(value: &str) -> Option<String> {
    value.split(';').find_map(|part| {
        let part = part.trim();
        let name = part.strip_prefix("filename=")?;
        let name = name.trim_matches('"').trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    })
}
