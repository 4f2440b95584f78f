//! Wire messages of the upload and save endpoints.
//!
//! Requests and responses are JSON; the upload request is multipart.

use serde::{Deserialize, Serialize};

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// Status value the save endpoint reports on success.
pub const STATUS_SUCCESS: &str = "success";

/// Response of `POST /upload_image`.
///
/// Only a response with a string `url` counts as a successful upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub url: Option<String>,
}

impl UploadResponse {
    /// The hosted image URL, if the response has one.
    pub fn into_url(self) -> Option<String> {
        self.url.filter(|url| !url.trim().is_empty())
    }
}

/// Response of `POST /edit/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl SaveResponse {
    pub fn success(id: impl Into<String>) -> Self {
        Self {
            status: Some(STATUS_SUCCESS.to_string()),
            id: Some(id.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUCCESS)
    }
}

/// A local file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FileBlob {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}
