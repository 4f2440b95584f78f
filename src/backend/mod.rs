//! Server collaborators: image hosting and assessment storage.

mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::AssessmentDocument;
use crate::protocol::{FileBlob, SaveResponse};

pub use http::HttpBackend;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server answered with HTTP {0}")]
    Status(u16),

    #[error("unexpected response body: {0}")]
    Decode(serde_json::Error),

    #[error("upload response has no url")]
    MissingUrl,

    #[error("invalid server url: {0}")]
    InvalidUrl(String),
}

/// The two endpoints the editor talks to.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Upload an image and return the URL it is served from.
    async fn upload_image(&self, file: FileBlob) -> Result<String, BackendError>;

    /// Store the whole assessment.
    async fn save_assessment(
        &self,
        document: &AssessmentDocument,
    ) -> Result<SaveResponse, BackendError>;
}

#[cfg(test)]
pub(crate) mod fake {
    use std::sync::Mutex;

    use super::*;
    use crate::protocol::STATUS_SUCCESS;

    /// Scripted backend that records what it was sent.
    #[derive(Default)]
    pub struct FakeBackend {
        pub upload_url: Option<String>,
        pub save_status: Option<String>,
        pub uploads: Mutex<Vec<FileBlob>>,
        pub saved: Mutex<Vec<serde_json::Value>>,
    }

    impl FakeBackend {
        pub fn uploading(url: &str) -> Self {
            Self {
                upload_url: Some(url.to_string()),
                ..Self::default()
            }
        }

        pub fn saving(status: &str) -> Self {
            Self {
                save_status: Some(status.to_string()),
                ..Self::default()
            }
        }

        pub fn last_saved(&self) -> Option<serde_json::Value> {
            self.saved.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl Backend for FakeBackend {
        async fn upload_image(&self, file: FileBlob) -> Result<String, BackendError> {
            self.uploads.lock().unwrap().push(file);
            self.upload_url.clone().ok_or(BackendError::MissingUrl)
        }

        async fn save_assessment(
            &self,
            document: &AssessmentDocument,
        ) -> Result<SaveResponse, BackendError> {
            self.saved
                .lock()
                .unwrap()
                .push(serde_json::to_value(document).unwrap());
            match self.save_status.as_deref() {
                Some(STATUS_SUCCESS) => Ok(SaveResponse::success(document.id.clone())),
                Some(status) => Ok(SaveResponse {
                    status: Some(status.to_string()),
                    id: None,
                }),
                None => Err(BackendError::Status(500)),
            }
        }
    }
}
