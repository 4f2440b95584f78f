//! Endpoint paths, document defaults and runtime settings.

use std::path::PathBuf;
use std::time::Duration;

/// Number of alternatives a new multiple-choice question starts with.
pub const OPTION_COUNT: usize = 5;

/// Defaults of a freshly created assessment.
pub const DRAFT_TITLE: &str = "Nova Avaliação";
pub const DEFAULT_FONT: &str = "Arial";
pub const DEFAULT_COLUMNS: u32 = 2;

/// Collaborator endpoints, relative to the server base URL.
pub const UPLOAD_IMAGE_PATH: &str = "/upload_image";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Default server base URL.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// First path segment of the save endpoint `/edit/{id}`.
pub const EDIT_SEGMENT: &str = "edit";

/// Runtime settings of an editing session.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Server base URL, without a trailing slash.
    pub server_url: String,
    /// Existing assessment document to edit.
    pub assessment: Option<PathBuf>,
    /// Initial question list, used when no full document is given.
    pub questions: Option<PathBuf>,
    pub timeout: Duration,
}

impl EditorConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        Self {
            server_url,
            assessment: None,
            questions: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Absolute URL for an endpoint path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}
