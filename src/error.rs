use thiserror::Error;

use crate::backend::BackendError;
use crate::data::LoadError;
use crate::logo::LogoError;

/// Error type for editing operations.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no question at position {position} (have {len})")]
    QuestionOutOfRange { position: usize, len: usize },

    #[error("question {position} has no option {option}")]
    OptionOutOfRange { position: usize, option: usize },

    #[error("failed to load editor state: {0}")]
    Load(#[from] LoadError),

    #[error("server request failed: {0}")]
    Backend(#[from] BackendError),

    #[error("failed to read logo: {0}")]
    Logo(#[from] LogoError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
