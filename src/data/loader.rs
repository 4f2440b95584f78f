use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{AssessmentDocument, QuestionRecord};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        source: serde_json::Error,
    },
}

/// Parse the host-provided initial question payload.
///
/// Empty input means the session starts without questions.
pub fn parse_initial_questions(payload: &str) -> Result<Vec<QuestionRecord>, LoadError> {
    if payload.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(payload).map_err(|source| LoadError::Parse {
        origin: "initial questions".to_string(),
        source,
    })
}

/// Load a bare question list from a JSON file.
pub fn load_questions<P: AsRef<Path>>(path: P) -> Result<Vec<QuestionRecord>, LoadError> {
    let content = read(path.as_ref())?;
    parse_initial_questions(&content).map_err(|err| relabel(err, path.as_ref()))
}

/// Load a full assessment document from a JSON file.
pub fn load_assessment<P: AsRef<Path>>(path: P) -> Result<AssessmentDocument, LoadError> {
    let path = path.as_ref();
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        origin: path.display().to_string(),
        source,
    })
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn relabel(err: LoadError, path: &Path) -> LoadError {
    match err {
        LoadError::Parse { source, .. } => LoadError::Parse {
            origin: path.display().to_string(),
            source,
        },
        other => other,
    }
}
