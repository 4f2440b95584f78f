//! School logo embedding.
//!
//! The logo travels inside the document as a `data:` URL, built locally
//! without any upload.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogoError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is empty", path.display())]
    Empty { path: PathBuf },
}

/// Mime type guessed from a file name's extension.
pub fn mime_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Encode raw image bytes as a `data:` URL.
pub fn encode_logo(bytes: &[u8], file_name: &str) -> String {
    format!("data:{};base64,{}", mime_for(file_name), STANDARD.encode(bytes))
}

/// Read an image file and encode it as a `data:` URL.
pub fn encode_logo_file<P: AsRef<Path>>(path: P) -> Result<String, LogoError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| LogoError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if bytes.is_empty() {
        return Err(LogoError::Empty {
            path: path.to_path_buf(),
        });
    }

    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    Ok(encode_logo(&bytes, file_name))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for("logo.PNG"), "image/png");
        assert_eq!(mime_for("escola.jpeg"), "image/jpeg");
        assert_eq!(mime_for("notes.txt"), "application/octet-stream");
        assert_eq!(mime_for("no_extension"), "application/octet-stream");
    }

    #[test]
    fn test_encode_logo() {
        assert_eq!(encode_logo(b"abc", "x.gif"), "data:image/gif;base64,YWJj");
    }

    #[test]
    fn test_encode_logo_file() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&[1, 2, 3]).unwrap();
        let url = encode_logo_file(file.path()).unwrap();
        assert_eq!(url, "data:image/png;base64,AQID");
    }

    #[test]
    fn test_empty_logo_is_rejected() {
        let file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        assert!(matches!(
            encode_logo_file(file.path()),
            Err(LogoError::Empty { .. })
        ));
    }
}
