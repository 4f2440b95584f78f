use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use exam_editor::config::{DEFAULT_SERVER_URL, DEFAULT_TIMEOUT_SECS};
use exam_editor::{EditorConfig, Session};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Edit exam assessments in the terminal", long_about = None)]
struct Args {
    /// Base URL of the exam server
    #[arg(short, long, default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Saved assessment document (JSON) to edit
    #[arg(short, long)]
    assessment: Option<PathBuf>,

    /// JSON array of questions to start a new assessment with
    #[arg(short, long, conflicts_with = "assessment")]
    questions: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Write logs to this file (RUST_LOG selects the level)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let file = File::create(path)
        .map_err(|e| format!("cannot open log file {}: {}", path.display(), e))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("exam_editor=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| format!("cannot install logger: {}", e))?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        if let Err(e) = init_logging(path) {
            eprintln!("Error setting up logging: {}", e);
            std::process::exit(1);
        }
    }

    let mut config = EditorConfig::new(args.server);
    config.assessment = args.assessment;
    config.questions = args.questions;
    config.timeout = Duration::from_secs(args.timeout);

    let session = match Session::from_config(config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error starting editor: {}", e);
            std::process::exit(1);
        }
    };

    match session.run().await {
        Ok(Some(next)) => println!("Avaliação salva. Continue em {}", next),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error running editor: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_in_missing_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = init_logging(&dir.path().join("no/such/dir/editor.log")).unwrap_err();
        assert!(err.to_string().starts_with("cannot open log file"));
    }

    #[test]
    fn test_second_logger_install_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let _ = init_logging(&dir.path().join("first.log"));

        let err = init_logging(&dir.path().join("second.log")).unwrap_err();
        assert!(err.to_string().starts_with("cannot install logger"));
    }
}
