//! # exam-editor
//!
//! Editor for assessment (exam) documents: an ordered list of
//! multiple-choice, true/false and discursive questions, each with a
//! rich-text body and optional images, saved to an exam server as JSON.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use exam_editor::{EditorConfig, EditorError, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), EditorError> {
//!     let session = Session::from_config(EditorConfig::new("http://127.0.0.1:5000"))?;
//!
//!     // Take over the terminal until the user quits or saves.
//!     if let Some(next) = session.run().await? {
//!         println!("saved, continue at {}", next);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! The editing model itself is terminal-agnostic:
//!
//! ```rust
//! use exam_editor::editor::{BufferHost, QuestionListEditor};
//! use exam_editor::models::QuestionKind;
//!
//! let mut editor = QuestionListEditor::new(BufferHost::new());
//! editor.add(QuestionKind::MultipleChoice);
//! assert_eq!(editor.view().cards[0].options.len(), 5);
//! ```

pub mod app;
pub mod backend;
pub mod config;
pub mod data;
pub mod editor;
mod error;
pub mod logo;
pub mod models;
pub mod protocol;
pub mod save;
pub mod terminal;
mod ui;
pub mod view;

use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;

pub use app::App;
pub use backend::{Backend, BackendError, HttpBackend};
pub use config::EditorConfig;
pub use error::EditorError;
pub use models::{AssessmentDocument, OptionRecord, QuestionKind, QuestionRecord};

/// One interactive editing session against an exam server.
pub struct Session {
    app: App<HttpBackend>,
}

impl Session {
    /// Load the document named by `config`, or start a fresh draft.
    pub fn from_config(config: EditorConfig) -> Result<Self, EditorError> {
        let document = match (&config.assessment, &config.questions) {
            (Some(path), _) => data::load_assessment(path)?,
            (None, Some(path)) => AssessmentDocument {
                questions: data::load_questions(path)?,
                ..AssessmentDocument::draft()
            },
            (None, None) => AssessmentDocument::draft(),
        };
        info!(
            id = %document.id,
            questions = document.questions.len(),
            server = %config.server_url,
            "starting editor session"
        );

        Ok(Self {
            app: App::new(document, HttpBackend::new(config)),
        })
    }

    pub fn app(&self) -> &App<HttpBackend> {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App<HttpBackend> {
        &mut self.app
    }

    /// Run until the user quits. Returns where to continue after a
    /// successful save, if one ended the session.
    pub async fn run(mut self) -> Result<Option<String>, EditorError> {
        let mut session = terminal::TerminalSession::start()?;

        while !self.app.should_quit {
            session.terminal().draw(|frame| ui::render(frame, &self.app))?;

            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.app.handle_key(key.code).await;
                }
            }
        }

        drop(session);
        Ok(self.app.redirect.take())
    }
}
