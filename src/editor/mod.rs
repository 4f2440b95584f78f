//! Question list editor.
//!
//! Owns the question records of one editing session, keeps them in sync
//! with one rich-text widget per question and rebuilds the view after every
//! structural change.

pub mod prompt;
mod state;
pub mod widget;

pub use prompt::{Answered, Prompt};
pub use state::QuestionListEditor;
pub use widget::{
    BufferHost, BufferWidget, ChangeListener, RichTextWidget, ToolbarItem, WidgetConfig,
    WidgetHost,
};
