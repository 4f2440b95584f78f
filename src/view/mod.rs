//! View model and markup of the question list.

pub mod html;
mod tree;

pub use tree::{Action, OptionRow, QuestionCard, ViewTree, body_container, render_model};
