mod loader;

pub use loader::{LoadError, load_assessment, load_questions, parse_initial_questions};
