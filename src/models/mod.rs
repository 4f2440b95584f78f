mod assessment;
mod question;

pub use assessment::{AssessmentDocument, Essay, Settings, parse_columns};
pub use question::{
    IdClock, OptionField, OptionRecord, QuestionField, QuestionKind, QuestionRecord, option_letter,
};
