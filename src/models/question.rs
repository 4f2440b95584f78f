use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::OPTION_COUNT;

/// Kind of an exam question, stored as the `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    Discursive,
    /// Any tag this editor does not know. Kept verbatim so it survives a save.
    Other(String),
}

impl QuestionKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::TrueFalse => "true_false",
            Self::Discursive => "discursive",
            Self::Other(tag) => tag,
        }
    }

    /// Label shown on the question card. Unknown kinds have none.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::MultipleChoice => Some("Múltipla Escolha"),
            Self::TrueFalse => Some("Certo/Errado"),
            Self::Discursive => Some("Discursiva"),
            Self::Other(_) => None,
        }
    }

    pub fn has_options(&self) -> bool {
        matches!(self, Self::MultipleChoice)
    }
}

impl From<String> for QuestionKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "multiple_choice" => Self::MultipleChoice,
            "true_false" => Self::TrueFalse,
            "discursive" => Self::Discursive,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for QuestionKind {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<QuestionKind> for String {
    fn from(kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One multiple-choice alternative.
///
/// Older documents stored alternatives as bare strings. Those are accepted
/// on load and normalized into `{text, image: ""}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredOption")]
pub struct OptionRecord {
    pub text: String,
    pub image: String,
}

impl OptionRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: String::new(),
        }
    }

    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}

/// Either persisted shape of an option.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredOption {
    Legacy(String),
    Record {
        #[serde(default, deserialize_with = "nullable_string")]
        text: String,
        #[serde(default, deserialize_with = "nullable_string")]
        image: String,
    },
}

impl From<StoredOption> for OptionRecord {
    fn from(stored: StoredOption) -> Self {
        match stored {
            StoredOption::Legacy(text) => Self::new(text),
            StoredOption::Record { text, image } => Self { text, image },
        }
    }
}

/// Display letter for the option at `index`: A, B, C...
pub fn option_letter(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| char::from(b'A' + i))
        .unwrap_or('?')
}

/// Full editable state of one exam question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default, deserialize_with = "nullable_string")]
    pub text: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub image: String,
    #[serde(default)]
    pub options: Vec<OptionRecord>,
}

impl QuestionRecord {
    /// Create an empty question. Multiple choice starts with five blank options.
    pub fn new(id: u64, kind: QuestionKind) -> Self {
        let options = if kind.has_options() {
            vec![OptionRecord::default(); OPTION_COUNT]
        } else {
            Vec::new()
        };

        Self {
            id,
            kind,
            text: String::new(),
            image: String::new(),
            options,
        }
    }
}

/// Scalar question fields that can be replaced directly.
///
/// The body text is not here: it only changes through the rich-text widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionField {
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionField {
    Text,
    Image,
}

/// Clock-derived id source. Ids are strictly increasing within a session.
#[derive(Debug, Default)]
pub struct IdClock {
    last: u64,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never hand out an id at or below `floor`. A clock seeded at
    /// `u64::MAX` stays there.
    pub fn seeded(floor: u64) -> Self {
        Self { last: floor }
    }

    pub fn next_id(&mut self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.last = now.max(self.last.saturating_add(1));
        self.last
    }
}

pub(crate) fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
