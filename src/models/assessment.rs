use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::config::{DEFAULT_COLUMNS, DEFAULT_FONT, DRAFT_TITLE};

use super::question::{QuestionRecord, nullable_string};

/// Layout settings of the printed exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, deserialize_with = "nullable_string")]
    pub font: String,
    /// `None` when the column count entered was not an integer.
    #[serde(default, deserialize_with = "lenient_columns")]
    pub columns: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font: DEFAULT_FONT.to_string(),
            columns: Some(DEFAULT_COLUMNS),
        }
    }
}

/// Optional essay block printed after the questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Essay {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, deserialize_with = "nullable_string")]
    pub theme: String,
    /// Motivating texts as HTML. Current documents hold a single entry.
    #[serde(default)]
    pub texts: Vec<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub instructions: String,
}

/// The whole assessment as posted to the save endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentDocument {
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub class_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub date: String,
    /// URL or embedded `data:` image.
    #[serde(default, deserialize_with = "nullable_string")]
    pub school_logo: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub instructions: String,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub essay: Essay,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
}

impl AssessmentDocument {
    /// A fresh, unsaved assessment with the defaults of a newly created exam.
    pub fn draft() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: DRAFT_TITLE.to_string(),
            class_name: String::new(),
            date: String::new(),
            school_logo: String::new(),
            instructions: String::new(),
            settings: Settings::default(),
            essay: Essay::default(),
            questions: Vec::new(),
        }
    }
}

/// Integer-parse a column count the way a free-text form field is read:
/// leading digits count, anything else is `None`.
pub fn parse_columns(raw: &str) -> Option<u32> {
    let trimmed = raw.trim_start();
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn lenient_columns<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => parse_columns(&s),
        Some(Raw::Other(_)) | None => None,
    })
}
