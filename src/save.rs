//! Assembling and submitting the assessment document.

use tracing::{info, warn};

use crate::backend::Backend;
use crate::config::DASHBOARD_PATH;
use crate::editor::prompt::{SAVE_FAILED, SAVE_SUCCEEDED};
use crate::editor::{Prompt, QuestionListEditor, WidgetHost};
use crate::models::{AssessmentDocument, Essay, QuestionRecord, Settings, parse_columns};
use crate::view::html::escape;

/// Essay section of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EssayFields {
    pub enabled: bool,
    pub theme: String,
    pub instructions: String,
    /// HTML of the essay's rich-text editor.
    pub body_html: String,
}

impl EssayFields {
    /// Form state for a loaded essay. Several stored texts are merged into
    /// one body.
    pub fn from_essay(essay: &Essay) -> Self {
        Self {
            enabled: essay.enabled,
            theme: essay.theme.clone(),
            instructions: essay.instructions.clone(),
            body_html: merge_texts(&essay.texts),
        }
    }

    /// The essay body always goes out as a one-element `texts`.
    pub fn to_essay(&self) -> Essay {
        Essay {
            enabled: self.enabled,
            theme: self.theme.clone(),
            texts: vec![self.body_html.clone()],
            instructions: self.instructions.clone(),
        }
    }
}

/// The document fields that live next to the question list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub id: String,
    pub title: String,
    pub class_name: String,
    pub date: String,
    pub school_logo: String,
    pub instructions: String,
    pub font: String,
    /// Column count as typed.
    pub columns: String,
    pub essay: EssayFields,
}

impl FormFields {
    pub fn from_document(document: &AssessmentDocument) -> Self {
        Self {
            id: document.id.clone(),
            title: document.title.clone(),
            class_name: document.class_name.clone(),
            date: document.date.clone(),
            school_logo: document.school_logo.clone(),
            instructions: document.instructions.clone(),
            font: document.settings.font.clone(),
            columns: document
                .settings
                .columns
                .map(|c| c.to_string())
                .unwrap_or_default(),
            essay: EssayFields::from_essay(&document.essay),
        }
    }
}

/// Result of a save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Stored; the session should continue at `redirect`.
    Saved { redirect: String },
    Failed,
}

/// Build the document posted to the save endpoint.
pub fn assemble(form: &FormFields, questions: Vec<QuestionRecord>) -> AssessmentDocument {
    AssessmentDocument {
        id: form.id.clone(),
        title: form.title.clone(),
        class_name: form.class_name.clone(),
        date: form.date.clone(),
        school_logo: form.school_logo.clone(),
        instructions: form.instructions.clone(),
        settings: Settings {
            font: form.font.clone(),
            columns: parse_columns(&form.columns),
        },
        essay: form.essay.to_essay(),
        questions,
    }
}

/// One editor body from stored essay texts. Documents written by the older
/// blank-line split hold several plain-text entries; those are escaped and
/// wrapped as paragraphs.
fn merge_texts(texts: &[String]) -> String {
    match texts {
        [] => String::new(),
        [single] => single.clone(),
        many => many
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| {
                if t.trim_start().starts_with('<') {
                    t.clone()
                } else {
                    format!("<p>{}</p>", escape(t))
                }
            })
            .collect(),
    }
}

/// Assemble the document from the editor and form, then store it.
///
/// The editor is only read; a failed save leaves it exactly as it was.
pub async fn save_assessment<H, B>(
    backend: &B,
    prompt: &mut dyn Prompt,
    editor: &mut QuestionListEditor<H>,
    form: &FormFields,
) -> SaveOutcome
where
    H: WidgetHost,
    B: Backend + ?Sized,
{
    let document = assemble(form, editor.snapshot());

    match backend.save_assessment(&document).await {
        Ok(response) if response.is_success() => {
            info!(id = %document.id, questions = document.questions.len(), "assessment saved");
            prompt.alert(SAVE_SUCCEEDED);
            SaveOutcome::Saved {
                redirect: DASHBOARD_PATH.to_string(),
            }
        }
        Ok(response) => {
            warn!(id = %document.id, status = ?response.status, "save rejected");
            prompt.alert(SAVE_FAILED);
            SaveOutcome::Failed
        }
        Err(err) => {
            warn!(id = %document.id, error = %err, "save failed");
            prompt.alert(SAVE_FAILED);
            SaveOutcome::Failed
        }
    }
}
