//! Pure view model of the question list.

use crate::models::{QuestionRecord, option_letter};

/// Container id the rich-text widget of the card at `position` mounts on.
pub fn body_container(position: usize) -> String {
    format!("editor-{}", position)
}

/// A user control, bound to the editor after mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    RemoveQuestion { position: usize },
    EditQuestionImage { position: usize },
    EditOptionText { position: usize, option: usize },
    AttachOptionImage { position: usize, option: usize },
    RemoveOptionImage { position: usize, option: usize },
}

/// One alternative row of a multiple-choice card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRow {
    pub index: usize,
    pub letter: char,
    pub text: String,
    /// Attached image, if any.
    pub image: Option<String>,
    pub edit_text: Action,
    /// Attach when no image is set, remove otherwise.
    pub image_control: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionCard {
    pub position: usize,
    pub question_id: u64,
    pub heading: String,
    pub kind_label: Option<&'static str>,
    pub body_container: String,
    pub image_url: String,
    pub remove: Action,
    pub edit_image: Action,
    pub options: Vec<OptionRow>,
}

/// Everything the display container shows, in question order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewTree {
    pub cards: Vec<QuestionCard>,
}

impl ViewTree {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, position: usize) -> Option<&QuestionCard> {
        self.cards.get(position)
    }

    /// Every control in display order.
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.cards.iter().flat_map(|card| {
            [card.remove, card.edit_image].into_iter().chain(
                card.options
                    .iter()
                    .flat_map(|row| [row.edit_text, row.image_control]),
            )
        })
    }
}

/// Build the view of `questions`. Does not touch any widget.
pub fn render_model(questions: &[QuestionRecord]) -> ViewTree {
    let cards = questions
        .iter()
        .enumerate()
        .map(|(position, question)| render_card(position, question))
        .collect();

    ViewTree { cards }
}

fn render_card(position: usize, question: &QuestionRecord) -> QuestionCard {
    let kind_label = question.kind.label();
    let heading = match kind_label {
        Some(label) => format!("Questão {} - {}", position + 1, label),
        None => format!("Questão {}", position + 1),
    };

    let options = if question.kind.has_options() {
        question
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let image_control = if option.has_image() {
                    Action::RemoveOptionImage { position, option: index }
                } else {
                    Action::AttachOptionImage { position, option: index }
                };
                OptionRow {
                    index,
                    letter: option_letter(index),
                    text: option.text.clone(),
                    image: option.has_image().then(|| option.image.clone()),
                    edit_text: Action::EditOptionText { position, option: index },
                    image_control,
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    QuestionCard {
        position,
        question_id: question.id,
        heading,
        kind_label,
        body_container: body_container(position),
        image_url: question.image.clone(),
        remove: Action::RemoveQuestion { position },
        edit_image: Action::EditQuestionImage { position },
        options,
    }
}
