//! Terminal editing session: the question list editor plus the form fields
//! around it, driven by key presses.

use std::path::Path;

use crossterm::event::KeyCode;
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::editor::{Answered, BufferHost, BufferWidget, QuestionListEditor, RichTextWidget};
use crate::error::EditorError;
use crate::logo::{encode_logo_file, mime_for};
use crate::models::{AssessmentDocument, OptionField, QuestionField, QuestionKind};
use crate::protocol::FileBlob;
use crate::save::{FormFields, SaveOutcome, save_assessment};

/// Container of the essay's rich-text widget.
const ESSAY_CONTAINER: &str = "essayEditor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Form,
    Questions,
}

/// Editable fields of the form pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    ClassName,
    Date,
    Instructions,
    Font,
    Columns,
    EssayTheme,
    EssayInstructions,
    EssayBody,
}

impl FormField {
    const ALWAYS: [FormField; 6] = [
        FormField::Title,
        FormField::ClassName,
        FormField::Date,
        FormField::Instructions,
        FormField::Font,
        FormField::Columns,
    ];

    const ESSAY: [FormField; 3] = [
        FormField::EssayTheme,
        FormField::EssayInstructions,
        FormField::EssayBody,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Título",
            FormField::ClassName => "Turma",
            FormField::Date => "Data",
            FormField::Instructions => "Instruções",
            FormField::Font => "Fonte",
            FormField::Columns => "Colunas",
            FormField::EssayTheme => "Tema da redação",
            FormField::EssayInstructions => "Instruções da redação",
            FormField::EssayBody => "Textos motivadores",
        }
    }
}

/// Part of the selected question card that has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Body,
    Image,
    Option(usize),
}

/// What a line of typed input will be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    Form(FormField),
    Body(usize),
    QuestionImage(usize),
    OptionText(usize, usize),
    OptionImageFile(usize, usize),
    LogoFile,
}

impl InputTarget {
    pub fn prompt(self) -> &'static str {
        match self {
            InputTarget::Form(field) => field.label(),
            InputTarget::Body(_) => "Enunciado (HTML)",
            InputTarget::QuestionImage(_) => "Imagem URL",
            InputTarget::OptionText(_, _) => "Alternativa",
            InputTarget::OptionImageFile(_, _) => "Arquivo de imagem",
            InputTarget::LogoFile => "Arquivo do logo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Input { target: InputTarget, buffer: String },
    ConfirmRemove(usize),
}

pub struct App<B: Backend> {
    editor: QuestionListEditor<BufferHost>,
    form: FormFields,
    essay: BufferWidget,
    backend: B,
    pub pane: Pane,
    pub mode: Mode,
    selected_field: usize,
    selected_question: usize,
    focus: Focus,
    status: Option<String>,
    /// Where the session continues after a successful save.
    pub redirect: Option<String>,
    pub should_quit: bool,
}

impl<B: Backend> App<B> {
    pub fn new(document: AssessmentDocument, backend: B) -> Self {
        let form = FormFields::from_document(&document);
        let mut essay = BufferWidget::new(ESSAY_CONTAINER);
        essay.set_content(&form.essay.body_html);

        Self {
            editor: QuestionListEditor::with_questions(BufferHost::new(), document.questions),
            form,
            essay,
            backend,
            pane: Pane::Questions,
            mode: Mode::Browse,
            selected_field: 0,
            selected_question: 0,
            focus: Focus::Body,
            status: None,
            redirect: None,
            should_quit: false,
        }
    }

    pub fn editor(&self) -> &QuestionListEditor<BufferHost> {
        &self.editor
    }

    pub fn form(&self) -> &FormFields {
        &self.form
    }

    pub fn essay_body(&self) -> String {
        self.essay.content()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn selected_question(&self) -> usize {
        self.selected_question
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Form fields currently shown; essay fields only while the essay is on.
    pub fn visible_fields(&self) -> Vec<FormField> {
        let mut fields = FormField::ALWAYS.to_vec();
        if self.form.essay.enabled {
            fields.extend(FormField::ESSAY);
        }
        fields
    }

    pub fn selected_field(&self) -> Option<FormField> {
        self.visible_fields().get(self.selected_field).copied()
    }

    pub fn field_value(&self, field: FormField) -> String {
        match field {
            FormField::Title => self.form.title.clone(),
            FormField::ClassName => self.form.class_name.clone(),
            FormField::Date => self.form.date.clone(),
            FormField::Instructions => self.form.instructions.clone(),
            FormField::Font => self.form.font.clone(),
            FormField::Columns => self.form.columns.clone(),
            FormField::EssayTheme => self.form.essay.theme.clone(),
            FormField::EssayInstructions => self.form.essay.instructions.clone(),
            FormField::EssayBody => self.essay.content(),
        }
    }

    fn set_field(&mut self, field: FormField, value: String) {
        match field {
            FormField::Title => self.form.title = value,
            FormField::ClassName => self.form.class_name = value,
            FormField::Date => self.form.date = value,
            FormField::Instructions => self.form.instructions = value,
            FormField::Font => self.form.font = value,
            FormField::Columns => self.form.columns = value,
            FormField::EssayTheme => self.form.essay.theme = value,
            FormField::EssayInstructions => self.form.essay.instructions = value,
            FormField::EssayBody => self.essay.edit(&value),
        }
    }

    /// Handle one key press.
    pub async fn handle_key(&mut self, key: KeyCode) {
        match self.mode.clone() {
            Mode::Browse => self.handle_browse_key(key).await,
            Mode::Input { target, buffer } => self.handle_input_key(key, target, buffer).await,
            Mode::ConfirmRemove(position) => self.handle_confirm_key(key, position),
        }
    }

    async fn handle_browse_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Tab => {
                self.pane = match self.pane {
                    Pane::Form => Pane::Questions,
                    Pane::Questions => Pane::Form,
                };
            }
            KeyCode::Char('s') | KeyCode::Char('S') => self.save().await,
            KeyCode::Char('o') => self.begin_input(InputTarget::LogoFile),
            KeyCode::Char('e') => {
                self.form.essay.enabled = !self.form.essay.enabled;
                self.clamp_selection();
            }
            _ => match self.pane {
                Pane::Form => self.handle_form_key(key),
                Pane::Questions => self.handle_question_key(key),
            },
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        let count = self.visible_fields().len();
        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_field = (self.selected_field + 1) % count;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_field = (self.selected_field + count - 1) % count;
            }
            KeyCode::Enter => {
                if let Some(field) = self.selected_field() {
                    self.begin_input(InputTarget::Form(field));
                }
            }
            _ => {}
        }
    }

    fn handle_question_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('m') => self.add_question(QuestionKind::MultipleChoice),
            KeyCode::Char('t') => self.add_question(QuestionKind::TrueFalse),
            KeyCode::Char('d') => self.add_question(QuestionKind::Discursive),
            _ if self.editor.is_empty() => {}
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_question = (self.selected_question + 1).min(self.editor.len() - 1);
                self.focus = Focus::Body;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_question = self.selected_question.saturating_sub(1);
                self.focus = Focus::Body;
            }
            KeyCode::Right | KeyCode::Char('l') => self.move_focus(1),
            KeyCode::Left | KeyCode::Char('h') => self.move_focus(-1),
            KeyCode::Char('x') => {
                self.status = Some(format!("{} (y/n)", crate::editor::prompt::CONFIRM_REMOVE));
                self.mode = Mode::ConfirmRemove(self.selected_question);
            }
            KeyCode::Enter => {
                let position = self.selected_question;
                let target = match self.focus {
                    Focus::Body => InputTarget::Body(position),
                    Focus::Image => InputTarget::QuestionImage(position),
                    Focus::Option(option) => InputTarget::OptionText(position, option),
                };
                self.begin_input(target);
            }
            KeyCode::Char('i') => {
                if let Focus::Option(option) = self.focus {
                    self.begin_input(InputTarget::OptionImageFile(self.selected_question, option));
                }
            }
            KeyCode::Char('r') => {
                if let Focus::Option(option) = self.focus {
                    let result = self.editor.remove_option_image(self.selected_question, option);
                    self.report(result);
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyCode, position: usize) {
        let mut prompt = match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => Answered::yes(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Answered::no(),
            _ => return,
        };

        self.mode = Mode::Browse;
        self.status = None;
        let result = self.editor.remove(position, &mut prompt);
        self.report(result.map(|_| ()));
        self.clamp_selection();
    }

    async fn handle_input_key(&mut self, key: KeyCode, target: InputTarget, mut buffer: String) {
        match key {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                return;
            }
            KeyCode::Enter => {
                self.mode = Mode::Browse;
                self.commit_input(target, buffer).await;
                return;
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => buffer.push(c),
            _ => {}
        }
        self.mode = Mode::Input { target, buffer };
    }

    fn begin_input(&mut self, target: InputTarget) {
        let buffer = match target {
            InputTarget::Form(field) => self.field_value(field),
            InputTarget::Body(position) => self
                .editor
                .widget(position)
                .map(|w| w.content())
                .unwrap_or_default(),
            InputTarget::QuestionImage(position) => self
                .editor
                .question(position)
                .map(|q| q.image.clone())
                .unwrap_or_default(),
            InputTarget::OptionText(position, option) => self
                .editor
                .question(position)
                .and_then(|q| q.options.get(option))
                .map(|o| o.text.clone())
                .unwrap_or_default(),
            InputTarget::OptionImageFile(_, _) | InputTarget::LogoFile => String::new(),
        };
        self.status = None;
        self.mode = Mode::Input { target, buffer };
    }

    async fn commit_input(&mut self, target: InputTarget, value: String) {
        match target {
            InputTarget::Form(field) => self.set_field(field, value),
            InputTarget::Body(position) => {
                if let Some(widget) = self.editor.widget_mut(position) {
                    widget.edit(&value);
                }
                self.editor.sync();
            }
            InputTarget::QuestionImage(position) => {
                let result = self.editor.update_field(position, QuestionField::Image, value);
                self.refresh_view(result);
            }
            InputTarget::OptionText(position, option) => {
                let result = self
                    .editor
                    .update_option(position, option, OptionField::Text, value);
                self.refresh_view(result);
            }
            InputTarget::OptionImageFile(position, option) => {
                self.upload_option_image(position, option, value.trim()).await;
            }
            InputTarget::LogoFile => match encode_logo_file(value.trim()) {
                Ok(data_url) => {
                    self.form.school_logo = data_url;
                    self.status = Some("Logo carregado.".to_string());
                }
                Err(err) => self.report(Err(err.into())),
            },
        }
    }

    fn add_question(&mut self, kind: QuestionKind) {
        self.editor.add(kind);
        self.selected_question = self.editor.len() - 1;
        self.focus = Focus::Body;
    }

    async fn upload_option_image(&mut self, position: usize, option: usize, path: &str) {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                self.report(Err(EditorError::Io(err)));
                return;
            }
        };

        let file_name = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        let file = FileBlob::new(file_name.clone(), mime_for(&file_name), bytes);

        let mut prompt = Answered::yes();
        let result = self
            .editor
            .upload_option_image(&self.backend, &mut prompt, position, option, file)
            .await;
        self.status = prompt.last_alert().map(str::to_string);
        self.report(result.map(|_| ()));
    }

    async fn save(&mut self) {
        self.form.essay.body_html = self.essay.content();

        let mut prompt = Answered::yes();
        let outcome = save_assessment(&self.backend, &mut prompt, &mut self.editor, &self.form).await;
        self.status = prompt.last_alert().map(str::to_string);

        if let SaveOutcome::Saved { redirect } = outcome {
            debug!(%redirect, "leaving editor after save");
            self.redirect = Some(redirect);
            self.should_quit = true;
        }
    }

    fn move_focus(&mut self, step: isize) {
        let option_count = self
            .editor
            .question(self.selected_question)
            .map(|q| q.options.len())
            .unwrap_or(0);
        let stops = 2 + option_count;
        let index = match self.focus {
            Focus::Body => 0,
            Focus::Image => 1,
            Focus::Option(option) => 2 + option,
        };
        let next = (index as isize + step).rem_euclid(stops as isize) as usize;
        self.focus = match next {
            0 => Focus::Body,
            1 => Focus::Image,
            n => Focus::Option(n - 2),
        };
    }

    fn clamp_selection(&mut self) {
        self.selected_question = self
            .selected_question
            .min(self.editor.len().saturating_sub(1));
        self.focus = Focus::Body;
        let fields = self.visible_fields().len();
        if self.selected_field >= fields {
            self.selected_field = fields - 1;
        }
    }

    /// The cards are the only display of option and image values, so a
    /// committed field edit rebuilds them.
    fn refresh_view(&mut self, result: Result<(), EditorError>) {
        if result.is_ok() {
            self.editor.render();
        }
        self.report(result);
    }

    fn report(&mut self, result: Result<(), EditorError>) {
        if let Err(err) = result {
            warn!(error = %err, "editing action failed");
            self.status = Some(err.to_string());
        }
    }
}
