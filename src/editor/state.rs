//! Question list editing model.
//!
//! The editor owns the ordered question records and one live rich-text
//! widget per rendered question. Every structural change rebuilds the whole
//! view and remounts every widget; the records are always the source of
//! truth, so tearing widgets down never loses an edit.

use std::collections::BTreeMap;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::error::EditorError;
use crate::models::{
    IdClock, OptionField, OptionRecord, QuestionField, QuestionKind, QuestionRecord,
};
use crate::protocol::FileBlob;
use crate::view::{ViewTree, render_model};

use super::prompt::{CONFIRM_REMOVE, Prompt, UPLOAD_FAILED};
use super::widget::{RichTextWidget, WidgetConfig, WidgetHost};

/// A body edit reported by a widget of render pass `generation`.
#[derive(Debug)]
struct TextChange {
    generation: u64,
    position: usize,
    html: String,
}

pub struct QuestionListEditor<H: WidgetHost> {
    questions: Vec<QuestionRecord>,
    /// Live widgets by position. Rebuilt on every render.
    editors: BTreeMap<usize, H::Widget>,
    view: ViewTree,
    host: H,
    widget_config: WidgetConfig,
    ids: IdClock,
    generation: u64,
    changes_tx: mpsc::UnboundedSender<TextChange>,
    changes_rx: mpsc::UnboundedReceiver<TextChange>,
}

impl<H: WidgetHost> QuestionListEditor<H> {
    /// Start a session without questions.
    pub fn new(host: H) -> Self {
        Self::with_questions(host, Vec::new())
    }

    /// Start a session from previously saved questions and render them.
    pub fn with_questions(host: H, questions: Vec<QuestionRecord>) -> Self {
        let floor = questions.iter().map(|q| q.id).max().unwrap_or(0);
        let (changes_tx, changes_rx) = mpsc::unbounded_channel();

        let mut editor = Self {
            questions,
            editors: BTreeMap::new(),
            view: ViewTree::default(),
            host,
            widget_config: WidgetConfig::question_body(),
            ids: IdClock::seeded(floor),
            generation: 0,
            changes_tx,
            changes_rx,
        };
        editor.render();
        editor
    }

    /// Records as of the last [`sync`](Self::sync).
    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub fn question(&self, position: usize) -> Option<&QuestionRecord> {
        self.questions.get(position)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The view produced by the last render.
    pub fn view(&self) -> &ViewTree {
        &self.view
    }

    pub fn widget(&self, position: usize) -> Option<&H::Widget> {
        self.editors.get(&position)
    }

    pub fn widget_mut(&mut self, position: usize) -> Option<&mut H::Widget> {
        self.editors.get_mut(&position)
    }

    pub fn widget_count(&self) -> usize {
        self.editors.len()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Synced copy of every record, for serialization.
    pub fn snapshot(&mut self) -> Vec<QuestionRecord> {
        self.sync();
        self.questions.clone()
    }

    /// Apply pending widget change notifications to the records.
    ///
    /// Notifications from widgets of an earlier render pass are dropped.
    /// Returns how many were applied.
    pub fn sync(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(change) = self.changes_rx.try_recv() {
            if change.generation != self.generation {
                continue;
            }
            if let Some(question) = self.questions.get_mut(change.position) {
                question.text = change.html;
                applied += 1;
            }
        }
        applied
    }

    /// Append a new empty question of `kind` and return its id.
    pub fn add(&mut self, kind: QuestionKind) -> u64 {
        let id = self.ids.next_id();
        debug!(id, kind = %kind, "adding question");
        self.questions.push(QuestionRecord::new(id, kind));
        self.render();
        id
    }

    /// Remove the question at `position` once the user confirms.
    ///
    /// Returns `Ok(false)` when the user declines.
    pub fn remove(&mut self, position: usize, prompt: &mut dyn Prompt) -> Result<bool, EditorError> {
        self.check_position(position)?;

        if !prompt.confirm(CONFIRM_REMOVE) {
            debug!(position, "removal declined");
            return Ok(false);
        }

        self.sync();
        let removed = self.questions.remove(position);
        debug!(position, id = removed.id, "removed question");
        self.render();
        Ok(true)
    }

    /// Replace a scalar field of the question at `position`.
    pub fn update_field(
        &mut self,
        position: usize,
        field: QuestionField,
        value: impl Into<String>,
    ) -> Result<(), EditorError> {
        let question = self.question_mut(position)?;
        match field {
            QuestionField::Image => question.image = value.into(),
        }
        Ok(())
    }

    /// Replace one field of one option.
    pub fn update_option(
        &mut self,
        position: usize,
        option: usize,
        field: OptionField,
        value: impl Into<String>,
    ) -> Result<(), EditorError> {
        let record = self.option_mut(position, option)?;
        match field {
            OptionField::Text => record.text = value.into(),
            OptionField::Image => record.image = value.into(),
        }
        Ok(())
    }

    /// Upload `file` and attach the hosted image to an option.
    ///
    /// A failed upload alerts the user and leaves every record untouched;
    /// it returns `Ok(false)`. Bad indices are rejected before any request.
    pub async fn upload_option_image<B>(
        &mut self,
        backend: &B,
        prompt: &mut dyn Prompt,
        position: usize,
        option: usize,
        file: FileBlob,
    ) -> Result<bool, EditorError>
    where
        B: Backend + ?Sized,
    {
        self.option_mut(position, option)?;

        match backend.upload_image(file).await {
            Ok(url) => {
                info!(position, option, %url, "option image uploaded");
                self.option_mut(position, option)?.image = url;
                self.render();
                Ok(true)
            }
            Err(err) => {
                warn!(position, option, error = %err, "option image upload failed");
                prompt.alert(UPLOAD_FAILED);
                Ok(false)
            }
        }
    }

    pub fn remove_option_image(&mut self, position: usize, option: usize) -> Result<(), EditorError> {
        self.option_mut(position, option)?.image.clear();
        self.render();
        Ok(())
    }

    /// Rebuild the view and remount every widget.
    pub fn render(&mut self) -> &ViewTree {
        self.sync();
        self.editors.clear();
        self.generation += 1;
        self.view = render_model(&self.questions);

        for card in &self.view.cards {
            let mut widget = self.host.mount(&card.body_container, &self.widget_config);
            widget.set_content(&self.questions[card.position].text);

            let tx = self.changes_tx.clone();
            let generation = self.generation;
            let position = card.position;
            widget.on_change(Box::new(move |html| {
                let _ = tx.send(TextChange {
                    generation,
                    position,
                    html: html.to_string(),
                });
            }));

            self.editors.insert(position, widget);
        }

        debug!(
            questions = self.questions.len(),
            generation = self.generation,
            "rendered question list"
        );
        &self.view
    }

    fn check_position(&self, position: usize) -> Result<(), EditorError> {
        if position < self.questions.len() {
            Ok(())
        } else {
            Err(EditorError::QuestionOutOfRange {
                position,
                len: self.questions.len(),
            })
        }
    }

    fn question_mut(&mut self, position: usize) -> Result<&mut QuestionRecord, EditorError> {
        let len = self.questions.len();
        self.questions
            .get_mut(position)
            .ok_or(EditorError::QuestionOutOfRange { position, len })
    }

    fn option_mut(&mut self, position: usize, option: usize) -> Result<&mut OptionRecord, EditorError> {
        self.question_mut(position)?
            .options
            .get_mut(option)
            .ok_or(EditorError::OptionOutOfRange { position, option })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;
    use crate::data::parse_initial_questions;
    use crate::editor::prompt::Answered;
    use crate::editor::widget::{BufferHost, BufferWidget};
    use crate::view::Action;

    fn editor() -> QuestionListEditor<BufferHost> {
        QuestionListEditor::new(BufferHost::new())
    }

    fn blob() -> FileBlob {
        FileBlob::new("x.png", "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    #[test]
    fn test_add_multiple_choice_has_five_blank_options() {
        let mut editor = editor();
        editor.add(QuestionKind::MultipleChoice);
        let q = editor.question(0).unwrap();
        assert_eq!(q.options.len(), 5);
        assert!(q.options.iter().all(|o| *o == OptionRecord::default()));
        assert_eq!(editor.view().len(), 1);
        assert_eq!(editor.widget_count(), 1);
    }

    #[test]
    fn test_add_other_kinds_has_no_options() {
        let mut editor = editor();
        editor.add(QuestionKind::Discursive);
        editor.add(QuestionKind::TrueFalse);
        editor.add(QuestionKind::from("unknown"));
        assert!(editor.questions().iter().all(|q| q.options.is_empty()));
        assert_eq!(editor.view().cards[2].kind_label, None);
    }

    #[test]
    fn test_add_remove_sequence_keeps_survivor_order() {
        let mut editor = editor();
        let ids: Vec<u64> = (0..6)
            .map(|i| {
                editor.add(if i % 2 == 0 {
                    QuestionKind::Discursive
                } else {
                    QuestionKind::MultipleChoice
                })
            })
            .collect();

        assert!(editor.remove(1, &mut Answered::yes()).unwrap());
        assert!(!editor.remove(0, &mut Answered::no()).unwrap());
        assert!(editor.remove(3, &mut Answered::yes()).unwrap());
        let late = editor.add(QuestionKind::TrueFalse);

        let surviving: Vec<u64> = editor.questions().iter().map(|q| q.id).collect();
        assert_eq!(surviving, vec![ids[0], ids[2], ids[3], ids[5], late]);
        assert_eq!(editor.len(), 7 - 2);
        assert!(late > ids[5]);
    }

    #[test]
    fn test_declined_removal_has_no_side_effects() {
        let mut editor = editor();
        editor.add(QuestionKind::Discursive);
        let before = editor.questions().to_vec();
        let mounted = editor.host().mounted();

        assert!(!editor.remove(0, &mut Answered::no()).unwrap());
        assert_eq!(editor.questions(), &before[..]);
        assert_eq!(editor.host().mounted(), mounted);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut editor = editor();
        let err = editor.remove(0, &mut Answered::yes()).unwrap_err();
        assert!(matches!(err, EditorError::QuestionOutOfRange { position: 0, len: 0 }));
    }

    #[test]
    fn test_update_option_touches_only_its_target() {
        let mut editor = editor();
        editor.add(QuestionKind::MultipleChoice);
        editor.add(QuestionKind::MultipleChoice);
        editor.add(QuestionKind::Discursive);
        let before = editor.questions().to_vec();

        editor.update_option(1, 3, OptionField::Text, "Lisboa").unwrap();

        let after = editor.questions();
        for (position, (old, new)) in before.iter().zip(after).enumerate() {
            if position != 1 {
                assert_eq!(old, new);
                continue;
            }
            assert_eq!(old.id, new.id);
            assert_eq!(old.text, new.text);
            assert_eq!(old.image, new.image);
            for (index, (o, n)) in old.options.iter().zip(&new.options).enumerate() {
                if index == 3 {
                    assert_eq!(n.text, "Lisboa");
                    assert_eq!(o.image, n.image);
                } else {
                    assert_eq!(o, n);
                }
            }
        }
    }

    #[test]
    fn test_update_guards_indices() {
        let mut editor = editor();
        editor.add(QuestionKind::Discursive);
        assert!(matches!(
            editor.update_option(0, 0, OptionField::Text, "x"),
            Err(EditorError::OptionOutOfRange { position: 0, option: 0 })
        ));
        assert!(editor.update_field(4, QuestionField::Image, "/a.png").is_err());
        editor.update_field(0, QuestionField::Image, "/a.png").unwrap();
        assert_eq!(editor.question(0).unwrap().image, "/a.png");
    }

    #[test]
    fn test_widget_edits_write_back_through_listener() {
        let mut editor = editor();
        editor.add(QuestionKind::Discursive);
        editor.widget_mut(0).unwrap().edit("<p>Explain X</p>");

        assert_eq!(editor.question(0).unwrap().text, "");
        assert_eq!(editor.sync(), 1);
        assert_eq!(editor.question(0).unwrap().text, "<p>Explain X</p>");
    }

    #[test]
    fn test_render_seeds_widgets_and_keeps_pending_edits() {
        let mut editor = editor();
        editor.add(QuestionKind::Discursive);
        editor.widget_mut(0).unwrap().edit("<p>draft</p>");

        // The add re-renders before anyone synced; the edit must survive.
        editor.add(QuestionKind::TrueFalse);
        assert_eq!(editor.question(0).unwrap().text, "<p>draft</p>");
        assert_eq!(editor.widget(0).unwrap().content(), "<p>draft</p>");
        assert_eq!(editor.widget(1).unwrap().container(), "editor-1");
    }

    #[test]
    fn test_stale_widget_notifications_are_dropped() {
        let mut editor = editor();
        editor.add(QuestionKind::Discursive);
        editor.add(QuestionKind::Discursive);

        let mut stale: BufferWidget = editor.editors.remove(&1).unwrap();
        editor.remove(0, &mut Answered::yes()).unwrap();
        stale.edit("<p>from a dead widget</p>");

        assert_eq!(editor.sync(), 0);
        assert_eq!(editor.question(0).unwrap().text, "");
    }

    #[test]
    fn test_legacy_question_loads_and_renders_lettered_rows() {
        let payload = r#"[{"id": 1700000000000, "type": "multiple_choice", "text": "<p>Capital?</p>",
            "image": "", "options": ["Paris", "London", "Rome", "Berlin", "Madrid"]}]"#;
        let editor = QuestionListEditor::with_questions(
            BufferHost::new(),
            parse_initial_questions(payload).unwrap(),
        );

        let q = editor.question(0).unwrap();
        assert_eq!(q.options[0], OptionRecord::new("Paris"));

        let rows = &editor.view().cards[0].options;
        let labelled: Vec<(char, &str)> = rows.iter().map(|r| (r.letter, r.text.as_str())).collect();
        assert_eq!(
            labelled,
            vec![('A', "Paris"), ('B', "London"), ('C', "Rome"), ('D', "Berlin"), ('E', "Madrid")]
        );
        assert_eq!(editor.widget(0).unwrap().content(), "<p>Capital?</p>");
    }

    #[test]
    fn test_new_ids_exceed_loaded_ids() {
        let mut loaded = QuestionRecord::new(u64::MAX / 2, QuestionKind::Discursive);
        loaded.text = "<p>old</p>".to_string();
        let mut editor = QuestionListEditor::with_questions(BufferHost::new(), vec![loaded]);
        assert!(editor.add(QuestionKind::Discursive) > u64::MAX / 2);
    }

    #[test]
    fn test_add_after_loading_the_largest_id() {
        let loaded = QuestionRecord::new(u64::MAX, QuestionKind::Discursive);
        let mut editor = QuestionListEditor::with_questions(BufferHost::new(), vec![loaded]);

        assert_eq!(editor.add(QuestionKind::Discursive), u64::MAX);
        assert_eq!(editor.len(), 2);
    }

    #[tokio::test]
    async fn test_upload_option_image_sets_url_and_rerenders() {
        let mut editor = editor();
        editor.add(QuestionKind::MultipleChoice);
        let backend = FakeBackend::uploading("/img/x.png");
        let mut prompt = Answered::yes();

        let uploaded = editor
            .upload_option_image(&backend, &mut prompt, 0, 2, blob())
            .await
            .unwrap();

        assert!(uploaded);
        assert_eq!(editor.question(0).unwrap().options[2].image, "/img/x.png");
        assert_eq!(
            editor.view().cards[0].options[2].image_control,
            Action::RemoveOptionImage { position: 0, option: 2 }
        );
        assert_eq!(backend.uploads.lock().unwrap()[0].file_name, "x.png");
        assert!(prompt.alerts.is_empty());
    }

    #[tokio::test]
    async fn test_failed_upload_alerts_and_keeps_state() {
        let mut editor = editor();
        editor.add(QuestionKind::MultipleChoice);
        let before = editor.questions().to_vec();
        let backend = FakeBackend::default();
        let mut prompt = Answered::yes();

        let uploaded = editor
            .upload_option_image(&backend, &mut prompt, 0, 1, blob())
            .await
            .unwrap();

        assert!(!uploaded);
        assert_eq!(editor.questions(), &before[..]);
        assert_eq!(prompt.last_alert(), Some(UPLOAD_FAILED));
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_target_before_sending() {
        let mut editor = editor();
        editor.add(QuestionKind::TrueFalse);
        let backend = FakeBackend::uploading("/img/x.png");

        let result = editor
            .upload_option_image(&backend, &mut Answered::yes(), 0, 0, blob())
            .await;

        assert!(result.is_err());
        assert!(backend.uploads.lock().unwrap().is_empty());
    }

    #[test]
    fn test_remove_option_image() {
        let mut editor = editor();
        editor.add(QuestionKind::MultipleChoice);
        editor.update_option(0, 4, OptionField::Image, "/img/e.png").unwrap();
        editor.render();
        assert!(editor.view().cards[0].options[4].image.is_some());

        editor.remove_option_image(0, 4).unwrap();
        assert_eq!(editor.question(0).unwrap().options[4].image, "");
        assert_eq!(editor.view().cards[0].options[4].image, None);
    }
}
