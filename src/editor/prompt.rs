//! User-facing confirmations and notices.

/// Interactive surface for destructive-action guards and failure notices.
pub trait Prompt {
    /// Ask the user to confirm `message`. `false` means declined.
    fn confirm(&mut self, message: &str) -> bool;

    /// Show a notice the user has to see.
    fn alert(&mut self, message: &str);
}

/// Prompt with a preset answer that records every alert.
///
/// Front-ends that collect the answer before calling into the editor
/// (a modal `y/n` in the terminal, for instance) hand one of these over.
#[derive(Debug, Default)]
pub struct Answered {
    pub answer: bool,
    pub alerts: Vec<String>,
}

impl Answered {
    pub fn yes() -> Self {
        Self {
            answer: true,
            alerts: Vec::new(),
        }
    }

    pub fn no() -> Self {
        Self::default()
    }

    pub fn last_alert(&self) -> Option<&str> {
        self.alerts.last().map(String::as_str)
    }
}

impl Prompt for Answered {
    fn confirm(&mut self, _message: &str) -> bool {
        self.answer
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

/// Confirmation asked before a question is removed.
pub const CONFIRM_REMOVE: &str = "Remover esta questão?";
pub const UPLOAD_FAILED: &str = "Erro ao enviar imagem.";
pub const SAVE_SUCCEEDED: &str = "Avaliação salva com sucesso!";
pub const SAVE_FAILED: &str = "Erro ao salvar.";
