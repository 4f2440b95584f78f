use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::{App, Mode, Pane};
use crate::backend::Backend;

/// Input line, confirmation or the last notice.
pub fn render_status<B: Backend>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let line = match &app.mode {
        Mode::Input { target, buffer } => Line::from(vec![
            Span::styled(format!("{}: ", target.prompt()), Style::default().fg(Color::Cyan)),
            Span::styled(buffer.as_str(), Style::default().fg(Color::White)),
            Span::styled("█", Style::default().fg(Color::DarkGray)),
        ]),
        Mode::ConfirmRemove(_) | Mode::Browse => match app.status() {
            Some(status) => Line::from(Span::styled(status, Style::default().fg(Color::Yellow).bold())),
            None => Line::from(""),
        },
    };

    frame.render_widget(Paragraph::new(line), area);
}

pub fn render_controls<B: Backend>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let text = match (&app.mode, app.pane) {
        (Mode::Input { .. }, _) => "Enter confirmar  ·  Esc cancelar",
        (Mode::ConfirmRemove(_), _) => "y remover  ·  n manter",
        (Mode::Browse, Pane::Questions) => {
            "m/t/d nova  ·  j/k questão  ·  h/l campo  ·  Enter editar  ·  i/r imagem  ·  x remover  ·  Tab form  ·  s salvar  ·  q sair"
        }
        (Mode::Browse, Pane::Form) => {
            "j/k campo  ·  Enter editar  ·  o logo  ·  e redação  ·  Tab questões  ·  s salvar  ·  q sair"
        }
    };

    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
