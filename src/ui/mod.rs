mod form;
mod questions;
mod status;

use ratatui::{prelude::*, widgets::{Block, Paragraph}};

use crate::app::App;
use crate::backend::Backend;

pub fn render<B: Backend>(frame: &mut Frame, app: &App<B>) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);

    let panes = Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);
    form::render(frame, panes[0], app);
    questions::render(frame, panes[1], app);

    status::render_status(frame, chunks[2], app);
    status::render_controls(frame, chunks[3], app);
}

fn render_title<B: Backend>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let title = if app.form().title.is_empty() {
        "Sem Título"
    } else {
        app.form().title.as_str()
    };
    let count = app.editor().len();

    let widget = Paragraph::new(Line::from(vec![
        Span::styled(title, Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("  ·  {} {}", count, if count == 1 { "questão" } else { "questões" }),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .alignment(Alignment::Center);

    frame.render_widget(widget, area);
}
