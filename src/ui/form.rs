use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::{App, Pane};
use crate::backend::Backend;

use super::questions::border_style;

pub fn render<B: Backend>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let active = app.pane == Pane::Form;
    let selected = app.selected_field();

    let mut lines: Vec<Line> = app
        .visible_fields()
        .into_iter()
        .map(|field| {
            let is_selected = active && selected == Some(field);
            let style = if is_selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if is_selected { "> " } else { "  " };
            Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(format!("{}: ", field.label()), Style::default().fg(Color::Cyan)),
                Span::styled(app.field_value(field), style),
            ])
        })
        .collect();

    let logo = &app.form().school_logo;
    let logo_text = if logo.is_empty() {
        "—".to_string()
    } else if logo.starts_with("data:") {
        format!("embutido ({} bytes)", logo.len())
    } else {
        logo.clone()
    };

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Logo: ", Style::default().fg(Color::Cyan)),
        Span::raw(logo_text),
    ]));

    let essay = if app.form().essay.enabled { "[x]" } else { "[ ]" };
    lines.push(Line::from(vec![
        Span::styled("  Redação: ", Style::default().fg(Color::Cyan)),
        Span::raw(essay),
    ]));

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(active))
            .title(" Avaliação ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(widget, area);
}
