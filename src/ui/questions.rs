use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::{App, Focus, Pane};
use crate::backend::Backend;
use crate::view::QuestionCard;

pub fn render<B: Backend>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let active = app.pane == Pane::Questions;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(active))
        .title(" Questões ")
        .title_style(Style::default().fg(Color::Cyan))
        .padding(Padding::horizontal(1));

    let view = app.editor().view();
    if view.is_empty() {
        let hint = Paragraph::new("Nenhuma questão. [m] múltipla escolha · [t] certo/errado · [d] discursiva")
            .wrap(Wrap { trim: true })
            .fg(Color::DarkGray)
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let mut lines = Vec::new();
    let mut selected_start = 0;
    for card in &view.cards {
        let selected = card.position == app.selected_question();
        if selected {
            selected_start = lines.len();
        }
        let body = app
            .editor()
            .question(card.position)
            .map(|q| q.text.as_str())
            .unwrap_or_default();
        let focus = (active && selected).then(|| app.focus());
        push_card(&mut lines, card, body, selected, focus);
    }

    // Keep the selected card in view.
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = selected_start.saturating_sub(visible / 3) as u16;

    let widget = Paragraph::new(lines).scroll((scroll, 0)).block(block);
    frame.render_widget(widget, area);
}

fn push_card<'a>(
    lines: &mut Vec<Line<'a>>,
    card: &'a QuestionCard,
    body: &'a str,
    selected: bool,
    focus: Option<Focus>,
) {
    let heading_style = if selected {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::White).bold()
    };
    lines.push(Line::from(Span::styled(card.heading.as_str(), heading_style)));

    lines.push(field_line(
        "Enunciado",
        if body.is_empty() { "—" } else { body },
        focus == Some(Focus::Body),
    ));
    lines.push(field_line(
        "Imagem",
        if card.image_url.is_empty() { "—" } else { card.image_url.as_str() },
        focus == Some(Focus::Image),
    ));

    for row in &card.options {
        let focused = focus == Some(Focus::Option(row.index));
        let style = if focused {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default().fg(Color::White)
        };
        let prefix = if focused { "> " } else { "  " };

        let mut spans = vec![
            Span::styled(prefix, style),
            Span::styled(format!("{}) ", row.letter), style),
            Span::styled(row.text.as_str(), style),
        ];
        if let Some(image) = &row.image {
            spans.push(Span::styled(
                format!("  [imagem: {}]", image),
                Style::default().fg(Color::Green),
            ));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
}

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let style = if focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    let prefix = if focused { "> " } else { "  " };
    Line::from(vec![
        Span::styled(prefix, style),
        Span::styled(format!("{}: ", label), Style::default().fg(Color::Cyan)),
        Span::styled(value, style),
    ])
}

pub(super) fn border_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}
