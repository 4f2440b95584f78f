//! Markup rendering of the view tree.
//!
//! All user-supplied text is escaped and URLs are sanitized. Controls carry
//! `data-action` attributes for the host page to bind after mount; no
//! handler code is ever generated.

use std::fmt::Write;

use super::tree::{Action, OptionRow, QuestionCard, ViewTree};

/// Escape text for use in element content or a quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Drop URLs with a scriptable scheme. Embedded images are allowed.
pub fn sanitize_url(url: &str) -> &str {
    let normalized: String = url
        .trim()
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();

    let blocked = normalized.starts_with("javascript:")
        || normalized.starts_with("vbscript:")
        || (normalized.starts_with("data:") && !normalized.starts_with("data:image/"));

    if blocked { "" } else { url }
}

fn action_attr(action: Action) -> String {
    match action {
        Action::RemoveQuestion { position } => format!("remove-question:{}", position),
        Action::EditQuestionImage { position } => format!("edit-image:{}", position),
        Action::EditOptionText { position, option } => {
            format!("edit-option:{}:{}", position, option)
        }
        Action::AttachOptionImage { position, option } => {
            format!("attach-option-image:{}:{}", position, option)
        }
        Action::RemoveOptionImage { position, option } => {
            format!("remove-option-image:{}:{}", position, option)
        }
    }
}

/// Render the whole tree as the content of the questions container.
pub fn to_markup(tree: &ViewTree) -> String {
    let mut out = String::new();
    for card in &tree.cards {
        write_card(&mut out, card);
    }
    out
}

fn write_card(out: &mut String, card: &QuestionCard) {
    let _ = write!(
        out,
        concat!(
            r#"<div class="card question-card mb-3" data-question-id="{id}">"#,
            r#"<div class="card-header d-flex justify-content-between align-items-center">"#,
            r#"<strong>{heading}</strong>"#,
            r#"<button class="btn btn-sm btn-danger" data-action="{remove}"><i class="fas fa-trash"></i></button>"#,
            r#"</div><div class="card-body">"#,
            r#"<div class="mb-3"><label class="form-label">Enunciado</label>"#,
            r#"<div id="{container}" class="rich-text-body"></div></div>"#,
            r#"<div class="mb-3"><label class="form-label">Imagem URL (Opcional)</label>"#,
            r#"<input type="text" class="form-control" value="{image}" data-action="{edit_image}"></div>"#,
        ),
        id = card.question_id,
        heading = escape(&card.heading),
        remove = action_attr(card.remove),
        container = escape(&card.body_container),
        image = escape(sanitize_url(&card.image_url)),
        edit_image = action_attr(card.edit_image),
    );

    if !card.options.is_empty() {
        out.push_str(r#"<label class="form-label">Alternativas</label>"#);
        for row in &card.options {
            write_option(out, row);
        }
    }

    out.push_str("</div></div>");
}

fn write_option(out: &mut String, row: &OptionRow) {
    let _ = write!(
        out,
        concat!(
            r#"<div class="input-group mb-2">"#,
            r#"<span class="input-group-text">{letter}</span>"#,
            r#"<input type="text" class="form-control" value="{text}" data-action="{edit}">"#,
        ),
        letter = row.letter,
        text = escape(&row.text),
        edit = action_attr(row.edit_text),
    );

    match &row.image {
        Some(url) => {
            let _ = write!(
                out,
                concat!(
                    r#"<img class="option-image" src="{src}" alt="">"#,
                    r#"<button class="btn btn-outline-danger" data-action="{control}">Remover imagem</button>"#,
                ),
                src = escape(sanitize_url(url)),
                control = action_attr(row.image_control),
            );
        }
        None => {
            let _ = write!(
                out,
                r#"<button class="btn btn-outline-secondary" data-action="{control}">Anexar imagem</button>"#,
                control = action_attr(row.image_control),
            );
        }
    }

    out.push_str("</div>");
}
