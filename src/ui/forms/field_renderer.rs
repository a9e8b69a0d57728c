//! Field rendering utilities for forms

use crate::state::FormField;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// How a field should look this frame
pub struct FieldView<'a> {
    pub field: &'a FormField,
    /// Text to show; already mapped to a label for choice fields
    pub value: &'a str,
    pub is_active: bool,
    /// Inline validation message
    pub error: Option<String>,
}

/// Draw a form field using FormField from the domain layer
pub fn draw_field(frame: &mut Frame, area: Rect, view: FieldView) {
    let FieldView {
        field,
        value,
        is_active,
        error,
    } = view;

    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    let border_style = match (&error, is_active) {
        (Some(_), _) => Style::default().fg(Color::Red),
        (None, true) => Style::default().fg(Color::Cyan),
        (None, false) => Style::default().fg(Color::DarkGray),
    };

    let placeholder = if field.field.is_choice() {
        "(select with ←/→)"
    } else {
        "(empty)"
    };
    let display_value = if value.is_empty() && !is_active {
        placeholder
    } else {
        value
    };

    let cursor = if is_active && !field.field.is_choice() {
        "▌"
    } else {
        ""
    };

    let content = if field.is_multiline() {
        let mut lines: Vec<Line> = display_value
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), style)))
            .collect();
        if display_value.ends_with('\n') {
            lines.push(Line::from(""));
        }
        if is_active {
            if let Some(last) = lines.last_mut() {
                last.spans
                    .push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
            } else {
                lines.push(Line::from(Span::styled(
                    cursor,
                    Style::default().fg(Color::Cyan),
                )));
            }
        }
        Paragraph::new(lines)
    } else {
        Paragraph::new(Line::from(vec![
            Span::styled(display_value, style),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ]))
    };

    let title = if field.field.is_required() {
        format!(" {} * ", field.label)
    } else {
        format!(" {} ", field.label)
    };
    let mut block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(message) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {message} "),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}
