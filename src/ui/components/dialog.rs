//! Centered modal dialogs

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const MAX_WIDTH: u16 = 60;
/// 2 chars padding on each side
const PADDING: u16 = 4;

/// Render the failure dialog over the current screen
pub fn render_error_dialog(frame: &mut Frame, message: &str) {
    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let hint = Line::from(vec![
        Span::raw("Press "),
        Span::styled("Enter", key),
        Span::raw(" or "),
        Span::styled("Esc", key),
        Span::raw(" to go back to the form"),
    ]);
    render_dialog(frame, "Booking failed", Color::Red, message, hint);
}

fn render_dialog(frame: &mut Frame, title: &str, color: Color, message: &str, hint: Line) {
    let area = frame.area();
    let max_width = MAX_WIDTH.min(area.width);
    let wrapped = wrap_text(message, max_width.saturating_sub(PADDING + 2) as usize);

    let content_width = wrapped
        .iter()
        .map(|l| l.chars().count())
        .chain([title.chars().count(), hint.width()])
        .max()
        .unwrap_or(0) as u16;
    let width = (content_width + PADDING + 2).min(max_width);
    // title + blank + message + blank + hint + borders
    let height = (wrapped.len() as u16 + 6).min(area.height);

    let dialog_area = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, dialog_area);

    let mut content = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    content.extend(wrapped.into_iter().map(Line::from));
    content.push(Line::from(""));
    content.push(hint);

    let dialog = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(Color::Black)),
    );
    frame.render_widget(dialog, dialog_area);
}

/// Greedy word wrap; explicit newlines are kept
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let needed = current.chars().count() + word.chars().count() + 1;
            if needed > max_width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("Slot taken", 40), vec!["Slot taken"]);
        assert_eq!(
            wrap_text("one two three", 8),
            vec!["one two", "three"]
        );
        assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_error_dialog_renders_message() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|frame| render_error_dialog(frame, "Slot taken"))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Booking failed"));
        assert!(text.contains("Slot taken"));
    }
}
