//! Confirmation screen rendering

use crate::workflow::ConfirmationStep;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Width of the label column
const LABEL_WIDTH: usize = 12;

/// Draw the read-only summary of a booked appointment
pub fn draw(frame: &mut Frame, area: Rect, step: &ConfirmationStep) {
    let label_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(
            "Your appointment has been booked.",
            Style::default().fg(Color::Green),
        )),
        Line::from(""),
    ];
    for row in step.summary() {
        let mut values = row.value.lines();
        let first = values.next().unwrap_or_default().to_string();
        lines.push(Line::from(vec![
            Span::styled(format!("{:<LABEL_WIDTH$}", row.label), label_style),
            Span::raw(first),
        ]));
        // Continuation lines of a multi-line note
        for more in values {
            lines.push(Line::from(format!("{:<LABEL_WIDTH$}{more}", "")));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::styled(": close", Style::default().fg(Color::DarkGray)),
    ]));

    let block = Block::default()
        .title(" Appointment booked ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}
