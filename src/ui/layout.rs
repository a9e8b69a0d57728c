//! Layout components (content area, status bar)

use crate::app::App;
use crate::workflow::{DoctorDirectory, Stage};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into content and a one-line status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1])
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    // Doctor directory status
    if let Some(session) = app.workflow.session() {
        let indicator = match session.directory() {
            DoctorDirectory::Loaded(_) => Span::styled(" ● ", Style::default().fg(Color::Green)),
            DoctorDirectory::NotLoaded => Span::styled(" ○ ", Style::default().fg(Color::Yellow)),
            DoctorDirectory::Unavailable(_) => {
                Span::styled(" ○ ", Style::default().fg(Color::Red))
            }
        };
        spans.push(indicator);
    } else {
        spans.push(Span::raw(" "));
    }

    spans.push(Span::styled(
        stage_hints(app.workflow.stage()),
        Style::default().fg(Color::Gray),
    ));

    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Yellow)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);
}

fn stage_hints(stage: Option<&Stage>) -> &'static str {
    match stage {
        Some(Stage::Form(_)) => "Tab:next  ^S:book  Esc:cancel  ^C:quit",
        Some(Stage::Confirmation(_)) => "Enter:close",
        Some(Stage::Finished(_)) | None => "",
    }
}
