//! Appointment form rendering

use super::field_renderer::{draw_field, FieldView};
use crate::app::App;
use crate::state::{DraftField, Form, FormButton};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use crate::workflow::FormSession;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Fields drawn in the left column; the rest go right
const LEFT_COLUMN: usize = 6;

/// Draw the booking form
pub fn draw_appointment_form(frame: &mut Frame, area: Rect, app: &App, session: &FormSession) {
    let block = Block::default()
        .title(" Book a vet appointment ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),                // Fields
            Constraint::Length(BUTTON_HEIGHT), // Buttons
            Constraint::Length(1),             // Help text
        ])
        .margin(1)
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    let left = column_layout(columns[0], LEFT_COLUMN, false);
    let right = column_layout(columns[1], app.form.fields.len() - LEFT_COLUMN, true);
    let areas = left.iter().chain(right.iter());

    for (index, area) in areas.enumerate() {
        let Some(field) = app.form.get_field(index) else {
            continue;
        };
        let value = display_value(session, field.field);
        let error = session
            .validation_errors()
            .and_then(|errors| errors.for_field(field.field))
            .map(|e| e.to_string());
        draw_field(
            frame,
            *area,
            FieldView {
                field,
                value: &value,
                is_active: app.form.active_field() == index,
                error,
            },
        );
    }

    draw_buttons(frame, chunks[1], app, session);

    let help = Paragraph::new(Line::from(vec![
        Span::styled("Tab", Style::default().fg(Color::Cyan)),
        Span::raw(": next  "),
        Span::styled("←/→", Style::default().fg(Color::Cyan)),
        Span::raw(": choose  "),
        Span::styled("Ctrl+S", Style::default().fg(Color::Cyan)),
        Span::raw(": book  "),
        Span::styled("Ctrl+R", Style::default().fg(Color::Cyan)),
        Span::raw(": reload doctors  "),
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::raw(": cancel"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}

/// Split a column into field rows; the last row stretches when `stretch_last`
fn column_layout(area: Rect, rows: usize, stretch_last: bool) -> Vec<Rect> {
    let constraints: Vec<Constraint> = (0..rows)
        .map(|i| {
            if stretch_last && i + 1 == rows {
                Constraint::Min(3)
            } else {
                Constraint::Length(3)
            }
        })
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let mut chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area)
        .to_vec();
    chunks.truncate(rows);
    chunks
}

/// Value as the user should see it: labels for choices, names for doctors
fn display_value(session: &FormSession, field: DraftField) -> String {
    let draft = session.draft();
    match field {
        DraftField::VetDoctor => {
            let id = &draft.vet_doctor;
            match session.directory().find(id) {
                Some(doctor) => doctor.display_name.clone(),
                None => id.clone(),
            }
        }
        DraftField::PetGender => draft
            .pet_gender
            .map(|g| g.label().to_string())
            .unwrap_or_default(),
        DraftField::PaymentMethod => draft
            .payment_method
            .map(|m| m.label().to_string())
            .unwrap_or_default(),
        other => draft.value(other).to_string(),
    }
}

fn draw_buttons(frame: &mut Frame, area: Rect, app: &App, session: &FormSession) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24),
            Constraint::Length(12),
            Constraint::Min(0),
        ])
        .split(area);

    let on_buttons = app.form.is_buttons_row_active();
    let submit_label = if session.is_submitting() {
        "Booking…"
    } else {
        FormButton::Submit.label()
    };
    render_button(
        frame,
        chunks[0],
        submit_label,
        on_buttons && app.form.selected_button == FormButton::Submit,
        session.can_submit(),
    );
    render_button(
        frame,
        chunks[1],
        FormButton::Cancel.label(),
        on_buttons && app.form.selected_button == FormButton::Cancel,
        true,
    );
}
