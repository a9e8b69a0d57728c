//! UI module for rendering the TUI

mod components;
mod confirmation;
mod forms;
mod layout;

use crate::app::App;
use crate::workflow::Stage;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (main_area, status_area) = layout::create_layout(frame.area());

    match app.workflow.stage() {
        Some(Stage::Form(session)) => forms::draw_appointment_form(frame, main_area, app, session),
        Some(Stage::Confirmation(step)) => confirmation::draw(frame, main_area, step),
        Some(Stage::Finished(_)) | None => {}
    }

    layout::draw_status_bar(frame, status_area, app);

    // Modal error on top of everything
    if let Some(message) = app.error_dialog() {
        components::render_error_dialog(frame, &message);
    }
}
