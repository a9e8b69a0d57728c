//! Application state and core logic

use crate::state::{cycle_choice, AppointmentForm, DraftField, Form, FormButton, PaymentMethod, PetGender};
use crate::workflow::{
    Completion, FetchOutcome, FormSession, SessionError, SubmissionOutcome, Workflow,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;

/// Results of background network work, fed back into the event loop
#[derive(Debug)]
pub enum AppEvent {
    DoctorsFetched(FetchOutcome),
    Submitted(SubmissionOutcome),
}

/// Main application struct
pub struct App {
    /// Booking workflow being driven
    pub workflow: Workflow,
    /// Cursor over the form fields
    pub form: AppointmentForm,
    /// One-line status shown at the bottom
    pub status_message: Option<String>,
    events: UnboundedSender<AppEvent>,
    quit: bool,
}

impl App {
    pub fn new(session: FormSession, events: UnboundedSender<AppEvent>) -> Self {
        Self {
            workflow: Workflow::new(session),
            form: AppointmentForm::new(),
            status_message: None,
            events,
            quit: false,
        }
    }

    /// Kick off the doctor directory fetch
    pub fn start(&mut self) {
        self.load_doctors();
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit || self.workflow.is_finished()
    }

    pub fn into_completion(self) -> Option<Completion> {
        self.workflow.into_completion()
    }

    /// Failure to show in the modal dialog. Validation problems are shown
    /// next to their fields instead.
    pub fn error_dialog(&self) -> Option<String> {
        let session = self.workflow.session()?;
        if session.validation_errors().is_some() {
            return None;
        }
        session.failure_message()
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.workflow.cancel();
            self.workflow.close();
            self.quit = true;
            return;
        }

        if self.workflow.confirmation().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.workflow.close();
            }
            return;
        }

        // Handle error dialog dismissal first (modal)
        if self.error_dialog().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                if let Some(session) = self.workflow.session_mut() {
                    session.dismiss_error();
                }
            }
            return;
        }

        self.handle_form_key(key);
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let on_buttons = self.form.is_buttons_row_active();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.cancel(),
            KeyCode::Char('s') if ctrl => self.submit(),
            KeyCode::Char('r') if ctrl => self.load_doctors(),
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Left | KeyCode::Right if on_buttons => self.form.selected_button.toggle(),
            KeyCode::Enter if on_buttons => match self.form.selected_button {
                FormButton::Submit => self.submit(),
                FormButton::Cancel => self.cancel(),
            },
            _ if on_buttons => {}
            code => self.edit_active_field(code),
        }
    }

    fn edit_active_field(&mut self, code: KeyCode) {
        let Some(field) = self.form.active().copied() else {
            return;
        };
        let Some(session) = self.workflow.session() else {
            return;
        };
        let current = session.draft().value(field.field);

        let next = match code {
            KeyCode::Char(' ') | KeyCode::Right if field.field.is_choice() => {
                Some(self.cycle(field.field, current, true))
            }
            KeyCode::Left if field.field.is_choice() => Some(self.cycle(field.field, current, false)),
            KeyCode::Char(c) => field.push_char(current, c),
            KeyCode::Backspace => field.pop_char(current),
            KeyCode::Enter if field.is_multiline() => field.push_newline(current),
            KeyCode::Enter => {
                self.form.next_field();
                None
            }
            _ => None,
        };

        if let Some(value) = next {
            self.update(field.field, value);
        }
    }

    fn cycle(&self, field: DraftField, current: &str, forward: bool) -> String {
        let options: Vec<&str> = match field {
            DraftField::VetDoctor => self
                .workflow
                .session()
                .map(|s| s.doctors().iter().map(|d| d.id.as_str()).collect())
                .unwrap_or_default(),
            DraftField::PetGender => PetGender::ALL.iter().map(|g| g.as_str()).collect(),
            DraftField::PaymentMethod => PaymentMethod::ALL.iter().map(|m| m.as_str()).collect(),
            _ => Vec::new(),
        };
        cycle_choice(&options, current, forward)
    }

    fn update(&mut self, field: DraftField, value: String) {
        let Some(session) = self.workflow.session_mut() else {
            return;
        };
        if let Err(e) = session.update_field(field, value) {
            self.status_message = Some(e.to_string());
        }
    }

    fn cancel(&mut self) {
        if self.workflow.session().is_some_and(FormSession::is_submitting) {
            self.status_message = Some("Booking in progress, wait for the result".to_string());
            return;
        }
        if self.workflow.cancel() {
            self.status_message = None;
        }
    }

    fn load_doctors(&mut self) {
        let Some(session) = self.workflow.session_mut() else {
            return;
        };
        if session.directory().is_loaded() {
            return;
        }
        match session.begin_initialize() {
            Ok(fetch) => {
                self.status_message = Some("Loading doctors…".to_string());
                let events = self.events.clone();
                tokio::spawn(async move {
                    let outcome = fetch.run().await;
                    // Receiver gone means the app has exited
                    let _ = events.send(AppEvent::DoctorsFetched(outcome));
                });
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    fn submit(&mut self) {
        let Some(session) = self.workflow.session_mut() else {
            return;
        };
        match session.begin_submission() {
            Ok(pending) => {
                self.status_message = Some("Booking appointment…".to_string());
                let events = self.events.clone();
                tokio::spawn(async move {
                    let outcome = pending.send().await;
                    let _ = events.send(AppEvent::Submitted(outcome));
                });
            }
            Err(SessionError::Validation(errors)) => {
                if let Some(first) = errors.iter().next() {
                    self.form.focus(first.field());
                }
                self.status_message = Some(match errors.len() {
                    1 => "1 field needs attention".to_string(),
                    n => format!("{n} fields need attention"),
                });
            }
            Err(SessionError::SubmissionInFlight) => {}
            // Shown through the error dialog
            Err(_) => self.status_message = None,
        }
    }

    /// Apply the result of background work
    pub fn handle_event(&mut self, event: AppEvent) {
        let Some(session) = self.workflow.session_mut() else {
            tracing::debug!("Form closed; dropping {event:?}");
            return;
        };

        match event {
            AppEvent::DoctorsFetched(outcome) => match session.finish_initialize(outcome) {
                Ok(0) => self.status_message = Some("No doctors available".to_string()),
                Ok(_) => self.status_message = None,
                Err(SessionError::StaleOutcome) => {}
                Err(e) => self.status_message = Some(e.to_string()),
            },
            AppEvent::Submitted(outcome) => match session.finish_submission(outcome).map(|_| ()) {
                Ok(()) => {
                    self.status_message = None;
                    self.workflow.advance();
                }
                Err(SessionError::StaleOutcome) => {}
                Err(_) => self.status_message = None,
            },
        }
    }
}
