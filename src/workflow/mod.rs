//! Appointment booking workflow: form session, then confirmation

mod confirmation;
mod error;
mod payload;
mod session;
mod time;

pub use confirmation::{ConfirmationStep, SubmittedAppointment};
pub use error::SessionError;
pub use session::{DoctorDirectory, FetchOutcome, FormSession, SubmissionOutcome};
pub use time::LocalZone;

/// How the workflow ended, as observed by its caller
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The draft was discarded; nothing was created
    Cancelled,
    /// Left while the creation request was in flight, so whether the
    /// appointment exists is unknown
    Abandoned,
    /// The appointment was created and the confirmation dismissed
    Closed(SubmittedAppointment),
}

/// Current stage of the workflow
pub enum Stage {
    Form(FormSession),
    Confirmation(ConfirmationStep),
    Finished(Completion),
}

/// Drives a booking from the empty form to its completion signal
pub struct Workflow {
    // Only `None` transiently while a stage transition moves the value out
    stage: Option<Stage>,
}

impl Workflow {
    pub fn new(session: FormSession) -> Self {
        Self {
            stage: Some(Stage::Form(session)),
        }
    }

    pub fn stage(&self) -> Option<&Stage> {
        self.stage.as_ref()
    }

    pub fn session(&self) -> Option<&FormSession> {
        match &self.stage {
            Some(Stage::Form(session)) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut FormSession> {
        match &mut self.stage {
            Some(Stage::Form(session)) => Some(session),
            _ => None,
        }
    }

    pub fn confirmation(&self) -> Option<&ConfirmationStep> {
        match &self.stage {
            Some(Stage::Confirmation(step)) => Some(step),
            _ => None,
        }
    }

    pub fn completion(&self) -> Option<&Completion> {
        match &self.stage {
            Some(Stage::Finished(completion)) => Some(completion),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.completion().is_some()
    }

    /// Hand a confirmed session over to the confirmation step.
    /// Returns true when the stage changed.
    pub fn advance(&mut self) -> bool {
        match self.stage.take() {
            Some(Stage::Form(session)) if session.is_confirmed() => {
                match session.into_confirmed() {
                    Ok(appointment) => {
                        tracing::info!("Showing confirmation");
                        self.stage = Some(Stage::Confirmation(ConfirmationStep::new(appointment)));
                        true
                    }
                    Err(session) => {
                        self.stage = Some(Stage::Form(session));
                        false
                    }
                }
            }
            other => {
                self.stage = other;
                false
            }
        }
    }

    /// Leave the form. Ignored once the appointment has been booked.
    pub fn cancel(&mut self) -> bool {
        match self.stage.take() {
            Some(Stage::Form(session)) if !session.is_confirmed() => {
                self.stage = Some(Stage::Finished(session.cancel()));
                true
            }
            other => {
                self.stage = other;
                false
            }
        }
    }

    /// Dismiss the confirmation step
    pub fn close(&mut self) -> bool {
        match self.stage.take() {
            Some(Stage::Confirmation(step)) => {
                self.stage = Some(Stage::Finished(step.close()));
                true
            }
            other => {
                self.stage = other;
                false
            }
        }
    }

    /// Consume the workflow, yielding the completion if it has finished
    pub fn into_completion(self) -> Option<Completion> {
        match self.stage {
            Some(Stage::Finished(completion)) => Some(completion),
            _ => None,
        }
    }
}
