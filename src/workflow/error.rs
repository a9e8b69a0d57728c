//! Error types for the booking workflow

use crate::state::DraftField;
use std::fmt;

/// Shown when the service rejects a booking without saying why
pub const GENERIC_SUBMISSION_FAILURE: &str = "Could not create the appointment. Please try again.";

/// One problem found while checking the draft before submission
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{} is required", .0.label())]
    Missing(DraftField),

    #[error("`{value}` is not a valid {}", .field.label().to_lowercase())]
    InvalidChoice { field: DraftField, value: String },

    #[error("`{value}` is not a valid date and time (expected YYYY-MM-DDTHH:MM)")]
    InvalidTime { value: String },

    #[error("`{value}` does not exist in the local time zone")]
    NonexistentTime { value: String },

    #[error("`{value}` is not a valid age")]
    InvalidAge { value: String },

    #[error("the selected doctor `{id}` is not in the doctor list")]
    UnknownDoctor { id: String },
}

impl ValidationError {
    /// Field the problem should be shown next to
    pub fn field(&self) -> DraftField {
        match self {
            Self::Missing(field) | Self::InvalidChoice { field, .. } => *field,
            Self::InvalidTime { .. } | Self::NonexistentTime { .. } => DraftField::AppointmentTime,
            Self::InvalidAge { .. } => DraftField::PetAge,
            Self::UnknownDoctor { .. } => DraftField::VetDoctor,
        }
    }
}

/// Every problem found in one pass over the draft, in form order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// First problem reported for `field`
    pub fn for_field(&self, field: DraftField) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field() == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        f.write_str(&messages.join("\n"))
    }
}

/// Errors surfaced by a form session. All of them are recoverable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("You are not signed in. Please sign in again.")]
    MissingCredential,

    #[error("Could not load the doctor list: {0}")]
    ReferenceFetchFailure(String),

    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("{message}")]
    SubmissionFailure { message: String },

    #[error("A booking is already being submitted")]
    SubmissionInFlight,

    #[error("This appointment has already been booked")]
    AlreadyConfirmed,

    #[error("Unknown form field `{0}`")]
    UnknownField(String),

    /// An outcome arrived for a submission or session that is no longer live
    #[error("Discarded a result that no longer applies")]
    StaleOutcome,
}
