//! Form domain layer
//!
//! Navigation and key-to-value editing for the appointment form.

mod field;
mod form_state;

pub use field::{cycle_choice, FormField};
pub use form_state::{AppointmentForm, Form, FormButton};
