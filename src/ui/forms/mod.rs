//! Form rendering module
//!
//! - `field_renderer`: Field rendering utilities
//! - `appointment_form`: The booking form

mod appointment_form;
mod field_renderer;

pub use appointment_form::draw_appointment_form;
