//! Scheduling service client module

mod client;
mod traits;
mod types;

pub use client::{HttpSchedulingClient, DEFAULT_BASE_URL};
pub use traits::SchedulingApi;
pub use types::{ApiError, AppointmentPayload, Doctor};

#[cfg(test)]
pub use traits::MockSchedulingApi;
