//! Trait abstraction for the scheduling service to enable mocking in tests

use super::types::{ApiError, AppointmentPayload, Doctor};
use crate::auth::BearerToken;
use async_trait::async_trait;

/// Operations the booking workflow needs from the scheduling service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchedulingApi: Send + Sync {
    /// Fetch the doctor directory
    async fn list_vet_doctors(&self, token: &BearerToken) -> Result<Vec<Doctor>, ApiError>;

    /// Create an appointment. Any 2xx answer counts as created.
    async fn create_appointment(
        &self,
        token: &BearerToken,
        payload: &AppointmentPayload,
    ) -> Result<(), ApiError>;
}
