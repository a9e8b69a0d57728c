//! HTTP client for the scheduling service
//!
//! Thin reqwest wrapper: one request per call, no retries. Status handling
//! and error-body decoding live here so the workflow only sees `ApiError`.

use super::traits::SchedulingApi;
use super::types::{server_message, ApiError, AppointmentPayload, Doctor, DoctorListResponse};
use crate::auth::BearerToken;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use std::time::Duration;

/// Default service address
pub const DEFAULT_BASE_URL: &str = "https://pet-booking-eta.vercel.app";

const LIST_DOCTORS: &str = "GET /vet-doctors";
const CREATE_APPOINTMENT: &str = "POST /appointments";

/// Client for the scheduling service
#[derive(Debug, Clone)]
pub struct HttpSchedulingClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSchedulingClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[allow(dead_code)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl SchedulingApi for HttpSchedulingClient {
    async fn list_vet_doctors(&self, token: &BearerToken) -> Result<Vec<Doctor>, ApiError> {
        let response = self
            .http
            .get(self.url("/vet-doctors"))
            .header(AUTHORIZATION, token.header_value())
            .send()
            .await
            .map_err(|e| transport(LIST_DOCTORS, e))?;

        let response = check_status(LIST_DOCTORS, response).await?;
        let body: DoctorListResponse = response.json().await.map_err(|e| ApiError::Decode {
            endpoint: LIST_DOCTORS,
            reason: e.to_string(),
        })?;

        let doctors = body.into_doctors();
        tracing::debug!("Fetched {} doctors", doctors.len());
        Ok(doctors)
    }

    async fn create_appointment(
        &self,
        token: &BearerToken,
        payload: &AppointmentPayload,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url("/appointments"))
            .header(AUTHORIZATION, token.header_value())
            .json(payload)
            .send()
            .await
            .map_err(|e| transport(CREATE_APPOINTMENT, e))?;

        // Body of a successful create is not needed
        check_status(CREATE_APPOINTMENT, response).await?;
        Ok(())
    }
}

fn transport(endpoint: &'static str, error: reqwest::Error) -> ApiError {
    ApiError::Transport {
        endpoint,
        reason: error.to_string(),
    }
}

/// Map non-2xx responses to `ApiError::Status`, keeping the service's message
async fn check_status(
    endpoint: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        endpoint,
        status: status.as_u16(),
        message: server_message(&body),
    })
}
