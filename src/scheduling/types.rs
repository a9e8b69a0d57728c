//! Wire types for the scheduling service

use crate::state::{AppointmentStatus, PaymentMethod, PetGender};
use serde::{Deserialize, Serialize, Serializer};

/// A veterinarian from the doctor directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DoctorRecord")]
pub struct Doctor {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
}

/// Directory entry as sent. Documents may carry `_id` and an `id` virtual
/// side by side, so each spelling gets its own slot.
#[derive(Debug, Deserialize)]
struct DoctorRecord {
    #[serde(rename = "_id", default)]
    object_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "displayName", default)]
    display_name: Option<String>,
}

impl TryFrom<DoctorRecord> for Doctor {
    type Error = &'static str;

    fn try_from(record: DoctorRecord) -> Result<Self, Self::Error> {
        let id = record.object_id.or(record.id).ok_or("missing `_id`")?;
        let display_name = record
            .name
            .or(record.display_name)
            .ok_or("missing `name`")?;
        Ok(Self { id, display_name })
    }
}

/// `GET /vet-doctors` response envelope. `data` is kept loose because the
/// service may send something other than an array.
#[derive(Debug, Deserialize)]
pub(crate) struct DoctorListResponse {
    #[serde(default)]
    pub data: serde_json::Value,
}

impl DoctorListResponse {
    /// Decode the directory, treating a non-array `data` as empty and
    /// skipping entries that do not look like a doctor.
    pub fn into_doctors(self) -> Vec<Doctor> {
        let serde_json::Value::Array(entries) = self.data else {
            tracing::warn!("Doctor directory `data` is not an array; treating as empty");
            return Vec::new();
        };
        entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Doctor>(entry) {
                Ok(doctor) => Some(doctor),
                Err(e) => {
                    tracing::warn!("Skipping malformed doctor entry: {e}");
                    None
                }
            })
            .collect()
    }
}

/// Error body the service may attach to a non-2xx response
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Extract a non-empty `message` from an error body, if any
pub(crate) fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

/// `POST /appointments` body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPayload {
    pub customer_name: String,
    pub customer_phone: String,
    /// ISO-8601 UTC instant
    pub appointment_time: String,
    pub vet_doctor: String,
    pub status: AppointmentStatus,
    pub note: String,
    pub pet_name: String,
    pub pet_type: String,
    #[serde(serialize_with = "serialize_age")]
    pub pet_age: f64,
    pub pet_breed: String,
    pub pet_gender: PetGender,
    pub payment_method: PaymentMethod,
}

/// Whole ages go out as integers, fractional ones as floats
fn serialize_age<S: Serializer>(age: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if age.fract() == 0.0 && *age >= 0.0 && *age <= MAX_EXACT {
        serializer.serialize_u64(*age as u64)
    } else {
        serializer.serialize_f64(*age)
    }
}

/// Errors from the scheduling service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response
    #[error("{endpoint} request failed: {reason}")]
    Transport {
        endpoint: &'static str,
        reason: String,
    },

    /// The service answered with a non-2xx status
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: u16,
        message: Option<String>,
    },

    /// A 2xx response body could not be decoded
    #[error("could not decode {endpoint} response: {reason}")]
    Decode {
        endpoint: &'static str,
        reason: String,
    },
}

impl ApiError {
    /// Message supplied by the service, suitable for showing to the user
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } => Some(m),
            _ => None,
        }
    }
}
