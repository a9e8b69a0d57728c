//! Submit-time validation and payload construction

use super::error::{ValidationError, ValidationErrors};
use super::time::{canonical_instant, LocalZone, TimeError};
use crate::scheduling::{AppointmentPayload, Doctor};
use crate::state::{DraftAppointment, DraftField};

/// Check every field of the draft and build the transmission payload.
///
/// All problems are reported together so each field can be flagged.
pub fn build_payload(
    draft: &DraftAppointment,
    doctors: &[Doctor],
    zone: &LocalZone,
) -> Result<AppointmentPayload, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut appointment_time = None;
    let mut pet_age = None;

    for field in DraftField::ALL {
        let value = draft.value(field);
        if field.is_required() && value.trim().is_empty() {
            errors.push(ValidationError::Missing(field));
            continue;
        }
        match field {
            DraftField::AppointmentTime => match canonical_instant(value, zone) {
                Ok(instant) => appointment_time = Some(instant),
                Err(TimeError::Unparseable) => errors.push(ValidationError::InvalidTime {
                    value: value.to_string(),
                }),
                Err(TimeError::Nonexistent) => errors.push(ValidationError::NonexistentTime {
                    value: value.to_string(),
                }),
            },
            DraftField::VetDoctor => {
                if !doctors.iter().any(|d| d.id == value) {
                    errors.push(ValidationError::UnknownDoctor {
                        id: value.to_string(),
                    });
                }
            }
            DraftField::PetAge => match parse_age(value) {
                Some(age) => pet_age = Some(age),
                None => errors.push(ValidationError::InvalidAge {
                    value: value.to_string(),
                }),
            },
            _ => {}
        }
    }

    match (
        appointment_time,
        pet_age,
        draft.pet_gender,
        draft.payment_method,
    ) {
        (Some(appointment_time), Some(pet_age), Some(pet_gender), Some(payment_method))
            if errors.is_empty() =>
        {
            Ok(AppointmentPayload {
                customer_name: draft.customer_name.clone(),
                customer_phone: draft.customer_phone.clone(),
                appointment_time,
                vet_doctor: draft.vet_doctor.clone(),
                status: draft.status,
                note: draft.note.clone(),
                pet_name: draft.pet_name.clone(),
                pet_type: draft.pet_type.clone(),
                pet_age,
                pet_breed: draft.pet_breed.clone(),
                pet_gender,
                payment_method,
            })
        }
        _ => Err(errors),
    }
}

fn parse_age(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|age| age.is_finite() && *age >= 0.0)
}
