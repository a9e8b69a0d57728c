//! Read-only view of a booked appointment

use super::time::parse_local;
use super::Completion;
use crate::scheduling::Doctor;
use crate::state::DraftAppointment;

/// The frozen draft together with what was transmitted for it
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedAppointment {
    draft: DraftAppointment,
    appointment_time_utc: String,
    doctor: Option<Doctor>,
}

impl SubmittedAppointment {
    pub fn new(draft: DraftAppointment, appointment_time_utc: String, doctor: Option<Doctor>) -> Self {
        Self {
            draft,
            appointment_time_utc,
            doctor,
        }
    }

    pub fn draft(&self) -> &DraftAppointment {
        &self.draft
    }

    /// Canonical instant sent to the service
    pub fn appointment_time_utc(&self) -> &str {
        &self.appointment_time_utc
    }

    #[allow(dead_code)]
    pub fn doctor(&self) -> Option<&Doctor> {
        self.doctor.as_ref()
    }

    /// Doctor display name, or the raw id when the directory had no entry
    pub fn doctor_name(&self) -> &str {
        self.doctor
            .as_ref()
            .map(|d| d.display_name.as_str())
            .unwrap_or(&self.draft.vet_doctor)
    }
}

/// One label/value line of the confirmation screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
}

impl SummaryRow {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Final step of the workflow. Has no network side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationStep {
    appointment: SubmittedAppointment,
}

impl ConfirmationStep {
    pub fn new(appointment: SubmittedAppointment) -> Self {
        Self { appointment }
    }

    #[allow(dead_code)]
    pub fn appointment(&self) -> &SubmittedAppointment {
        &self.appointment
    }

    pub fn summary(&self) -> Vec<SummaryRow> {
        let appointment = &self.appointment;
        let draft = appointment.draft();
        let local_time = parse_local(&draft.appointment_time)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| draft.appointment_time.clone());
        let note = if draft.note.trim().is_empty() {
            "—".to_string()
        } else {
            draft.note.clone()
        };

        vec![
            SummaryRow::new("Customer", draft.customer_name.as_str()),
            SummaryRow::new("Phone", draft.customer_phone.as_str()),
            SummaryRow::new("Time", local_time),
            SummaryRow::new("Time (UTC)", appointment.appointment_time_utc()),
            SummaryRow::new("Doctor", appointment.doctor_name()),
            SummaryRow::new("Pet", draft.pet_name.as_str()),
            SummaryRow::new("Type", draft.pet_type.as_str()),
            SummaryRow::new("Breed", draft.pet_breed.as_str()),
            SummaryRow::new("Age", draft.pet_age.as_str()),
            SummaryRow::new("Gender", draft.pet_gender.map(|g| g.label()).unwrap_or("")),
            SummaryRow::new(
                "Payment",
                draft.payment_method.map(|p| p.label()).unwrap_or(""),
            ),
            SummaryRow::new("Status", draft.status.as_str()),
            SummaryRow::new("Note", note),
        ]
    }

    /// Leave the step, handing the booked appointment back to the caller
    pub fn close(self) -> Completion {
        tracing::info!("Confirmation closed");
        Completion::Closed(self.appointment)
    }
}
