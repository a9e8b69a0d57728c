//! Form session: owns the draft, the doctor directory and the submission
//! state machine.
//!
//! States: `Editing -> Submitting -> Confirmed`, falling back to `Editing`
//! with the failure kept for display when a submission does not go through.
//!
//! Network work is split into begin / run / finish so an event loop can run
//! the request as a task. `begin_*` validates and snapshots everything the
//! request needs, the returned value performs exactly one request, and
//! `finish_*` applies the outcome only if it still belongs to this session.

use super::confirmation::SubmittedAppointment;
use super::error::{SessionError, ValidationError, ValidationErrors, GENERIC_SUBMISSION_FAILURE};
use super::payload::build_payload;
use super::time::LocalZone;
use super::Completion;
use crate::auth::{BearerToken, CredentialProvider};
use crate::scheduling::{ApiError, AppointmentPayload, Doctor, SchedulingApi};
use crate::state::{DraftAppointment, DraftField};
use std::sync::Arc;
use uuid::Uuid;

/// Submission state of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting edits; carries the last failure, if any
    Editing { last_error: Option<SessionError> },
    /// One creation request is outstanding
    Submitting { ticket: u64 },
    /// The service acknowledged the booking; the draft is frozen
    Confirmed,
}

/// Doctor reference data, fetched at most once successfully per session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DoctorDirectory {
    #[default]
    NotLoaded,
    Loaded(Vec<Doctor>),
    Unavailable(String),
}

impl DoctorDirectory {
    /// Doctors available for selection; empty unless loaded
    pub fn doctors(&self) -> &[Doctor] {
        match self {
            Self::Loaded(doctors) => doctors,
            _ => &[],
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn find(&self, id: &str) -> Option<&Doctor> {
        self.doctors().iter().find(|d| d.id == id)
    }
}

/// A doctor-directory request ready to run
pub struct DoctorFetch {
    session_id: Uuid,
    token: BearerToken,
    api: Arc<dyn SchedulingApi>,
}

impl DoctorFetch {
    pub async fn run(self) -> FetchOutcome {
        let result = self.api.list_vet_doctors(&self.token).await;
        FetchOutcome {
            session_id: self.session_id,
            result,
        }
    }
}

/// Result of a [`DoctorFetch`], tagged with the session that issued it
#[derive(Debug)]
pub struct FetchOutcome {
    pub session_id: Uuid,
    pub result: Result<Vec<Doctor>, ApiError>,
}

/// A creation request ready to send
pub struct PendingSubmission {
    session_id: Uuid,
    ticket: u64,
    token: BearerToken,
    payload: AppointmentPayload,
    api: Arc<dyn SchedulingApi>,
}

impl PendingSubmission {
    /// Issue the single creation request for this attempt
    pub async fn send(self) -> SubmissionOutcome {
        let result = self
            .api
            .create_appointment(&self.token, &self.payload)
            .await;
        SubmissionOutcome {
            session_id: self.session_id,
            ticket: self.ticket,
            appointment_time: self.payload.appointment_time,
            result,
        }
    }
}

/// Result of a [`PendingSubmission`]
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub session_id: Uuid,
    pub ticket: u64,
    /// Canonical time that was transmitted
    pub appointment_time: String,
    pub result: Result<(), ApiError>,
}

/// One booking attempt from an empty draft to a confirmed appointment
pub struct FormSession {
    id: Uuid,
    draft: DraftAppointment,
    directory: DoctorDirectory,
    state: SessionState,
    zone: LocalZone,
    api: Arc<dyn SchedulingApi>,
    credentials: Arc<dyn CredentialProvider>,
    last_ticket: u64,
    confirmed: Option<SubmittedAppointment>,
}

impl FormSession {
    pub fn new(
        api: Arc<dyn SchedulingApi>,
        credentials: Arc<dyn CredentialProvider>,
        zone: LocalZone,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            draft: DraftAppointment::new(),
            directory: DoctorDirectory::default(),
            state: SessionState::Editing { last_error: None },
            zone,
            api,
            credentials,
            last_ticket: 0,
            confirmed: None,
        }
    }

    pub fn draft(&self) -> &DraftAppointment {
        &self.draft
    }

    pub fn directory(&self) -> &DoctorDirectory {
        &self.directory
    }

    pub fn doctors(&self) -> &[Doctor] {
        self.directory.doctors()
    }

    #[allow(dead_code)]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SessionState::Submitting { .. })
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self.state, SessionState::Confirmed)
    }

    pub fn has_credential(&self) -> bool {
        self.credentials.bearer_token().is_some()
    }

    /// Last failure, while editing
    pub fn last_error(&self) -> Option<&SessionError> {
        match &self.state {
            SessionState::Editing { last_error } => last_error.as_ref(),
            _ => None,
        }
    }

    /// Human-readable reason for the last failure
    pub fn failure_message(&self) -> Option<String> {
        self.last_error().map(|e| e.to_string())
    }

    /// Inline problems from the last submit attempt
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self.last_error() {
            Some(SessionError::Validation(errors)) => Some(errors),
            _ => None,
        }
    }

    /// Client-side gate: true when a submit would be sent now
    pub fn can_submit(&self) -> bool {
        matches!(self.state, SessionState::Editing { .. })
            && self.has_credential()
            && build_payload(&self.draft, self.directory.doctors(), &self.zone).is_ok()
    }

    pub fn dismiss_error(&mut self) {
        if let SessionState::Editing { last_error } = &mut self.state {
            *last_error = None;
        }
    }

    /// Fetch the doctor directory with the current credential
    #[allow(dead_code)]
    pub async fn initialize(&mut self) -> Result<usize, SessionError> {
        let fetch = self.begin_initialize()?;
        let outcome = fetch.run().await;
        self.finish_initialize(outcome)
    }

    /// Prepare the directory request. Fails fast without a credential,
    /// leaving the directory empty.
    pub fn begin_initialize(&mut self) -> Result<DoctorFetch, SessionError> {
        let Some(token) = self.credentials.bearer_token() else {
            tracing::warn!("No credential; doctor list not loaded");
            self.directory =
                DoctorDirectory::Unavailable(SessionError::MissingCredential.to_string());
            return Err(SessionError::MissingCredential);
        };
        Ok(DoctorFetch {
            session_id: self.id,
            token,
            api: Arc::clone(&self.api),
        })
    }

    /// Apply a directory fetch. Returns the number of doctors loaded.
    pub fn finish_initialize(&mut self, outcome: FetchOutcome) -> Result<usize, SessionError> {
        if outcome.session_id != self.id {
            tracing::debug!("Discarding doctor list for session {}", outcome.session_id);
            return Err(SessionError::StaleOutcome);
        }
        if self.directory.is_loaded() {
            tracing::debug!("Doctor list already loaded; ignoring refetch");
            return Ok(self.directory.doctors().len());
        }
        match outcome.result {
            Ok(doctors) => {
                tracing::info!("Loaded {} doctors", doctors.len());
                let count = doctors.len();
                self.directory = DoctorDirectory::Loaded(doctors);
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("Doctor list fetch failed: {e}");
                self.directory = DoctorDirectory::Unavailable(e.to_string());
                Err(SessionError::ReferenceFetchFailure(e.to_string()))
            }
        }
    }

    /// Store a field value verbatim. Enum fields only accept their option
    /// values. Refused while a submission is outstanding or after booking.
    pub fn update_field(
        &mut self,
        field: DraftField,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        match self.state {
            SessionState::Editing { .. } => {}
            SessionState::Submitting { .. } => return Err(SessionError::SubmissionInFlight),
            SessionState::Confirmed => return Err(SessionError::AlreadyConfirmed),
        }
        self.draft.set(field, value.into()).map_err(|invalid| {
            let mut errors = ValidationErrors::new();
            errors.push(ValidationError::InvalidChoice {
                field: invalid.field,
                value: invalid.value,
            });
            SessionError::Validation(errors)
        })
    }

    /// Same as [`update_field`](Self::update_field) with the field given by
    /// its wire name, e.g. `"customerName"`
    #[allow(dead_code)]
    pub fn update_field_by_name(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        let field = name
            .parse::<DraftField>()
            .map_err(SessionError::UnknownField)?;
        self.update_field(field, value)
    }

    /// Validate, send one creation request and apply the result
    #[allow(dead_code)]
    pub async fn submit(&mut self) -> Result<&SubmittedAppointment, SessionError> {
        let pending = self.begin_submission()?;
        let outcome = pending.send().await;
        self.finish_submission(outcome)
    }

    /// Enter `Submitting` and hand back the request to send.
    ///
    /// No request is prepared while another is outstanding, without a
    /// credential, or when the draft does not validate.
    pub fn begin_submission(&mut self) -> Result<PendingSubmission, SessionError> {
        match self.state {
            SessionState::Editing { .. } => {}
            SessionState::Submitting { .. } => {
                tracing::debug!("Submit ignored; a request is already outstanding");
                return Err(SessionError::SubmissionInFlight);
            }
            SessionState::Confirmed => return Err(SessionError::AlreadyConfirmed),
        }

        let Some(token) = self.credentials.bearer_token() else {
            return Err(self.fail(SessionError::MissingCredential));
        };

        let payload = match build_payload(&self.draft, self.directory.doctors(), &self.zone) {
            Ok(payload) => payload,
            Err(errors) => return Err(self.fail(SessionError::Validation(errors))),
        };

        self.last_ticket += 1;
        let ticket = self.last_ticket;
        self.state = SessionState::Submitting { ticket };
        tracing::info!("Submitting appointment (session {}, attempt {ticket})", self.id);

        Ok(PendingSubmission {
            session_id: self.id,
            ticket,
            token,
            payload,
            api: Arc::clone(&self.api),
        })
    }

    /// Apply the outcome of a submission attempt
    pub fn finish_submission(
        &mut self,
        outcome: SubmissionOutcome,
    ) -> Result<&SubmittedAppointment, SessionError> {
        let live = outcome.session_id == self.id
            && self.state == SessionState::Submitting {
                ticket: outcome.ticket,
            };
        if !live {
            tracing::debug!(
                "Discarding submission outcome (session {}, attempt {})",
                outcome.session_id,
                outcome.ticket
            );
            return Err(SessionError::StaleOutcome);
        }

        match outcome.result {
            Ok(()) => {
                tracing::info!("Appointment created (session {})", self.id);
                let doctor = self.directory.find(&self.draft.vet_doctor).cloned();
                self.state = SessionState::Confirmed;
                let confirmed: &SubmittedAppointment = self.confirmed.insert(
                    SubmittedAppointment::new(self.draft.clone(), outcome.appointment_time, doctor),
                );
                Ok(confirmed)
            }
            Err(e) => {
                tracing::warn!("Appointment creation failed: {e}");
                let message = e
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| GENERIC_SUBMISSION_FAILURE.to_string());
                Err(self.fail(SessionError::SubmissionFailure { message }))
            }
        }
    }

    /// The booked appointment, once confirmed
    #[allow(dead_code)]
    pub fn confirmed(&self) -> Option<&SubmittedAppointment> {
        self.confirmed.as_ref()
    }

    /// Hand the frozen appointment over, consuming the session
    pub fn into_confirmed(self) -> Result<SubmittedAppointment, Self> {
        match self.confirmed {
            Some(appointment) => Ok(appointment),
            None => Err(self),
        }
    }

    /// Discard the draft. While a request is in flight its outcome is
    /// unknown, so the session reports itself abandoned instead.
    pub fn cancel(self) -> Completion {
        if self.is_submitting() {
            tracing::warn!("Session {} left with a booking in flight", self.id);
            return Completion::Abandoned;
        }
        tracing::info!("Booking cancelled (session {})", self.id);
        Completion::Cancelled
    }

    fn fail(&mut self, error: SessionError) -> SessionError {
        self.state = SessionState::Editing {
            last_error: Some(error.clone()),
        };
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MockCredentialProvider, StaticCredential};
    use crate::scheduling::MockSchedulingApi;
    use crate::state::{PaymentMethod, PetGender};
    use crate::workflow::payload::tests::{complete_draft, doctors};
    use pretty_assertions::assert_eq;
    use tokio_test::{assert_err, assert_ok};

    fn utc_plus_7() -> LocalZone {
        LocalZone::from_offset_minutes(7 * 60).unwrap()
    }

    fn session_with(api: MockSchedulingApi, credentials: impl CredentialProvider + 'static) -> FormSession {
        FormSession::new(Arc::new(api), Arc::new(credentials), utc_plus_7())
    }

    fn signed_in(api: MockSchedulingApi) -> FormSession {
        session_with(api, StaticCredential::new("tok"))
    }

    fn api_with_doctors() -> MockSchedulingApi {
        let mut api = MockSchedulingApi::new();
        api.expect_list_vet_doctors()
            .times(1)
            .returning(|_| Ok(doctors()));
        api
    }

    fn fill(session: &mut FormSession, draft: &DraftAppointment) {
        for field in DraftField::ALL {
            session.update_field(field, draft.value(field)).unwrap();
        }
    }

    /// Session with doctors loaded and a complete draft entered
    async fn ready(mut api: MockSchedulingApi) -> FormSession {
        api.expect_list_vet_doctors()
            .times(1)
            .returning(|_| Ok(doctors()));
        let mut session = signed_in(api);
        session.initialize().await.unwrap();
        fill(&mut session, &complete_draft());
        session
    }

    mod initialize {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_loads_doctors_with_bearer() {
            let mut api = MockSchedulingApi::new();
            api.expect_list_vet_doctors()
                .withf(|token| token.expose() == "tok")
                .times(1)
                .returning(|_| Ok(doctors()));
            let mut session = signed_in(api);

            assert_eq!(session.initialize().await, Ok(2));
            assert!(session.directory().is_loaded());
            assert_eq!(session.doctors()[0].display_name, "Dr. Minh");
        }

        #[tokio::test]
        async fn test_missing_credential_fails_fast() {
            let mut api = MockSchedulingApi::new();
            api.expect_list_vet_doctors().never();
            let mut session = session_with(api, StaticCredential::absent());

            assert_eq!(
                session.initialize().await,
                Err(SessionError::MissingCredential)
            );
            assert!(session.doctors().is_empty());
            assert!(matches!(
                session.directory(),
                DoctorDirectory::Unavailable(_)
            ));
            // The form is still usable
            assert_ok!(session.update_field(DraftField::PetName, "Mochi"));
        }

        #[tokio::test]
        async fn test_fetch_failure_degrades_to_empty() {
            let mut api = MockSchedulingApi::new();
            api.expect_list_vet_doctors().times(1).returning(|_| {
                Err(ApiError::Transport {
                    endpoint: "GET /vet-doctors",
                    reason: "timed out".to_string(),
                })
            });
            let mut session = signed_in(api);

            let err = session.initialize().await.unwrap_err();
            assert!(matches!(err, SessionError::ReferenceFetchFailure(_)));
            assert!(session.doctors().is_empty());
            assert_eq!(session.state(), &SessionState::Editing { last_error: None });
        }

        #[tokio::test]
        async fn test_retry_after_signing_in() {
            let mut tokens = MockCredentialProvider::new();
            let mut calls = 0;
            tokens.expect_bearer_token().returning(move || {
                calls += 1;
                if calls == 1 {
                    None
                } else {
                    crate::auth::BearerToken::new("fresh")
                }
            });
            let mut session = session_with(api_with_doctors(), tokens);

            assert_err!(session.initialize().await);
            assert_eq!(session.initialize().await, Ok(2));
        }

        #[tokio::test]
        async fn test_loaded_directory_is_not_replaced() {
            let mut api = MockSchedulingApi::new();
            api.expect_list_vet_doctors()
                .times(2)
                .returning(|_| Ok(doctors()));
            let mut session = signed_in(api);
            session.initialize().await.unwrap();

            let fetch = session.begin_initialize().unwrap();
            let mut outcome = fetch.run().await;
            outcome.result = Ok(Vec::new());
            assert_eq!(session.finish_initialize(outcome), Ok(2));
            assert_eq!(session.doctors().len(), 2);
        }

        #[tokio::test]
        async fn test_outcome_for_other_session_is_discarded() {
            let mut session_a = signed_in(api_with_doctors());
            let mut session_b = signed_in(MockSchedulingApi::new());

            let outcome = session_a.begin_initialize().unwrap().run().await;
            assert_eq!(
                session_b.finish_initialize(outcome),
                Err(SessionError::StaleOutcome)
            );
            assert_eq!(session_b.directory(), &DoctorDirectory::NotLoaded);
        }
    }

    mod editing {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_update_field_last_write_wins() {
            let mut session = signed_in(MockSchedulingApi::new());
            for value in ["L", "La", "Lan", "Lan N"] {
                session.update_field(DraftField::CustomerName, value).unwrap();
            }
            session.update_field(DraftField::PetType, "Dog").unwrap();
            session.update_field(DraftField::PetType, "Cat").unwrap();

            assert_eq!(session.draft().customer_name, "Lan N");
            assert_eq!(session.draft().pet_type, "Cat");
            assert_eq!(session.draft().pet_name, "");
        }

        #[test]
        fn test_update_by_wire_name() {
            let mut session = signed_in(MockSchedulingApi::new());
            session
                .update_field_by_name("customerPhone", "0901")
                .unwrap();
            session.update_field_by_name("petGender", "MALE").unwrap();
            assert_eq!(session.draft().customer_phone, "0901");
            assert_eq!(session.draft().pet_gender, Some(PetGender::Male));

            assert_eq!(
                session.update_field_by_name("customer", "x"),
                Err(SessionError::UnknownField("customer".to_string()))
            );
        }

        #[test]
        fn test_invalid_choice_is_a_validation_failure() {
            let mut session = signed_in(MockSchedulingApi::new());
            session
                .update_field(DraftField::PaymentMethod, "cash")
                .unwrap();
            let err = session
                .update_field(DraftField::PaymentMethod, "gold")
                .unwrap_err();
            let SessionError::Validation(errors) = err else {
                panic!("expected validation failure, got {err:?}");
            };
            assert!(errors.for_field(DraftField::PaymentMethod).is_some());
            assert_eq!(session.draft().payment_method, Some(PaymentMethod::Cash));
        }

        #[test]
        fn test_dismiss_error_keeps_draft() {
            let mut session = session_with(MockSchedulingApi::new(), StaticCredential::absent());
            session.update_field(DraftField::PetName, "Mochi").unwrap();
            assert!(session.begin_submission().is_err());
            assert!(session.failure_message().is_some());

            session.dismiss_error();
            assert!(session.failure_message().is_none());
            assert_eq!(session.draft().pet_name, "Mochi");
        }
    }

    mod submit {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_no_request_without_credential() {
            let mut api = MockSchedulingApi::new();
            api.expect_create_appointment().never();
            let mut session = session_with(api, StaticCredential::absent());
            fill(&mut session, &complete_draft());

            assert_eq!(
                session.submit().await.err(),
                Some(SessionError::MissingCredential)
            );
            assert_eq!(
                session.state(),
                &SessionState::Editing {
                    last_error: Some(SessionError::MissingCredential)
                }
            );
        }

        #[tokio::test]
        async fn test_signed_out_session_cannot_submit() {
            let mut tokens = MockCredentialProvider::new();
            let mut calls = 0;
            tokens.expect_bearer_token().returning(move || {
                calls += 1;
                if calls == 1 {
                    crate::auth::BearerToken::new("tok")
                } else {
                    None
                }
            });
            let mut api = api_with_doctors();
            api.expect_create_appointment().never();
            let mut session = session_with(api, tokens);
            assert_eq!(session.initialize().await, Ok(2));
            fill(&mut session, &complete_draft());

            assert!(!session.has_credential());
            assert!(!session.can_submit());
        }

        #[tokio::test]
        async fn test_no_request_when_validation_fails() {
            let mut api = MockSchedulingApi::new();
            api.expect_create_appointment().never();
            let mut session = signed_in(api);
            session.update_field(DraftField::PetName, "Mochi").unwrap();

            let err = session.submit().await.err().unwrap();
            assert!(matches!(err, SessionError::Validation(_)));
            let errors = session.validation_errors().unwrap();
            assert!(errors.for_field(DraftField::CustomerName).is_some());
            assert!(errors.for_field(DraftField::PetName).is_none());
            assert!(!session.can_submit());
        }

        #[tokio::test]
        async fn test_success_confirms_with_submitted_draft() {
            let mut api = MockSchedulingApi::new();
            api.expect_create_appointment()
                .withf(|token, payload| {
                    token.expose() == "tok"
                        && payload.appointment_time == "2024-05-01T03:30:00.000Z"
                        && payload.vet_doctor == "d2"
                })
                .times(1)
                .returning(|_, _| Ok(()));
            let mut session = ready(api).await;
            assert!(session.can_submit());
            let before = session.draft().clone();

            let confirmed = session.submit().await.unwrap();
            assert_eq!(confirmed.draft(), &before);
            assert_eq!(confirmed.appointment_time_utc(), "2024-05-01T03:30:00.000Z");
            assert_eq!(confirmed.doctor().unwrap().display_name, "Dr. Hoa");
            assert!(session.is_confirmed());
            let appointment = session.into_confirmed().ok().unwrap();
            assert_eq!(appointment.draft(), &before);
        }

        #[tokio::test]
        async fn test_transitions_through_submitting() {
            let mut api = MockSchedulingApi::new();
            api.expect_create_appointment()
                .times(1)
                .returning(|_, _| Ok(()));
            let mut session = ready(api).await;

            assert!(matches!(session.state(), SessionState::Editing { .. }));
            let pending = session.begin_submission().unwrap();
            assert_eq!(session.state(), &SessionState::Submitting { ticket: 1 });
            let outcome = pending.send().await;
            assert_ok!(session.finish_submission(outcome));
            assert_eq!(session.state(), &SessionState::Confirmed);
        }

        #[tokio::test]
        async fn test_rejection_exposes_server_message_and_keeps_draft() {
            let mut api = MockSchedulingApi::new();
            api.expect_create_appointment().times(1).returning(|_, _| {
                Err(ApiError::Status {
                    endpoint: "POST /appointments",
                    status: 400,
                    message: Some("Slot taken".to_string()),
                })
            });
            let mut session = ready(api).await;
            let before = session.draft().clone();

            let err = session.submit().await.err().unwrap();
            assert_eq!(
                err,
                SessionError::SubmissionFailure {
                    message: "Slot taken".to_string()
                }
            );
            assert_eq!(session.failure_message().as_deref(), Some("Slot taken"));
            assert_eq!(session.draft(), &before);
            assert!(matches!(session.state(), SessionState::Editing { .. }));
            assert!(session.confirmed().is_none());
        }

        #[tokio::test]
        async fn test_transport_failure_uses_generic_message() {
            let mut api = MockSchedulingApi::new();
            api.expect_create_appointment().times(1).returning(|_, _| {
                Err(ApiError::Transport {
                    endpoint: "POST /appointments",
                    reason: "connection reset".to_string(),
                })
            });
            let mut session = ready(api).await;

            assert_err!(session.submit().await);
            assert_eq!(
                session.failure_message().as_deref(),
                Some(GENERIC_SUBMISSION_FAILURE)
            );
        }

        #[tokio::test]
        async fn test_retry_after_failure_sends_again() {
            let mut api = MockSchedulingApi::new();
            let mut attempts = 0;
            api.expect_create_appointment()
                .times(2)
                .returning(move |_, _| {
                    attempts += 1;
                    if attempts == 1 {
                        Err(ApiError::Status {
                            endpoint: "POST /appointments",
                            status: 409,
                            message: Some("Slot taken".to_string()),
                        })
                    } else {
                        Ok(())
                    }
                });
            let mut session = ready(api).await;

            assert_err!(session.submit().await);
            session
                .update_field(DraftField::AppointmentTime, "2024-05-01T11:00")
                .unwrap();
            let confirmed = session.submit().await.unwrap();
            assert_eq!(confirmed.appointment_time_utc(), "2024-05-01T04:00:00.000Z");
        }

        #[tokio::test]
        async fn test_second_submit_while_in_flight_sends_nothing() {
            let mut api = MockSchedulingApi::new();
            api.expect_create_appointment()
                .times(1)
                .returning(|_, _| Ok(()));
            let mut session = ready(api).await;

            let pending = session.begin_submission().unwrap();
            assert_eq!(
                session.begin_submission().err(),
                Some(SessionError::SubmissionInFlight)
            );
            assert_eq!(
                session.update_field(DraftField::PetName, "Other"),
                Err(SessionError::SubmissionInFlight)
            );

            let outcome = pending.send().await;
            assert_ok!(session.finish_submission(outcome));
            assert_eq!(
                session.begin_submission().err(),
                Some(SessionError::AlreadyConfirmed)
            );
            assert_eq!(
                session.update_field(DraftField::PetName, "Other"),
                Err(SessionError::AlreadyConfirmed)
            );
        }

        #[tokio::test]
        async fn test_outcome_from_other_session_is_discarded() {
            let mut api = MockSchedulingApi::new();
            api.expect_create_appointment()
                .times(1)
                .returning(|_, _| Ok(()));
            let mut session_a = ready(api).await;
            let mut session_b = ready(MockSchedulingApi::new()).await;

            let outcome = session_a.begin_submission().unwrap().send().await;
            assert_eq!(
                session_b.finish_submission(outcome).err(),
                Some(SessionError::StaleOutcome)
            );
            assert!(matches!(session_b.state(), SessionState::Editing { .. }));
        }

        #[tokio::test]
        async fn test_outcome_for_old_ticket_is_discarded() {
            let mut api = MockSchedulingApi::new();
            api.expect_create_appointment()
                .times(1)
                .returning(|_, _| Ok(()));
            let mut session = ready(api).await;

            let mut outcome = session.begin_submission().unwrap().send().await;
            outcome.ticket += 7;
            assert_eq!(
                session.finish_submission(outcome).err(),
                Some(SessionError::StaleOutcome)
            );
            assert!(session.is_submitting());
        }

        #[tokio::test]
        async fn test_cancel_sends_nothing() {
            let mut api = MockSchedulingApi::new();
            api.expect_create_appointment().never();
            let session = ready(api).await;
            assert_eq!(session.cancel(), Completion::Cancelled);
        }

        #[tokio::test]
        async fn test_cancel_in_flight_is_abandoned() {
            let mut api = MockSchedulingApi::new();
            api.expect_create_appointment()
                .times(1)
                .returning(|_, _| Ok(()));
            let mut session = ready(api).await;
            let pending = session.begin_submission().unwrap();

            assert_eq!(session.cancel(), Completion::Abandoned);
            // The request still completes; nobody is left to record it
            assert_ok!(pending.send().await.result);
        }
    }
}
