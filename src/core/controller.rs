use crate::models::{FormFields, QueryInput, ResponsePayload};
use crate::services::{MatchError, MatchingClient};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use validator::Validate;

/// Where the form is in its submit lifecycle
///
/// `data`, `error` and `loading` are projections of a single phase, so at
/// most one of them is ever populated.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success(ResponsePayload),
    Failure(String),
}

impl Phase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }

    pub fn data(&self) -> Option<&ResponsePayload> {
        match self {
            Phase::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Phase::Failure(message) => Some(message),
            _ => None,
        }
    }
}

/// Everything the renderer needs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub form: FormFields,
    pub phase: Phase,
}

impl ViewState {
    pub fn loading(&self) -> bool {
        self.phase.is_loading()
    }

    pub fn data(&self) -> Option<&ResponsePayload> {
        self.phase.data()
    }

    pub fn error(&self) -> Option<&str> {
        self.phase.error()
    }
}

/// Reasons a submission is refused before anything is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a submission is already in flight")]
    InFlight,

    #[error("project description is required")]
    EmptyDescription,
}

/// Form state container
///
/// Owns the input fields and drives `Idle -> Loading -> Success | Failure`.
/// The controller can be shared (e.g. behind an `Arc`); the in-flight check
/// and the transition to `Loading` happen under one lock, so overlapping
/// submissions dispatch a single request.
#[derive(Debug)]
pub struct FormController {
    client: MatchingClient,
    state: Mutex<ViewState>,
}

impl FormController {
    pub fn new(client: MatchingClient) -> Self {
        Self {
            client,
            state: Mutex::new(ViewState::default()),
        }
    }

    pub fn client(&self) -> &MatchingClient {
        &self.client
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        // State is replaced wholesale on every transition, so a poisoned
        // guard still holds a consistent value.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_description(&self, value: impl Into<String>) {
        self.lock().form.description = value.into();
    }

    pub fn set_sector(&self, value: impl Into<String>) {
        self.lock().form.sector = value.into();
    }

    pub fn set_region(&self, value: impl Into<String>) {
        self.lock().form.region = value.into();
    }

    /// Snapshot of the current state for rendering
    pub fn view(&self) -> ViewState {
        self.lock().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().phase.is_loading()
    }

    /// Validate the form and enter `Loading`
    ///
    /// Clears any previous result or error. Returns the body to send.
    /// Rejected submissions leave the state untouched.
    pub fn begin_submit(&self) -> Result<QueryInput, SubmitError> {
        let mut state = self.lock();

        if state.phase.is_loading() {
            tracing::warn!("Ignoring submit while a request is in flight");
            return Err(SubmitError::InFlight);
        }

        let input = state.form.to_query();
        if input.validate().is_err() {
            return Err(SubmitError::EmptyDescription);
        }

        state.phase = Phase::Loading;
        Ok(input)
    }

    /// Apply the outcome of a dispatched request
    ///
    /// Outcomes arriving while nothing is in flight are dropped and the
    /// current state is returned unchanged.
    pub fn settle(&self, outcome: Result<ResponsePayload, MatchError>) -> ViewState {
        let mut state = self.lock();

        if !state.phase.is_loading() {
            tracing::debug!("Dropping outcome with no request in flight");
            return state.clone();
        }

        state.phase = match outcome {
            Ok(payload) => Phase::Success(payload),
            Err(e) => {
                tracing::debug!("Submission failed: {}", e);
                Phase::Failure(e.to_string())
            }
        };

        state.clone()
    }

    /// Submit the current form
    ///
    /// Sends exactly one request and waits for it to settle. No retry, no
    /// cancellation.
    pub async fn submit(&self) -> Result<ViewState, SubmitError> {
        let input = self.begin_submit()?;
        let outcome = self.client.find_matches(&input).await;
        Ok(self.settle(outcome))
    }

    /// Fill the form and submit it
    pub async fn submit_fields(&self, fields: FormFields) -> Result<ViewState, SubmitError> {
        {
            let mut state = self.lock();
            if state.phase.is_loading() {
                return Err(SubmitError::InFlight);
            }
            state.form = fields;
        }
        self.submit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Report;

    fn create_controller() -> FormController {
        // Never contacted: these tests drive transitions by hand
        let client = MatchingClient::new("http://127.0.0.1:9", None).unwrap();
        FormController::new(client)
    }

    fn create_payload() -> ResponsePayload {
        ResponsePayload {
            results: vec![],
            report: Report {
                detected_categories: vec!["health".to_string()],
                highlights: vec![],
                notes: String::new(),
                generated_at: "2025-06-01T12:00:00Z".to_string(),
            },
        }
    }

    #[test]
    fn test_starts_idle() {
        let controller = create_controller();
        let view = controller.view();
        assert_eq!(view.phase, Phase::Idle);
        assert!(!view.loading());
        assert!(view.data().is_none());
        assert!(view.error().is_none());
    }

    #[test]
    fn test_begin_submit_enters_loading() {
        let controller = create_controller();
        controller.set_description("test");

        let input = controller.begin_submit().unwrap();
        assert_eq!(input, QueryInput::from_form("test", "", ""));
        assert!(controller.is_loading());
    }

    #[test]
    fn test_empty_description_rejected_without_state_change() {
        let controller = create_controller();
        controller.set_sector("health");

        assert_eq!(controller.begin_submit(), Err(SubmitError::EmptyDescription));
        assert_eq!(controller.view().phase, Phase::Idle);
    }

    #[test]
    fn test_second_begin_rejected_while_loading() {
        let controller = create_controller();
        controller.set_description("test");

        controller.begin_submit().unwrap();
        assert_eq!(controller.begin_submit(), Err(SubmitError::InFlight));
        assert!(controller.is_loading());
    }

    #[test]
    fn test_settle_success_clears_loading() {
        let controller = create_controller();
        controller.set_description("test");
        controller.begin_submit().unwrap();

        let view = controller.settle(Ok(create_payload()));
        assert!(!view.loading());
        assert!(view.data().is_some());
        assert!(view.error().is_none());
    }

    #[test]
    fn test_settle_failure_keeps_data_empty() {
        let controller = create_controller();
        controller.set_description("test");
        controller.begin_submit().unwrap();

        let view = controller.settle(Err(MatchError::RequestFailed(502)));
        assert!(!view.loading());
        assert!(view.data().is_none());
        assert_eq!(view.error(), Some("Request failed: 502"));
    }

    #[test]
    fn test_settle_without_dispatch_is_dropped() {
        let controller = create_controller();

        let view = controller.settle(Ok(create_payload()));
        assert_eq!(view.phase, Phase::Idle);
        assert_eq!(controller.view().phase, Phase::Idle);
    }

    #[test]
    fn test_duplicate_settle_keeps_first_outcome() {
        let controller = create_controller();
        controller.set_description("test");
        controller.begin_submit().unwrap();
        controller.settle(Err(MatchError::RequestFailed(500)));

        let view = controller.settle(Ok(create_payload()));
        assert_eq!(view.error(), Some("Request failed: 500"));
        assert!(view.data().is_none());
    }

    #[test]
    fn test_resubmit_clears_previous_result() {
        let controller = create_controller();
        controller.set_description("test");
        controller.begin_submit().unwrap();
        controller.settle(Err(MatchError::RequestFailed(500)));

        controller.begin_submit().unwrap();
        let view = controller.view();
        assert!(view.error().is_none());
        assert!(view.data().is_none());
        assert!(view.loading());
    }

    #[test]
    fn test_editing_fields_keeps_phase() {
        let controller = create_controller();
        controller.set_description("test");
        controller.begin_submit().unwrap();
        controller.settle(Ok(create_payload()));

        controller.set_region("EU");
        let view = controller.view();
        assert_eq!(view.form.region, "EU");
        assert!(view.data().is_some());
    }
}
