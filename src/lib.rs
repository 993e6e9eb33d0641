//! Funding Finder - client for a remote funding-opportunity matching service
//!
//! Collects a project description with optional sector/region filters,
//! submits it to the matching backend and renders the ranked opportunities
//! together with the backend's summary report.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{render, FormController, Phase, SubmitError, ViewState};
pub use models::{BackendStatus, FormFields, MatchResult, QueryInput, Report, ResponsePayload};
pub use services::{MatchError, MatchingClient};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let input = QueryInput::from_form("test", "", "");
        assert!(input.sector.is_none());
        assert!(render(&ViewState::default()).contains("Find opportunities"));
    }
}
