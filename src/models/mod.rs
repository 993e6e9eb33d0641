// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::FormFields;
pub use requests::QueryInput;
pub use responses::{BackendStatus, MatchResult, Report, ResponsePayload};
