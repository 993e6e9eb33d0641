use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /match`
///
/// Absent filters are serialized as explicit `null`s; the backend expects
/// all three keys on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct QueryInput {
    #[validate(length(min = 1))]
    pub description: String,
    pub sector: Option<String>,
    pub region: Option<String>,
}

impl QueryInput {
    /// Build a query from raw form values
    ///
    /// Empty sector/region strings collapse to `None`. Only the exact empty
    /// string collapses; whitespace is sent as typed.
    pub fn from_form(description: &str, sector: &str, region: &str) -> Self {
        Self {
            description: description.to_string(),
            sector: non_empty(sector),
            region: non_empty(region),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
