use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// A single funding opportunity as ranked by the matching service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MatchResult {
    pub title: String,
    pub agency: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub match_score: f64,
    pub why: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

// `"categories": null` reads the same as a missing key
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Summary accompanying a set of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub detected_categories: Vec<String>,
    pub highlights: Vec<String>,
    pub notes: String,
    /// ISO-8601 timestamp; kept as sent since the backend may omit the offset
    pub generated_at: String,
}

/// Success body of `POST /match`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub results: Vec<MatchResult>,
    pub report: Report,
}

impl ResponsePayload {
    /// Validate every result, stopping at the first offending one
    pub fn validate_results(&self) -> Result<(), String> {
        for (idx, result) in self.results.iter().enumerate() {
            result
                .validate()
                .map_err(|e| format!("results[{}]: {}", idx, e))?;
        }
        Ok(())
    }
}

/// Outcome of `GET /test`
///
/// The endpoint is owned by the backend, so the body is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendStatus {
    pub url: String,
    pub status_code: u16,
    pub body: String,
}

impl BackendStatus {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
