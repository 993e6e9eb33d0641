use serde::{Deserialize, Serialize};

use crate::models::requests::QueryInput;

/// Raw form fields as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    pub description: String,
    pub sector: String,
    pub region: String,
}

impl FormFields {
    pub fn new(
        description: impl Into<String>,
        sector: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            sector: sector.into(),
            region: region.into(),
        }
    }

    /// Snapshot the fields into a request body
    pub fn to_query(&self) -> QueryInput {
        QueryInput::from_form(&self.description, &self.sector, &self.region)
    }
}
