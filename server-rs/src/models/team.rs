use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{require_text, Validate, ValidationError};
use crate::db::Resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub region: String,
    pub description: Option<String>,
}

/// Body of `POST /teams` and `PUT /teams/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamPayload {
    pub name: String,
    pub region: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Validate for TeamPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("region", &self.region)
    }
}

impl Resource for Team {
    const TABLE: &'static str = "teams";
    const ENTITY: &'static str = "Team";
    type Payload = TeamPayload;
}
