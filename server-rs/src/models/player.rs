use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{require_text, Validate, ValidationError};
use crate::db::Resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    /// Soft reference to a team; the referenced team may not exist.
    pub team_id: Uuid,
    pub position: String,
    pub age: i32,
    pub jersey_number: i32,
    pub race: Option<String>,
}

/// Body of `POST /players` and `PUT /players/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPayload {
    pub name: String,
    pub team_id: Uuid,
    pub position: String,
    pub age: i32,
    pub jersey_number: i32,
    #[serde(default)]
    pub race: Option<String>,
}

impl Validate for PlayerPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("position", &self.position)
    }
}

impl Resource for Player {
    const TABLE: &'static str = "players";
    const ENTITY: &'static str = "Player";
    type Payload = PlayerPayload;
}
