use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Character, Choice, GameState};

// Request DTOs
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    pub character: Character,
    #[serde(default)]
    pub game_state: Option<GameState>,
}

// Response DTOs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOptionResponse {
    #[serde(flatten)]
    pub choice: Choice,
    pub available: bool,
}

impl From<(Choice, bool)> for ChoiceOptionResponse {
    fn from((choice, available): (Choice, bool)) -> Self {
        ChoiceOptionResponse { choice, available }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}
