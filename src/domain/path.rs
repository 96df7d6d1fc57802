use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One step of a story path: `node_id` was reached at `step_order` by
/// choosing `choice_id` on the previous node. The root node is step 0 and has
/// no record of its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoryPath {
    pub id: Uuid,
    pub node_id: Uuid,
    pub choice_id: Uuid,
    pub choice_text: String,
    pub step_order: i32,
    pub created_at: DateTime<Utc>,
}

impl StoryPath {
    pub fn new(node_id: Uuid, choice_id: Uuid, choice_text: String, step_order: i32) -> Self {
        StoryPath {
            id: Uuid::new_v4(),
            node_id,
            choice_id,
            choice_text,
            step_order,
            created_at: Utc::now(),
        }
    }

    /// Copy of this step under a fresh record id, for seeding a new branch.
    pub fn duplicate(&self) -> Self {
        StoryPath {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }
}
