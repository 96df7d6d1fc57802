use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::path::StoryPath;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub branch_id: Uuid,
    pub paths: Vec<StoryPath>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Branch {
    pub fn new(paths: Vec<StoryPath>) -> Self {
        Branch {
            branch_id: Uuid::new_v4(),
            paths,
            created_at: Utc::now(),
            is_active: true,
        }
    }

    pub fn leaf_node_id(&self) -> Option<Uuid> {
        self.paths.last().map(|p| p.node_id)
    }

    pub fn next_step(&self) -> i32 {
        self.paths.last().map(|p| p.step_order + 1).unwrap_or(1)
    }
}

/// A node from which at least two distinct continuations exist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BranchPoint {
    pub node_id: Uuid,
    pub paths: Vec<StoryPath>,
    pub branch_count: usize,
}
