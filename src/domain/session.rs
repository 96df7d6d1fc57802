use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::branch::{Branch, BranchPoint};
use super::character::{Character, GameState};
use super::node::StoryNode;
use super::path::StoryPath;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Ended,
}

impl SessionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Ended => "ended",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(SessionStatus::Active),
            "ended" => Some(SessionStatus::Ended),
            _ => None,
        }
    }
}

/// Session header as stored; the aggregate view is [`GameSession`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub session_id: Uuid,
    pub character: Character,
    pub game_state: GameState,
    pub root_node_id: Uuid,
    pub current_node_id: Uuid,
    pub active_branch_id: Uuid,
    pub path_version: i32,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    pub fn is_ended(&self) -> bool {
        self.status == SessionStatus::Ended
    }

    pub fn bump_version(&mut self) {
        self.path_version += 1;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub id: Uuid,
    pub character: Character,
    pub game_state: GameState,
    pub current_story_node: StoryNode,
    pub active_branch_id: Uuid,
    pub path_version: i32,
    pub status: SessionStatus,
    pub story_nodes: Vec<StoryNode>,
    pub story_paths: Vec<StoryPath>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

/// Active path of a session, root first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PathHistory {
    #[serde(default)]
    pub path_version: i32,
    pub current_path: Vec<Uuid>,
    pub path_nodes: Vec<StoryNode>,
    pub all_nodes: Vec<StoryNode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BranchIndex {
    pub active_branch: Vec<StoryPath>,
    pub inactive_branches: Vec<Branch>,
    pub branch_points: Vec<BranchPoint>,
}
