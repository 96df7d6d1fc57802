use chrono::{DateTime, Utc};
use scylla::FromRow;
use uuid::Uuid;

use crate::domain::{
    Choice, NodeKind, SessionRecord, SessionStatus, StoryNode, StoryPath,
};

// Database row model for game_sessions table
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub session_id: Uuid,
    pub character: String,
    pub game_state: String,
    pub root_node_id: Uuid,
    pub current_node_id: Uuid,
    pub active_branch_id: Uuid,
    pub path_version: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl SessionRow {
    pub fn from_record(record: &SessionRecord) -> Result<Self, String> {
        let character = serde_json::to_string(&record.character)
            .map_err(|e| format!("Failed to serialize character: {}", e))?;
        let game_state = serde_json::to_string(&record.game_state)
            .map_err(|e| format!("Failed to serialize game state: {}", e))?;

        Ok(SessionRow {
            session_id: record.session_id,
            character,
            game_state,
            root_node_id: record.root_node_id,
            current_node_id: record.current_node_id,
            active_branch_id: record.active_branch_id,
            path_version: record.path_version,
            status: record.status.as_str().to_string(),
            created_at: record.created_at,
            ended_at: record.ended_at,
        })
    }

    pub fn to_record(self) -> Result<SessionRecord, String> {
        let status = SessionStatus::parse(&self.status)
            .ok_or_else(|| format!("Invalid session status: {}", self.status))?;
        let character = serde_json::from_str(&self.character)
            .map_err(|e| format!("Failed to deserialize character: {}", e))?;
        let game_state = serde_json::from_str(&self.game_state)
            .map_err(|e| format!("Failed to deserialize game state: {}", e))?;

        Ok(SessionRecord {
            session_id: self.session_id,
            character,
            game_state,
            root_node_id: self.root_node_id,
            current_node_id: self.current_node_id,
            active_branch_id: self.active_branch_id,
            path_version: self.path_version,
            status,
            created_at: self.created_at,
            ended_at: self.ended_at,
        })
    }
}

// Database row model for story_nodes table
#[derive(Debug, Clone, FromRow)]
pub struct NodeRow {
    pub session_id: Uuid,
    pub node_id: Uuid,
    pub parent_node_id: Option<Uuid>,
    pub depth: i32,
    pub kind: String,
    pub kind_data: String,
    pub content: String,
    pub location: Option<String>,
    pub scene_description: Option<String>,
    pub choices: String,
    pub selected_choice_id: Option<Uuid>,
    pub selected_choice_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NodeRow {
    pub fn from_node(node: &StoryNode) -> Result<Self, String> {
        let kind_data = serde_json::to_string(&node.kind)
            .map_err(|e| format!("Failed to serialize node kind: {}", e))?;
        let choices = serde_json::to_string(&node.choices)
            .map_err(|e| format!("Failed to serialize choices: {}", e))?;

        Ok(NodeRow {
            session_id: node.session_id,
            node_id: node.id,
            parent_node_id: node.parent_node_id,
            depth: node.depth,
            kind: node.kind.as_str().to_string(),
            kind_data,
            content: node.content.clone(),
            location: node.location.clone(),
            scene_description: node.scene_description.clone(),
            choices,
            selected_choice_id: node.selected_choice_id,
            selected_choice_text: node.selected_choice_text.clone(),
            created_at: node.created_at,
        })
    }

    pub fn to_node(self) -> Result<StoryNode, String> {
        let kind: NodeKind = serde_json::from_str(&self.kind_data)
            .map_err(|e| format!("Failed to parse {} node data: {}", self.kind, e))?;
        let choices: Vec<Choice> = serde_json::from_str(&self.choices)
            .map_err(|e| format!("Failed to parse choices: {}", e))?;

        Ok(StoryNode {
            id: self.node_id,
            session_id: self.session_id,
            content: self.content,
            location: self.location,
            scene_description: self.scene_description,
            choices,
            kind,
            selected_choice_id: self.selected_choice_id,
            selected_choice_text: self.selected_choice_text,
            parent_node_id: self.parent_node_id,
            depth: self.depth,
            created_at: self.created_at,
        })
    }
}

// Database row model for session_branches table
#[derive(Debug, Clone, FromRow)]
pub struct BranchRow {
    pub session_id: Uuid,
    pub branch_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

// Database row model for path_steps table
#[derive(Debug, Clone, FromRow)]
pub struct PathRow {
    pub session_id: Uuid,
    pub branch_id: Uuid,
    pub step_order: i32,
    pub path_id: Uuid,
    pub node_id: Uuid,
    pub choice_id: Uuid,
    pub choice_text: String,
    pub created_at: DateTime<Utc>,
}

impl PathRow {
    pub fn from_path(session_id: Uuid, branch_id: Uuid, path: &StoryPath) -> Self {
        PathRow {
            session_id,
            branch_id,
            step_order: path.step_order,
            path_id: path.id,
            node_id: path.node_id,
            choice_id: path.choice_id,
            choice_text: path.choice_text.clone(),
            created_at: path.created_at,
        }
    }

    pub fn to_path(self) -> StoryPath {
        StoryPath {
            id: self.path_id,
            node_id: self.node_id,
            choice_id: self.choice_id,
            choice_text: self.choice_text,
            step_order: self.step_order,
            created_at: self.created_at,
        }
    }
}
