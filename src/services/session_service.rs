use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::DbError;
use crate::domain::{
    Branch, Character, GameSession, GameState, PathHistory, SessionRecord, SessionStatus,
    StoryNode,
};
use crate::generator::SceneGenerator;
use crate::repositories::{BranchRepository, NodeRepository, SessionRepository};
use crate::utils::assemble_path;

pub struct SessionService {
    session_repo: SessionRepository,
    node_repo: NodeRepository,
    branch_repo: BranchRepository,
    generator: Arc<dyn SceneGenerator>,
}

impl SessionService {
    pub fn new(
        session_repo: SessionRepository,
        node_repo: NodeRepository,
        branch_repo: BranchRepository,
        generator: Arc<dyn SceneGenerator>,
    ) -> Self {
        Self {
            session_repo,
            node_repo,
            branch_repo,
            generator,
        }
    }

    /// Start a new game: opening scene, empty active branch, session header
    pub async fn start_session(
        &self,
        character: Character,
        game_state: GameState,
    ) -> Result<GameSession, DbError> {
        let session_id = Uuid::new_v4();
        let root = self
            .generator
            .opening_scene(&character)
            .into_node(session_id, None);
        let branch = Branch::new(Vec::new());

        let record = SessionRecord {
            session_id,
            character,
            game_state,
            root_node_id: root.id,
            current_node_id: root.id,
            active_branch_id: branch.branch_id,
            path_version: 0,
            status: SessionStatus::Active,
            created_at: Utc::now(),
            ended_at: None,
        };

        self.node_repo.insert_node(&root).await?;
        self.branch_repo
            .insert_branch(session_id, branch.branch_id, branch.created_at, true)
            .await?;
        self.session_repo.insert_session(&record).await?;

        tracing::info!(session_id = %session_id, "Started game session");

        Ok(GameSession {
            id: session_id,
            character: record.character,
            game_state: record.game_state,
            current_story_node: root.clone(),
            active_branch_id: branch.branch_id,
            path_version: 0,
            status: SessionStatus::Active,
            story_nodes: vec![root],
            story_paths: Vec::new(),
            created_at: record.created_at,
            ended_at: None,
        })
    }

    /// Full session aggregate: every node plus the active path
    pub async fn get_session(&self, session_id: Uuid) -> Result<GameSession, DbError> {
        let record = self.session_repo.get_session(session_id).await?;
        let story_nodes = self.node_repo.get_nodes(session_id).await?;
        let story_paths = self
            .branch_repo
            .get_branch_paths(session_id, record.active_branch_id)
            .await?;

        let current_story_node = story_nodes
            .iter()
            .find(|n| n.id == record.current_node_id)
            .cloned()
            .ok_or_else(|| {
                DbError::Corrupt(format!(
                    "Current node {} of session {} is missing",
                    record.current_node_id, session_id
                ))
            })?;

        Ok(GameSession {
            id: record.session_id,
            character: record.character,
            game_state: record.game_state,
            current_story_node,
            active_branch_id: record.active_branch_id,
            path_version: record.path_version,
            status: record.status,
            story_nodes,
            story_paths,
            created_at: record.created_at,
            ended_at: record.ended_at,
        })
    }

    /// Active path from root to the current node, plus every node
    pub async fn get_path_history(&self, session_id: Uuid) -> Result<PathHistory, DbError> {
        let record = self.session_repo.get_session(session_id).await?;
        let paths = self
            .branch_repo
            .get_branch_paths(session_id, record.active_branch_id)
            .await?;
        let all_nodes = self.node_repo.get_nodes(session_id).await?;

        let current_path = assemble_path(record.root_node_id, &paths);
        let by_id: HashMap<Uuid, &StoryNode> = all_nodes.iter().map(|n| (n.id, n)).collect();

        let path_nodes = current_path
            .iter()
            .map(|id| {
                by_id.get(id).map(|n| (*n).clone()).ok_or_else(|| {
                    DbError::Corrupt(format!("Path node {} of session {} is missing", id, session_id))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PathHistory {
            path_version: record.path_version,
            current_path,
            path_nodes,
            all_nodes,
        })
    }

    /// End a session; ending an ended session returns it unchanged
    pub async fn end_session(&self, session_id: Uuid) -> Result<GameSession, DbError> {
        let mut record = self.session_repo.get_session(session_id).await?;

        if !record.is_ended() {
            record.status = SessionStatus::Ended;
            record.ended_at = Some(Utc::now());
            self.session_repo.update_status(&record).await?;
            tracing::info!(session_id = %session_id, "Ended game session");
        }

        self.get_session(session_id).await
    }
}

/// Reject mutations on ended sessions
pub(crate) fn ensure_active(record: &SessionRecord) -> Result<(), DbError> {
    if record.is_ended() {
        return Err(DbError::Conflict(format!(
            "Session {} has ended",
            record.session_id
        )));
    }
    Ok(())
}
