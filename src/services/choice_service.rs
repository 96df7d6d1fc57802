use std::sync::Arc;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::DbError;
use crate::domain::{Choice, GameSession, StoryPath, can_make_choice};
use crate::generator::SceneGenerator;
use crate::repositories::{BranchRepository, NodeRepository, SessionRepository};
use crate::utils::validate_path_depth;

use super::SessionService;
use super::session_service::ensure_active;

pub struct ChoiceService {
    session_repo: SessionRepository,
    node_repo: NodeRepository,
    branch_repo: BranchRepository,
    sessions: Arc<SessionService>,
    generator: Arc<dyn SceneGenerator>,
    app_config: AppConfig,
}

impl ChoiceService {
    pub fn new(
        session_repo: SessionRepository,
        node_repo: NodeRepository,
        branch_repo: BranchRepository,
        sessions: Arc<SessionService>,
        generator: Arc<dyn SceneGenerator>,
        app_config: AppConfig,
    ) -> Self {
        Self {
            session_repo,
            node_repo,
            branch_repo,
            sessions,
            generator,
            app_config,
        }
    }

    /// Choices of the current node with whether the character may take them
    pub async fn available_choices(&self, session_id: Uuid) -> Result<Vec<(Choice, bool)>, DbError> {
        let record = self.session_repo.get_session(session_id).await?;
        let current = self
            .node_repo
            .get_node(session_id, record.current_node_id)
            .await?;

        let locked = record.is_ended() || current.is_ending();

        Ok(current
            .choices
            .into_iter()
            .map(|choice| {
                let available = !locked && can_make_choice(&choice, &record.character);
                (choice, available)
            })
            .collect())
    }

    /// Resolve a choice on the current node, extending the active branch
    pub async fn make_choice(
        &self,
        session_id: Uuid,
        choice_id: Uuid,
    ) -> Result<GameSession, DbError> {
        let mut record = self.session_repo.get_session(session_id).await?;
        ensure_active(&record)?;

        let mut current = self
            .node_repo
            .get_node(session_id, record.current_node_id)
            .await?;

        if current.is_ending() {
            return Err(DbError::Conflict("The story has reached an ending".to_string()));
        }

        let choice = current
            .find_choice(choice_id)
            .cloned()
            .ok_or_else(|| {
                DbError::InvalidData(format!(
                    "Choice {} is not offered by node {}",
                    choice_id, current.id
                ))
            })?;

        if !can_make_choice(&choice, &record.character) {
            return Err(DbError::InvalidData(format!(
                "Requirements for choice '{}' are not met",
                choice.text
            )));
        }

        let branch = self
            .branch_repo
            .get_branch(session_id, record.active_branch_id)
            .await?;
        validate_path_depth(branch.paths.len() + 2, self.app_config.max_path_depth)
            .map_err(DbError::InvalidData)?;

        let next = self
            .generator
            .next_scene(&current, &choice, &record.character)
            .into_node(session_id, Some(&current));

        self.node_repo.insert_node(&next).await?;

        current.select_choice(&choice);
        self.node_repo.update_selection(&current).await?;

        let step_order = branch.next_step();
        let step = StoryPath::new(next.id, choice.id, choice.text.clone(), step_order);
        self.branch_repo
            .insert_path(session_id, branch.branch_id, &step)
            .await?;

        record.current_node_id = next.id;
        self.session_repo.update_position(&record).await?;

        tracing::debug!(
            session_id = %session_id,
            node_id = %next.id,
            step = step_order,
            "Choice resolved"
        );

        self.sessions.get_session(session_id).await
    }
}
