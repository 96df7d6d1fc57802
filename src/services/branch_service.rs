use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::DbError;
use crate::domain::{Branch, BranchIndex, GameSession, StoryPath};
use crate::repositories::{BranchRepository, NodeRepository, SessionRepository};
use crate::utils::{find_branch_points, prefix_through, selection_updates, worth_retaining};

use super::SessionService;
use super::session_service::ensure_active;

pub struct BranchService {
    session_repo: SessionRepository,
    node_repo: NodeRepository,
    branch_repo: BranchRepository,
    sessions: Arc<SessionService>,
    app_config: AppConfig,
}

impl BranchService {
    pub fn new(
        session_repo: SessionRepository,
        node_repo: NodeRepository,
        branch_repo: BranchRepository,
        sessions: Arc<SessionService>,
        app_config: AppConfig,
    ) -> Self {
        Self {
            session_repo,
            node_repo,
            branch_repo,
            sessions,
            app_config,
        }
    }

    /// Active steps, inactive branches and the nodes where they diverge
    pub async fn get_branch_index(&self, session_id: Uuid) -> Result<BranchIndex, DbError> {
        let record = self.session_repo.get_session(session_id).await?;
        let branches = self.branch_repo.get_branches(session_id).await?;

        let branch_points = {
            let all: Vec<&[StoryPath]> = branches.iter().map(|b| b.paths.as_slice()).collect();
            find_branch_points(record.root_node_id, &all)
        };

        let mut active_branch = Vec::new();
        let mut inactive_branches = Vec::new();
        for branch in branches {
            if branch.branch_id == record.active_branch_id {
                active_branch = branch.paths;
            } else {
                inactive_branches.push(Branch {
                    is_active: false,
                    ..branch
                });
            }
        }

        Ok(BranchIndex {
            active_branch,
            inactive_branches,
            branch_points,
        })
    }

    /// Rewind the active path to `node_id`, keeping the abandoned path as an
    /// inactive branch
    pub async fn go_back(&self, session_id: Uuid, node_id: Uuid) -> Result<GameSession, DbError> {
        let mut record = self.session_repo.get_session(session_id).await?;
        ensure_active(&record)?;

        if node_id == record.current_node_id {
            return self.sessions.get_session(session_id).await;
        }

        let branches = self.branch_repo.get_branches(session_id).await?;
        let (active, others): (Vec<Branch>, Vec<Branch>) = branches
            .into_iter()
            .partition(|b| b.branch_id == record.active_branch_id);
        let active_paths = active
            .into_iter()
            .next()
            .map(|b| b.paths)
            .unwrap_or_default();

        let prefix = prefix_through(record.root_node_id, &active_paths, node_id).ok_or_else(|| {
            DbError::InvalidData(format!("Node {} is not on the active path", node_id))
        })?;

        self.retire_branch(session_id, record.active_branch_id, &active_paths, &others)
            .await?;

        let branch = Branch::new(prefix.iter().map(StoryPath::duplicate).collect());
        self.branch_repo
            .insert_branch(session_id, branch.branch_id, branch.created_at, true)
            .await?;
        self.write_paths(session_id, branch.branch_id, &branch.paths)
            .await?;

        let mut target = self.node_repo.get_node(session_id, node_id).await?;
        target.clear_selection();
        self.node_repo.update_selection(&target).await?;

        record.current_node_id = node_id;
        record.active_branch_id = branch.branch_id;
        record.bump_version();
        self.session_repo.update_position(&record).await?;

        tracing::info!(
            session_id = %session_id,
            node_id = %node_id,
            path_version = record.path_version,
            "Went back to earlier node"
        );

        self.sessions.get_session(session_id).await
    }

    /// Make an inactive branch the active path. The former active path is
    /// kept as an inactive branch unless another branch already contains it.
    pub async fn restore_branch(
        &self,
        session_id: Uuid,
        branch_id: Uuid,
    ) -> Result<GameSession, DbError> {
        let mut record = self.session_repo.get_session(session_id).await?;
        ensure_active(&record)?;

        if branch_id == record.active_branch_id {
            return Err(DbError::Conflict(format!(
                "Branch {} is already active",
                branch_id
            )));
        }

        let branches = self.branch_repo.get_branches(session_id).await?;
        let target = branches
            .iter()
            .find(|b| b.branch_id == branch_id)
            .cloned()
            .ok_or(DbError::NotFound)?;

        let active_paths = branches
            .iter()
            .find(|b| b.branch_id == record.active_branch_id)
            .map(|b| b.paths.clone())
            .unwrap_or_default();
        let others: Vec<Branch> = branches
            .into_iter()
            .filter(|b| b.branch_id != record.active_branch_id)
            .collect();

        self.retire_branch(session_id, record.active_branch_id, &active_paths, &others)
            .await?;
        self.branch_repo
            .set_active(session_id, branch_id, true)
            .await?;

        let nodes: HashMap<Uuid, _> = self
            .node_repo
            .get_nodes(session_id)
            .await?
            .into_iter()
            .map(|n| (n.id, n))
            .collect();
        for node in selection_updates(record.root_node_id, &target.paths, &nodes) {
            self.node_repo.update_selection(&node).await?;
        }

        record.current_node_id = target.leaf_node_id().unwrap_or(record.root_node_id);
        record.active_branch_id = branch_id;
        record.bump_version();
        self.session_repo.update_position(&record).await?;

        tracing::info!(
            session_id = %session_id,
            branch_id = %branch_id,
            path_version = record.path_version,
            "Restored branch"
        );

        self.sessions.get_session(session_id).await
    }

    async fn retire_branch(
        &self,
        session_id: Uuid,
        branch_id: Uuid,
        paths: &[StoryPath],
        others: &[Branch],
    ) -> Result<(), DbError> {
        let other_paths: Vec<&[StoryPath]> = others.iter().map(|b| b.paths.as_slice()).collect();

        if worth_retaining(paths, &other_paths) {
            self.branch_repo.set_active(session_id, branch_id, false).await
        } else {
            tracing::debug!(
                session_id = %session_id,
                branch_id = %branch_id,
                "Dropping branch already covered by another"
            );
            self.branch_repo.delete_branch(session_id, branch_id).await
        }
    }

    async fn write_paths(
        &self,
        session_id: Uuid,
        branch_id: Uuid,
        paths: &[StoryPath],
    ) -> Result<(), DbError> {
        for chunk in paths.chunks(self.app_config.max_batch_size.max(1)) {
            self.branch_repo
                .batch_insert_paths(session_id, branch_id, chunk)
                .await?;
        }
        Ok(())
    }
}
