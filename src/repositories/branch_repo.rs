use chrono::{DateTime, Utc};
use scylla::IntoTypedRows;
use scylla::batch::{Batch, BatchType};
use scylla::query::Query;
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::{BranchRow, DbClient, DbError, PathRow};
use crate::domain::{Branch, StoryPath};

#[derive(Clone)]
pub struct BranchRepository {
    client: DbClient,
}

impl BranchRepository {
    pub fn new(client: DbClient) -> Self {
        Self { client }
    }

    /// Insert a branch header; its steps are written separately
    pub async fn insert_branch(
        &self,
        session_id: Uuid,
        branch_id: Uuid,
        created_at: DateTime<Utc>,
        is_active: bool,
    ) -> Result<(), DbError> {
        let query = Query::new(crate::db::queries::INSERT_BRANCH);

        self.client
            .session()
            .query(query, (session_id, branch_id, created_at, is_active))
            .await?;

        Ok(())
    }

    /// Append one step to a branch
    pub async fn insert_path(
        &self,
        session_id: Uuid,
        branch_id: Uuid,
        path: &StoryPath,
    ) -> Result<(), DbError> {
        let row = PathRow::from_path(session_id, branch_id, path);
        let query = Query::new(crate::db::queries::INSERT_PATH);

        self.client
            .session()
            .query(
                query,
                (
                    row.session_id,
                    row.branch_id,
                    row.step_order,
                    row.path_id,
                    row.node_id,
                    row.choice_id,
                    row.choice_text,
                    row.created_at,
                ),
            )
            .await?;

        Ok(())
    }

    /// Write several steps of one branch in a single unlogged batch
    pub async fn batch_insert_paths(
        &self,
        session_id: Uuid,
        branch_id: Uuid,
        paths: &[StoryPath],
    ) -> Result<(), DbError> {
        if paths.is_empty() {
            return Ok(());
        }

        let mut batch = Batch::new(BatchType::Unlogged);
        let mut values_list = Vec::with_capacity(paths.len());

        for path in paths {
            let row = PathRow::from_path(session_id, branch_id, path);
            batch.append_statement(crate::db::queries::INSERT_PATH);
            values_list.push((
                row.session_id,
                row.branch_id,
                row.step_order,
                row.path_id,
                row.node_id,
                row.choice_id,
                row.choice_text,
                row.created_at,
            ));
        }

        self.client.session().batch(&batch, values_list).await?;

        Ok(())
    }

    pub async fn get_branch(&self, session_id: Uuid, branch_id: Uuid) -> Result<Branch, DbError> {
        let query = Query::new(crate::db::queries::SELECT_BRANCH);

        let result = self
            .client
            .session()
            .query(query, (session_id, branch_id))
            .await?;

        let row = result
            .rows
            .ok_or(DbError::NotFound)?
            .into_typed::<BranchRow>()
            .next()
            .ok_or(DbError::NotFound)?
            .map_err(|e| DbError::Corrupt(format!("Failed to parse branch row: {}", e)))?;

        let paths = self.get_branch_paths(session_id, branch_id).await?;

        Ok(Branch {
            branch_id: row.branch_id,
            paths,
            created_at: row.created_at,
            is_active: row.is_active,
        })
    }

    /// Steps of one branch in step order
    pub async fn get_branch_paths(
        &self,
        session_id: Uuid,
        branch_id: Uuid,
    ) -> Result<Vec<StoryPath>, DbError> {
        let query = Query::new(crate::db::queries::SELECT_PATHS_BY_BRANCH);

        let result = self
            .client
            .session()
            .query(query, (session_id, branch_id))
            .await?;

        let rows = result.rows.unwrap_or_default();
        let mut paths = Vec::new();

        for row in rows.into_typed::<PathRow>() {
            let row =
                row.map_err(|e| DbError::Corrupt(format!("Failed to parse row: {}", e)))?;
            paths.push(row.to_path());
        }

        paths.sort_by_key(|p| p.step_order);

        Ok(paths)
    }

    /// All branches of a session with their steps, oldest first
    pub async fn get_branches(&self, session_id: Uuid) -> Result<Vec<Branch>, DbError> {
        let branch_query = Query::new(crate::db::queries::SELECT_BRANCHES_BY_SESSION);
        let result = self
            .client
            .session()
            .query(branch_query, (session_id,))
            .await?;

        let mut headers = Vec::new();
        for row in result.rows.unwrap_or_default().into_typed::<BranchRow>() {
            let row =
                row.map_err(|e| DbError::Corrupt(format!("Failed to parse row: {}", e)))?;
            headers.push(row);
        }

        let path_query = Query::new(crate::db::queries::SELECT_PATHS_BY_SESSION);
        let result = self
            .client
            .session()
            .query(path_query, (session_id,))
            .await?;

        let mut steps: HashMap<Uuid, Vec<StoryPath>> = HashMap::new();
        for row in result.rows.unwrap_or_default().into_typed::<PathRow>() {
            let row =
                row.map_err(|e| DbError::Corrupt(format!("Failed to parse row: {}", e)))?;
            steps.entry(row.branch_id).or_default().push(row.to_path());
        }

        let mut branches: Vec<Branch> = headers
            .into_iter()
            .map(|header| {
                let mut paths = steps.remove(&header.branch_id).unwrap_or_default();
                paths.sort_by_key(|p| p.step_order);
                Branch {
                    branch_id: header.branch_id,
                    paths,
                    created_at: header.created_at,
                    is_active: header.is_active,
                }
            })
            .collect();

        branches.sort_by_key(|b| b.created_at);

        Ok(branches)
    }

    pub async fn set_active(
        &self,
        session_id: Uuid,
        branch_id: Uuid,
        is_active: bool,
    ) -> Result<(), DbError> {
        let query = Query::new(crate::db::queries::UPDATE_BRANCH_ACTIVE);

        self.client
            .session()
            .query(query, (is_active, session_id, branch_id))
            .await?;

        Ok(())
    }

    /// Delete a branch header and all of its steps (nodes are kept)
    pub async fn delete_branch(&self, session_id: Uuid, branch_id: Uuid) -> Result<(), DbError> {
        let query = Query::new(crate::db::queries::DELETE_PATHS_BY_BRANCH);
        self.client
            .session()
            .query(query, (session_id, branch_id))
            .await?;

        let query = Query::new(crate::db::queries::DELETE_BRANCH);
        self.client
            .session()
            .query(query, (session_id, branch_id))
            .await?;

        Ok(())
    }
}
