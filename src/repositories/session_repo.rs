use scylla::IntoTypedRows;
use scylla::query::Query;
use uuid::Uuid;

use crate::db::{DbClient, DbError, SessionRow};
use crate::domain::SessionRecord;

#[derive(Clone)]
pub struct SessionRepository {
    client: DbClient,
}

impl SessionRepository {
    pub fn new(client: DbClient) -> Self {
        Self { client }
    }

    /// Insert a new session header
    pub async fn insert_session(&self, record: &SessionRecord) -> Result<(), DbError> {
        let row = SessionRow::from_record(record).map_err(DbError::SerializationError)?;
        let query = Query::new(crate::db::queries::INSERT_SESSION);

        self.client
            .session()
            .query(
                query,
                (
                    row.session_id,
                    row.character,
                    row.game_state,
                    row.root_node_id,
                    row.current_node_id,
                    row.active_branch_id,
                    row.path_version,
                    row.status,
                    row.created_at,
                    row.ended_at,
                ),
            )
            .await?;

        Ok(())
    }

    pub async fn get_session(&self, session_id: Uuid) -> Result<SessionRecord, DbError> {
        let query = Query::new(crate::db::queries::SELECT_SESSION);

        let result = self.client.session().query(query, (session_id,)).await?;

        let row = result
            .rows
            .ok_or(DbError::NotFound)?
            .into_typed::<SessionRow>()
            .next()
            .ok_or(DbError::NotFound)?
            .map_err(|e| DbError::Corrupt(format!("Failed to parse session row: {}", e)))?;

        row.to_record().map_err(DbError::Corrupt)
    }

    /// Persist the current node, active branch, path version and game state
    pub async fn update_position(&self, record: &SessionRecord) -> Result<(), DbError> {
        let game_state = serde_json::to_string(&record.game_state)
            .map_err(|e| DbError::SerializationError(e.to_string()))?;
        let query = Query::new(crate::db::queries::UPDATE_SESSION_POSITION);

        self.client
            .session()
            .query(
                query,
                (
                    record.current_node_id,
                    record.active_branch_id,
                    record.path_version,
                    game_state,
                    record.session_id,
                ),
            )
            .await?;

        Ok(())
    }

    pub async fn update_status(&self, record: &SessionRecord) -> Result<(), DbError> {
        let query = Query::new(crate::db::queries::UPDATE_SESSION_STATUS);

        self.client
            .session()
            .query(
                query,
                (
                    record.status.as_str().to_string(),
                    record.ended_at,
                    record.session_id,
                ),
            )
            .await?;

        Ok(())
    }
}
