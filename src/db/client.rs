use scylla::{Session, SessionBuilder};
use std::sync::Arc;
use thiserror::Error;

use crate::config::ScyllaConfig;

use super::migration;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] scylla::transport::errors::NewSessionError),

    #[error("Query error: {0}")]
    QueryError(#[from] scylla::transport::errors::QueryError),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Not found")]
    NotFound,

    /// The request refers to something the story does not allow.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Stored rows that cannot be decoded or reference missing nodes.
    #[error("Corrupt data: {0}")]
    Corrupt(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Migration error: {0}")]
    MigrationError(String),
}

/// Shared handle to the story keyspace.
#[derive(Clone)]
pub struct DbClient {
    session: Arc<Session>,
}

impl DbClient {
    /// Connect, apply the bundled migrations, then select the keyspace.
    pub async fn new(config: &ScyllaConfig) -> Result<Self, DbError> {
        let mut builder = SessionBuilder::new().known_nodes(&config.nodes);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.user(username, password);
        }
        let session = builder.build().await?;
        tracing::debug!(nodes = ?config.nodes, "Connected to Scylla");

        migration::run_migrations(&session, config).await?;
        session.use_keyspace(&config.keyspace, false).await?;
        tracing::info!(keyspace = %config.keyspace, "Story keyspace ready");

        Ok(DbClient {
            session: Arc::new(session),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
