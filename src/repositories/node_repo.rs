use scylla::IntoTypedRows;
use scylla::query::Query;
use uuid::Uuid;

use crate::db::{DbClient, DbError, NodeRow};
use crate::domain::StoryNode;

#[derive(Clone)]
pub struct NodeRepository {
    client: DbClient,
}

impl NodeRepository {
    pub fn new(client: DbClient) -> Self {
        Self { client }
    }

    /// Insert (or overwrite) a story node
    pub async fn insert_node(&self, node: &StoryNode) -> Result<(), DbError> {
        let row = NodeRow::from_node(node).map_err(DbError::SerializationError)?;
        let query = Query::new(crate::db::queries::INSERT_NODE);

        self.client
            .session()
            .query(
                query,
                (
                    row.session_id,
                    row.node_id,
                    row.parent_node_id,
                    row.depth,
                    row.kind,
                    row.kind_data,
                    row.content,
                    row.location,
                    row.scene_description,
                    row.choices,
                    row.selected_choice_id,
                    row.selected_choice_text,
                    row.created_at,
                ),
            )
            .await?;

        Ok(())
    }

    pub async fn get_node(&self, session_id: Uuid, node_id: Uuid) -> Result<StoryNode, DbError> {
        let query = Query::new(crate::db::queries::SELECT_NODE);

        let result = self
            .client
            .session()
            .query(query, (session_id, node_id))
            .await?;

        let row = result
            .rows
            .ok_or(DbError::NotFound)?
            .into_typed::<NodeRow>()
            .next()
            .ok_or(DbError::NotFound)?
            .map_err(|e| DbError::Corrupt(format!("Failed to parse node row: {}", e)))?;

        row.to_node().map_err(DbError::Corrupt)
    }

    /// Every node ever generated in a session, ordered by depth then creation
    pub async fn get_nodes(&self, session_id: Uuid) -> Result<Vec<StoryNode>, DbError> {
        let query = Query::new(crate::db::queries::SELECT_NODES_BY_SESSION);

        let result = self.client.session().query(query, (session_id,)).await?;

        let rows = result.rows.unwrap_or_default();
        let mut nodes = Vec::new();

        for row in rows.into_typed::<NodeRow>() {
            let row =
                row.map_err(|e| DbError::Corrupt(format!("Failed to parse row: {}", e)))?;
            nodes.push(row.to_node().map_err(DbError::Corrupt)?);
        }

        nodes.sort_by(|a, b| a.depth.cmp(&b.depth).then(a.created_at.cmp(&b.created_at)));

        Ok(nodes)
    }

    pub async fn update_selection(&self, node: &StoryNode) -> Result<(), DbError> {
        let query = Query::new(crate::db::queries::UPDATE_NODE_SELECTION);

        self.client
            .session()
            .query(
                query,
                (
                    node.selected_choice_id,
                    node.selected_choice_text.clone(),
                    node.session_id,
                    node.id,
                ),
            )
            .await?;

        Ok(())
    }
}
