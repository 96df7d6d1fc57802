use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::domain::{BranchIndex, GameSession};
use crate::services::BranchService;

pub async fn get_branches(
    State(service): State<Arc<BranchService>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<BranchIndex>, ApiError> {
    let index = service.get_branch_index(session_id).await?;

    Ok(Json(index))
}

pub async fn go_back(
    State(service): State<Arc<BranchService>>,
    Path((session_id, node_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<GameSession>, ApiError> {
    let session = service.go_back(session_id, node_id).await?;

    Ok(Json(session))
}

pub async fn restore_branch(
    State(service): State<Arc<BranchService>>,
    Path((session_id, branch_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<GameSession>, ApiError> {
    let session = service.restore_branch(session_id, branch_id).await?;

    Ok(Json(session))
}
