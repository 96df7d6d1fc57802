use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{dto::StartSessionRequest, error::ApiError};
use crate::domain::{GameSession, PathHistory};
use crate::services::SessionService;

pub async fn start_session(
    State(service): State<Arc<SessionService>>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<GameSession>, ApiError> {
    if payload.character.name.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Character name must not be empty".to_string(),
        ));
    }

    let session = service
        .start_session(payload.character, payload.game_state.unwrap_or_default())
        .await?;

    Ok(Json(session))
}

pub async fn get_session(
    State(service): State<Arc<SessionService>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<GameSession>, ApiError> {
    let session = service.get_session(session_id).await?;

    Ok(Json(session))
}

pub async fn get_path_history(
    State(service): State<Arc<SessionService>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<PathHistory>, ApiError> {
    let history = service.get_path_history(session_id).await?;

    Ok(Json(history))
}

pub async fn end_session(
    State(service): State<Arc<SessionService>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<GameSession>, ApiError> {
    let session = service.end_session(session_id).await?;

    Ok(Json(session))
}
