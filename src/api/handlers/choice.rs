use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{dto::ChoiceOptionResponse, error::ApiError};
use crate::domain::GameSession;
use crate::services::ChoiceService;

pub async fn get_choices(
    State(service): State<Arc<ChoiceService>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<ChoiceOptionResponse>>, ApiError> {
    let choices = service.available_choices(session_id).await?;

    let responses = choices.into_iter().map(Into::into).collect();

    Ok(Json(responses))
}

pub async fn make_choice(
    State(service): State<Arc<ChoiceService>>,
    Path((session_id, choice_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<GameSession>, ApiError> {
    let session = service.make_choice(session_id, choice_id).await?;

    Ok(Json(session))
}
