use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::services::{BranchService, ChoiceService, SessionService};

use super::handlers;

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
    pub choice_service: Arc<ChoiceService>,
    pub branch_service: Arc<BranchService>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Sessions
        .route(
            "/api/game/sessions",
            post(handlers::start_session).with_state(state.session_service.clone()),
        )
        .route(
            "/api/game/sessions/{id}",
            get(handlers::get_session).with_state(state.session_service.clone()),
        )
        .route(
            "/api/game/sessions/{id}/end",
            put(handlers::end_session).with_state(state.session_service.clone()),
        )
        .route(
            "/api/game/sessions/{id}/path-history",
            get(handlers::get_path_history).with_state(state.session_service.clone()),
        )
        // Choices
        .route(
            "/api/game/sessions/{id}/choices",
            get(handlers::get_choices).with_state(state.choice_service.clone()),
        )
        .route(
            "/api/game/sessions/{id}/choices/{choice_id}",
            post(handlers::make_choice).with_state(state.choice_service.clone()),
        )
        // Branches
        .route(
            "/api/game/sessions/{id}/branches",
            get(handlers::get_branches).with_state(state.branch_service.clone()),
        )
        .route(
            "/api/game/sessions/{id}/go-back/{node_id}",
            post(handlers::go_back).with_state(state.branch_service.clone()),
        )
        .route(
            "/api/game/sessions/{id}/branches/{branch_id}/restore",
            post(handlers::restore_branch).with_state(state.branch_service.clone()),
        )
}

async fn health_check() -> axum::Json<crate::api::dto::HealthResponse> {
    axum::Json(crate::api::dto::HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now(),
    })
}
