use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::db::DbError;

#[derive(Debug)]
pub enum ApiError {
    Database(DbError),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            DbError::InvalidData(msg) => ApiError::BadRequest(msg),
            DbError::Conflict(msg) => ApiError::Conflict(msg),
            DbError::Corrupt(msg) => ApiError::Internal(msg),
            _ => ApiError::Database(err),
        }
    }
}

impl ApiError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            ApiError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", err),
                )
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_errors_map_to_status() {
        let cases = [
            (DbError::NotFound, StatusCode::NOT_FOUND),
            (
                DbError::InvalidData("bad choice".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                DbError::Conflict("ended".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                DbError::Corrupt("node row has no kind".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DbError::SerializationError("oops".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_corrupt_rows_are_internal_errors() {
        let err = ApiError::from(DbError::Corrupt("missing node".to_string()));
        assert!(matches!(err, ApiError::Internal(ref msg) if msg == "missing node"));
    }
}
