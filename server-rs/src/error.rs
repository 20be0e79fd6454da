use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::db::StoreError;
use crate::models::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl AppError {
    /// Maps a persistence failure for `entity` ("Team", "Player") onto the HTTP taxonomy.
    pub fn from_store(err: StoreError, entity: &str) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound(format!("{entity} not found.")),
            StoreError::Backend(msg) => AppError::Backend(msg),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Backend(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            AppError::Validation(msg) | AppError::NotFound(msg) => msg,
            AppError::Backend(msg) => {
                tracing::warn!("Backend error: {msg}");
                msg
            }
        };

        let body = json!({ "detail": detail });
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_http_statuses() {
        let not_found = AppError::from_store(StoreError::NotFound, "Team");
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert!(matches!(not_found, AppError::NotFound(ref m) if m == "Team not found."));

        let backend = AppError::from_store(
            StoreError::Backend("duplicate key value violates unique constraint".into()),
            "Player",
        );
        assert_eq!(backend.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(backend, AppError::Backend(ref m) if m.contains("duplicate key")));
    }

    #[test]
    fn validation_errors_are_unprocessable() {
        let err = AppError::from(ValidationError::blank("name"));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "Validation failed: name: must not be blank");
    }

    #[tokio::test]
    async fn response_body_carries_detail() {
        use http_body_util::BodyExt;

        let response = AppError::Backend("connection refused".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "detail": "connection refused" }));
    }
}
