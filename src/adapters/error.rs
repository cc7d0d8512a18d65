use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::application::error::ApplicationError;

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApplicationError::InvalidIdentifier(ref msg) => {
                warn!("Invalid identifier: {}", msg);
                (StatusCode::BAD_REQUEST, "Invalid identifier".to_string())
            }
            ApplicationError::UnsupportedMediaType(ref declared) => {
                warn!("Rejected upload with content type '{}'", declared);
                (StatusCode::BAD_REQUEST, "Only PDF allowed".to_string())
            }
            ApplicationError::PayloadTooLarge => {
                warn!("PDF exceeds max size");
                (StatusCode::BAD_REQUEST, "PDF exceeds max size".to_string())
            }
            ApplicationError::EmptyPayload => {
                warn!("Empty PDF upload");
                (StatusCode::BAD_REQUEST, "PDF is empty".to_string())
            }
            ApplicationError::BadRequest(ref msg) => {
                warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "Bad request".to_string())
            }
            ApplicationError::AlreadyExists(ref key) => {
                warn!("Document already exists at {}", key);
                (StatusCode::CONFLICT, "PDF already exists".to_string())
            }
            ApplicationError::NotFound => {
                warn!("Document not found");
                (StatusCode::NOT_FOUND, "PDF not found".to_string())
            }
            ApplicationError::StorageUnavailable(ref msg) => {
                error!("Storage unavailable: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            // Already reported with full context where the insert failed.
            ApplicationError::MetadataInconsistency { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApplicationError::DatabaseError(ref msg) => {
                error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    fn status_of(err: ApplicationError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn client_input_errors_are_400() {
        assert_eq!(
            status_of(ApplicationError::InvalidIdentifier("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApplicationError::UnsupportedMediaType("image/png".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(ApplicationError::PayloadTooLarge), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ApplicationError::EmptyPayload), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflict_and_miss_have_distinct_statuses() {
        assert_eq!(
            status_of(ApplicationError::AlreadyExists("c/i.pdf".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(ApplicationError::NotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn backend_faults_are_500() {
        assert_eq!(
            status_of(ApplicationError::StorageUnavailable("down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ApplicationError::MetadataInconsistency {
                storage_key: "c/i.pdf".into(),
                cause: "db".into(),
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn backend_detail_is_not_leaked() {
        let response =
            ApplicationError::StorageUnavailable("secret-host:5432 refused".into()).into_response();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!body.contains("secret-host"));
        assert!(body.contains("Internal server error"));
    }
}
