use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::adapters::{
    controllers::{document_controller::DocumentController, health_controller::HealthController},
    state::AppState,
};

/// Headroom above the PDF limit for multipart boundaries and part headers,
/// so oversize files still reach the admission check.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

pub fn build_router(app_state: AppState) -> Router {
    let body_limit = usize::try_from(
        app_state
            .settings
            .max_pdf_size_bytes
            .saturating_add(MULTIPART_OVERHEAD_BYTES),
    )
    .unwrap_or(usize::MAX);

    let cors = cors_layer(app_state.settings.cors_allowed_origins.as_deref());

    Router::new()
        .route("/health", get(HealthController::health_check))
        .route("/pdf", post(DocumentController::upload_pdf))
        .route("/pdf/{interview_id}", get(DocumentController::get_document))
        .route(
            "/pdf/{interview_id}/signed",
            get(DocumentController::get_signed_url),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(app_state)
}

fn cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    match allowed_origins {
        Some(origins) if origins.iter().any(|o| o == "*") => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        // Allow all origins if not specified (only for development)
        None => CorsLayer::permissive(),
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        adapters::{
            controllers::health_controller::HealthResponse,
            dto::document_dto::{DocumentResponse, SignedLinkResponse, UploadResponse},
            repositories::MemoryDocumentRepository,
        },
        application::services::fakes::SlowStorage,
        domain::{config::settings::Settings, models::document::digest},
        services::MemoryStorageService,
    };

    const MAX: usize = 1024;
    const BOUNDARY: &str = "custody-test-boundary";

    fn test_app() -> Router {
        let settings = Settings::from_lookup(|name| match name {
            "STORAGE_PROVIDER" => Some("memory".to_string()),
            "MAX_PDF_SIZE_BYTES" => Some(MAX.to_string()),
            "SIGNED_URL_TTL_SECONDS" => Some("300".to_string()),
            _ => None,
        })
        .unwrap();

        build_router(AppState::new(
            settings,
            Arc::new(MemoryStorageService::new()),
            Arc::new(MemoryDocumentRepository::new()),
        ))
    }

    fn multipart_body(field: &str, content_type: &str, content: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"doc.pdf\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(query: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/pdf?{query}"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn upload_then_sign_round_trip() {
        let app = test_app();
        let pdf = b"%PDF-1.7 test document";

        let resp = app
            .clone()
            .oneshot(upload_request(
                "interview_id=i1&coder_id=c1",
                multipart_body("file", "application/pdf", pdf),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let stored: UploadResponse = body_json(resp).await;
        assert_eq!(stored.status, "stored");
        assert_eq!(stored.interview_id, "i1");
        assert_eq!(stored.coder_id, "c1");
        assert_eq!(stored.storage_key, "c1/i1.pdf");
        assert_eq!(stored.size_bytes, pdf.len() as u64);
        assert_eq!(stored.content_hash, digest(pdf));

        let resp = app
            .clone()
            .oneshot(get_request("/pdf/i1/signed"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let link: SignedLinkResponse = body_json(resp).await;
        assert_eq!(link.expires_in, 300);
        assert!(link.url.contains("c1/i1.pdf"));

        let resp = app.oneshot(get_request("/pdf/i1?coder_id=c1")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let document: DocumentResponse = body_json(resp).await;
        assert_eq!(document.content_hash, digest(pdf));
        assert_eq!(document.content_type, "application/pdf");
    }

    #[tokio::test]
    async fn second_upload_is_409() {
        let app = test_app();
        let query = "interview_id=i1&coder_id=c1";

        let resp = app
            .clone()
            .oneshot(upload_request(
                query,
                multipart_body("file", "application/pdf", b"%PDF first"),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = app
            .oneshot(upload_request(
                query,
                multipart_body("file", "application/pdf", b"%PDF second"),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn invalid_uploads_are_400() {
        let app = test_app();
        let query = "interview_id=i1&coder_id=c1";

        let cases = [
            multipart_body("file", "image/png", b"\x89PNG"),
            multipart_body("file", "application/pdf", b""),
            multipart_body("file", "application/pdf", &vec![b'%'; MAX + 1]),
            multipart_body("attachment", "application/pdf", b"%PDF"),
        ];
        for body in cases {
            let resp = app.clone().oneshot(upload_request(query, body)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }

        // Nothing was stored by the rejected attempts.
        let resp = app.oneshot(get_request("/pdf/i1/signed")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn exactly_max_size_is_accepted() {
        let resp = test_app()
            .oneshot(upload_request(
                "interview_id=i1&coder_id=c1",
                multipart_body("file", "application/pdf", &vec![b'%'; MAX]),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn upload_exceeding_request_timeout_is_500_without_metadata() {
        let settings = Settings::from_lookup(|name| match name {
            "STORAGE_PROVIDER" => Some("memory".to_string()),
            "REQUEST_TIMEOUT_SECONDS" => Some("1".to_string()),
            _ => None,
        })
        .unwrap();
        let documents = Arc::new(MemoryDocumentRepository::new());
        let app = build_router(AppState::new(
            settings,
            Arc::new(SlowStorage {
                delay: Duration::from_secs(3),
            }),
            documents.clone(),
        ));

        let resp = app
            .oneshot(upload_request(
                "interview_id=i1&coder_id=c1",
                multipart_body("file", "application/pdf", b"%PDF slow"),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(documents.len().await, 0);
    }

    #[tokio::test]
    async fn traversal_identifier_is_400() {
        let resp = test_app()
            .oneshot(upload_request(
                "interview_id=i1&coder_id=..%2Fx",
                multipart_body("file", "application/pdf", b"%PDF"),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_interview_is_404() {
        let app = test_app();
        let resp = app
            .clone()
            .oneshot(get_request("/pdf/unknown/signed"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = app.oneshot(get_request("/pdf/unknown")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reports_provider_and_limits() {
        let resp = test_app().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let health: HealthResponse = body_json(resp).await;
        assert_eq!(health.status, "healthy");
        assert_eq!(health.provider, "memory");
        assert_eq!(health.config.max_pdf_size_bytes, MAX as u64);
        assert_eq!(health.config.signed_url_ttl_seconds, 300);
    }
}
