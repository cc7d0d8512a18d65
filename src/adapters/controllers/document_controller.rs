use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info, warn};

use crate::{
    adapters::{
        dto::document_dto::{
            DocumentResponse, LookupQuery, SignedLinkResponse, UploadQuery, UploadResponse,
        },
        state::AppState,
    },
    application::error::ApplicationError,
    domain::models::file::FileData,
};

pub struct DocumentController;

impl DocumentController {
    /// POST /pdf?interview_id=..&coder_id=..
    /// Body: multipart with a single `file` part holding the PDF.
    pub async fn upload_pdf(
        State(app_state): State<AppState>,
        Query(query): Query<UploadQuery>,
        multipart: Multipart,
    ) -> Result<(StatusCode, Json<UploadResponse>), ApplicationError> {
        info!(
            "Upload requested for interview_id: {}, coder_id: {}",
            query.interview_id, query.coder_id
        );

        // Bounds payload read, blob write and metadata insert together.
        let timeout = app_state.settings.request_timeout;
        let receipt = tokio::time::timeout(timeout, async {
            let file = read_file_field(multipart).await?;
            app_state
                .upload_service
                .store(&query.coder_id, &query.interview_id, file)
                .await
        })
        .await
        .map_err(|_| {
            error!(
                "Upload for {}/{} timed out after {:?}; blob may exist without metadata",
                query.coder_id, query.interview_id, timeout
            );
            ApplicationError::StorageUnavailable("upload timed out".to_string())
        })??;

        Ok((StatusCode::CREATED, Json(UploadResponse::from(receipt))))
    }

    /// GET /pdf/{interview_id}/signed[?coder_id=..]
    pub async fn get_signed_url(
        State(app_state): State<AppState>,
        Path(interview_id): Path<String>,
        Query(lookup): Query<LookupQuery>,
    ) -> Result<Json<SignedLinkResponse>, ApplicationError> {
        let link = app_state
            .link_service
            .issue_link(
                &interview_id,
                lookup.coder_id.as_deref(),
                app_state.settings.signed_url_ttl_seconds,
            )
            .await?;

        Ok(Json(SignedLinkResponse::from(link)))
    }

    /// GET /pdf/{interview_id}[?coder_id=..]
    pub async fn get_document(
        State(app_state): State<AppState>,
        Path(interview_id): Path<String>,
        Query(lookup): Query<LookupQuery>,
    ) -> Result<Json<DocumentResponse>, ApplicationError> {
        let record = app_state
            .link_service
            .describe(&interview_id, lookup.coder_id.as_deref())
            .await?;

        Ok(Json(DocumentResponse::from(record)))
    }
}

async fn read_file_field(mut multipart: Multipart) -> Result<FileData, ApplicationError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let mime_type = field.content_type().unwrap_or_default().to_string();
        let content = field.bytes().await.map_err(multipart_error)?;

        return Ok(FileData::new(content, mime_type));
    }

    warn!("Missing required 'file' field in upload");
    Err(ApplicationError::BadRequest(
        "Missing required field".to_string(),
    ))
}

fn multipart_error(error: MultipartError) -> ApplicationError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApplicationError::PayloadTooLarge;
    }
    warn!("Invalid multipart data: {}", error.body_text());
    ApplicationError::BadRequest("Invalid request format".to_string())
}
