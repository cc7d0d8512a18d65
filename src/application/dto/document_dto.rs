use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::document::{DocumentRecord, PDF_CONTENT_TYPE};

/// Row shape of `pdf_documents`. Column names differ from the domain record.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DocumentDTO {
    pub id: Option<Uuid>,
    pub interview_id: String,
    pub coder_id: String,
    pub storage_path: String,
    pub sha256: String,
    pub size_bytes: Option<u64>,
    pub content_type: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl From<DocumentRecord> for DocumentDTO {
    fn from(value: DocumentRecord) -> Self {
        DocumentDTO {
            id: Some(value.id),
            interview_id: value.interview_id,
            coder_id: value.coder_id,
            storage_path: value.storage_key,
            sha256: value.content_hash,
            size_bytes: Some(value.size_bytes),
            content_type: Some(value.content_type),
            uploaded_at: Some(value.uploaded_at),
        }
    }
}

impl From<DocumentDTO> for DocumentRecord {
    fn from(value: DocumentDTO) -> Self {
        DocumentRecord {
            id: value.id.unwrap_or_else(Uuid::new_v4),
            interview_id: value.interview_id,
            coder_id: value.coder_id,
            storage_key: value.storage_path,
            content_hash: value.sha256,
            size_bytes: value.size_bytes.unwrap_or(0),
            content_type: value
                .content_type
                .unwrap_or_else(|| PDF_CONTENT_TYPE.to_string()),
            uploaded_at: value.uploaded_at.unwrap_or_else(Utc::now),
        }
    }
}
