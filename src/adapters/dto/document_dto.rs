use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};

use crate::{
    application::dto::document_dto::DocumentDTO,
    domain::models::document::{DocumentRecord, SignedLink, StoredReceipt},
};

impl FromRow<'_, PgRow> for DocumentDTO {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let size_bytes: i64 = row.try_get("size_bytes")?;

        Ok(DocumentDTO {
            id: Some(row.try_get("id")?),
            interview_id: row.try_get("interview_id")?,
            coder_id: row.try_get("coder_id")?,
            storage_path: row.try_get("storage_path")?,
            sha256: row.try_get("sha256")?,
            size_bytes: Some(size_bytes.max(0) as u64),
            content_type: Some(row.try_get("content_type")?),
            uploaded_at: Some(row.try_get("uploaded_at")?),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub interview_id: String,
    pub coder_id: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct LookupQuery {
    pub coder_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub interview_id: String,
    pub coder_id: String,
    pub storage_key: String,
    pub content_hash: String,
    pub size_bytes: u64,
}

impl From<StoredReceipt> for UploadResponse {
    fn from(receipt: StoredReceipt) -> Self {
        Self {
            status: "stored".to_string(),
            interview_id: receipt.interview_id,
            coder_id: receipt.coder_id,
            storage_key: receipt.storage_key,
            content_hash: receipt.content_hash,
            size_bytes: receipt.size_bytes,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct SignedLinkResponse {
    pub url: String,
    pub expires_in: u64,
}

impl From<SignedLink> for SignedLinkResponse {
    fn from(link: SignedLink) -> Self {
        Self {
            url: link.url,
            expires_in: link.expires_in,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub interview_id: String,
    pub coder_id: String,
    pub storage_key: String,
    pub content_hash: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<DocumentRecord> for DocumentResponse {
    fn from(record: DocumentRecord) -> Self {
        Self {
            interview_id: record.interview_id,
            coder_id: record.coder_id,
            storage_key: record.storage_key,
            content_hash: record.content_hash,
            size_bytes: record.size_bytes,
            content_type: record.content_type,
            uploaded_at: record.uploaded_at,
        }
    }
}
