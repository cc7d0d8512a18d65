use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} must not start with '/'")]
    LeadingSlash(&'static str),

    #[error("{0} must not contain '..'")]
    Traversal(&'static str),

    #[error("{0} contains a forbidden character")]
    ForbiddenCharacter(&'static str),
}

/// The logical slot a document occupies: one PDF per (coder, interview).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSlot {
    coder_id: String,
    interview_id: String,
}

impl DocumentSlot {
    pub fn new(coder_id: &str, interview_id: &str) -> Result<Self, IdentifierError> {
        check_identifier("coder_id", coder_id)?;
        check_identifier("interview_id", interview_id)?;

        Ok(Self {
            coder_id: coder_id.to_string(),
            interview_id: interview_id.to_string(),
        })
    }

    pub fn coder_id(&self) -> &str {
        &self.coder_id
    }

    pub fn interview_id(&self) -> &str {
        &self.interview_id
    }

    pub fn storage_key(&self) -> String {
        format!("{}/{}.pdf", self.coder_id, self.interview_id)
    }
}

/// Derives the write-once storage key `{coder_id}/{interview_id}.pdf`.
///
/// The key is a pure function of both identifiers. Identifiers that could
/// escape the bucket prefix or collide with another slot's key are rejected.
pub fn derive_storage_key(coder_id: &str, interview_id: &str) -> Result<String, IdentifierError> {
    DocumentSlot::new(coder_id, interview_id).map(|slot| slot.storage_key())
}

/// Lowercase hex SHA-256 of the exact bytes. Used for integrity, never as a key.
pub fn digest(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

fn check_identifier(field: &'static str, value: &str) -> Result<(), IdentifierError> {
    if value.is_empty() {
        return Err(IdentifierError::Empty(field));
    }
    if value.starts_with('/') {
        return Err(IdentifierError::LeadingSlash(field));
    }
    if value.contains("..") {
        return Err(IdentifierError::Traversal(field));
    }
    // A '/' inside either id would let two different slots share one key.
    if value
        .chars()
        .any(|c| c == '/' || c == '\\' || c.is_ascii_control())
    {
        return Err(IdentifierError::ForbiddenCharacter(field));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub interview_id: String,
    pub coder_id: String,
    pub storage_key: String,
    pub content_hash: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

impl DocumentRecord {
    pub fn new(slot: &DocumentSlot, content_hash: String, size_bytes: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            interview_id: slot.interview_id().to_string(),
            coder_id: slot.coder_id().to_string(),
            storage_key: slot.storage_key(),
            content_hash,
            size_bytes,
            content_type: PDF_CONTENT_TYPE.to_string(),
            uploaded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReceipt {
    pub interview_id: String,
    pub coder_id: String,
    pub storage_key: String,
    pub content_hash: String,
    pub size_bytes: u64,
}

impl From<DocumentRecord> for StoredReceipt {
    fn from(record: DocumentRecord) -> Self {
        Self {
            interview_id: record.interview_id,
            coder_id: record.coder_id,
            storage_key: record.storage_key,
            content_hash: record.content_hash,
            size_bytes: record.size_bytes,
        }
    }
}

/// A read-only bearer link. Do not log `url`.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedLink {
    pub url: String,
    pub expires_in: u64,
}

impl std::fmt::Debug for SignedLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedLink")
            .field("url", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
