//! Failing collaborators for exercising the error paths.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    application::{
        error::ApplicationError, repositories::document_repository::DocumentRepository,
        services::StorageService,
    },
    domain::models::{document::DocumentRecord, file::PutOutcome},
    services::StorageError,
};

pub struct UnavailableStorage;

#[async_trait]
impl StorageService for UnavailableStorage {
    async fn put_if_absent(
        &self,
        _key: &str,
        _content: Bytes,
        _content_type: &str,
    ) -> Result<PutOutcome, StorageError> {
        Err(StorageError::NetworkError("connection refused".to_string()))
    }

    async fn sign_url(&self, _key: &str, _ttl_seconds: u64) -> Result<String, StorageError> {
        Err(StorageError::NetworkError("connection refused".to_string()))
    }

    fn provider(&self) -> &'static str {
        "unavailable"
    }
}

/// Blob store whose writes hang for `delay` before succeeding.
pub struct SlowStorage {
    pub delay: Duration,
}

#[async_trait]
impl StorageService for SlowStorage {
    async fn put_if_absent(
        &self,
        _key: &str,
        _content: Bytes,
        _content_type: &str,
    ) -> Result<PutOutcome, StorageError> {
        tokio::time::sleep(self.delay).await;
        Ok(PutOutcome::Created)
    }

    async fn sign_url(&self, key: &str, _ttl_seconds: u64) -> Result<String, StorageError> {
        Err(StorageError::NotFound(key.to_string()))
    }

    fn provider(&self) -> &'static str {
        "slow"
    }
}

pub struct BrokenRepository;

#[async_trait]
impl DocumentRepository for BrokenRepository {
    async fn insert(&self, _record: DocumentRecord) -> Result<DocumentRecord, ApplicationError> {
        Err(ApplicationError::DatabaseError("connection reset".to_string()))
    }

    async fn find_by_interview(
        &self,
        _interview_id: &str,
        _coder_id: Option<&str>,
    ) -> Result<Option<DocumentRecord>, ApplicationError> {
        Err(ApplicationError::DatabaseError("connection reset".to_string()))
    }
}
