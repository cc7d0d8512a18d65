use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    application::{error::ApplicationError, repositories::document_repository::DocumentRepository},
    domain::models::document::DocumentRecord,
};

/// In-process metadata store used with the `memory` provider and in tests.
pub struct MemoryDocumentRepository {
    records: RwLock<Vec<DocumentRecord>>,
}

impl MemoryDocumentRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

impl Default for MemoryDocumentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentRepository for MemoryDocumentRepository {
    async fn insert(&self, record: DocumentRecord) -> Result<DocumentRecord, ApplicationError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.storage_key == record.storage_key) {
            return Err(ApplicationError::DatabaseError(format!(
                "duplicate storage_path '{}'",
                record.storage_key
            )));
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn find_by_interview(
        &self,
        interview_id: &str,
        coder_id: Option<&str>,
    ) -> Result<Option<DocumentRecord>, ApplicationError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.interview_id == interview_id)
            .filter(|r| coder_id.map_or(true, |c| r.coder_id == c))
            .min_by_key(|r| r.uploaded_at)
            .cloned())
    }
}
