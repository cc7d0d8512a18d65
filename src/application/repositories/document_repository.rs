use async_trait::async_trait;

use crate::{application::error::ApplicationError, domain::models::document::DocumentRecord};

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Inserts a new record. Fails if a record with the same storage key exists.
    async fn insert(&self, record: DocumentRecord) -> Result<DocumentRecord, ApplicationError>;

    /// Returns the oldest record for `interview_id`, narrowed to `coder_id` when given.
    async fn find_by_interview(
        &self,
        interview_id: &str,
        coder_id: Option<&str>,
    ) -> Result<Option<DocumentRecord>, ApplicationError>;
}
