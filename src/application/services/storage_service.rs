use async_trait::async_trait;
use bytes::Bytes;

use crate::{domain::models::file::PutOutcome, services::StorageError};

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Atomically creates `key` only if nothing is stored there yet.
    ///
    /// An occupied key yields `Ok(PutOutcome::Conflict)`; the existing object
    /// is left untouched. Implementations must not emulate this with a
    /// separate existence check.
    async fn put_if_absent(
        &self,
        key: &str,
        content: Bytes,
        content_type: &str,
    ) -> Result<PutOutcome, StorageError>;

    /// Returns a read-only URL for `key` valid for `ttl_seconds`.
    async fn sign_url(&self, key: &str, ttl_seconds: u64) -> Result<String, StorageError>;

    fn provider(&self) -> &'static str;
}
