use std::collections::{hash_map::Entry, HashMap};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    application::services::StorageService, domain::models::file::PutOutcome,
    services::error::StorageError,
};

/// Process-local blob store for development and tests. Nothing survives a restart.
pub struct MemoryStorageService {
    objects: RwLock<HashMap<String, Bytes>>,
}

impl MemoryStorageService {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    #[cfg(test)]
    pub async fn content(&self, key: &str) -> Option<Bytes> {
        self.objects.read().await.get(key).cloned()
    }
}

impl Default for MemoryStorageService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageService for MemoryStorageService {
    async fn put_if_absent(
        &self,
        key: &str,
        content: Bytes,
        _content_type: &str,
    ) -> Result<PutOutcome, StorageError> {
        // The write lock makes check-and-insert a single atomic step.
        let mut objects = self.objects.write().await;
        match objects.entry(key.to_string()) {
            Entry::Occupied(_) => {
                debug!("Object already present in memory store: {}", key);
                Ok(PutOutcome::Conflict)
            }
            Entry::Vacant(slot) => {
                slot.insert(content);
                Ok(PutOutcome::Created)
            }
        }
    }

    async fn sign_url(&self, key: &str, ttl_seconds: u64) -> Result<String, StorageError> {
        if !self.objects.read().await.contains_key(key) {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let out_of_range =
            || StorageError::InternalError(format!("TTL {}s out of range", ttl_seconds));
        let ttl = i64::try_from(ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(out_of_range)?;
        let expires_at = Utc::now().checked_add_signed(ttl).ok_or_else(out_of_range)?;

        Ok(format!(
            "memory:///{}?expires={}",
            key,
            expires_at.timestamp()
        ))
    }

    fn provider(&self) -> &'static str {
        "memory"
    }
}
