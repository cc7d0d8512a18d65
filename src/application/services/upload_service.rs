use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    application::{
        error::ApplicationError, repositories::document_repository::DocumentRepository,
        services::{AdmissionValidator, StorageService},
    },
    domain::models::{
        document::{digest, DocumentRecord, DocumentSlot, StoredReceipt, PDF_CONTENT_TYPE},
        file::{FileData, PutOutcome},
    },
};

/// Write path: admission, key derivation, write-once blob put, metadata insert.
#[derive(Clone)]
pub struct UploadService {
    validator: AdmissionValidator,
    storage: Arc<dyn StorageService>,
    documents: Arc<dyn DocumentRepository>,
}

impl UploadService {
    pub fn new(
        validator: AdmissionValidator,
        storage: Arc<dyn StorageService>,
        documents: Arc<dyn DocumentRepository>,
    ) -> Self {
        Self {
            validator,
            storage,
            documents,
        }
    }

    pub fn max_size(&self) -> u64 {
        self.validator.max_size()
    }

    pub async fn store(
        &self,
        coder_id: &str,
        interview_id: &str,
        file: FileData,
    ) -> Result<StoredReceipt, ApplicationError> {
        self.validator.validate(&file.mime_type, file.size())?;

        let slot = DocumentSlot::new(coder_id, interview_id)?;
        let storage_key = slot.storage_key();
        let content_hash = digest(&file.content);
        let size_bytes = file.size();

        // No existence check here: the store's create-if-absent is the only arbiter.
        let outcome = self
            .storage
            .put_if_absent(&storage_key, file.content, PDF_CONTENT_TYPE)
            .await
            .map_err(|e| {
                error!("Blob write failed for {}: {}", storage_key, e);
                ApplicationError::StorageUnavailable(e.to_string())
            })?;

        if outcome == PutOutcome::Conflict {
            warn!("Rejected second upload for occupied slot {}", storage_key);
            return Err(ApplicationError::AlreadyExists(storage_key));
        }

        let record = DocumentRecord::new(&slot, content_hash, size_bytes);
        let record = self.documents.insert(record).await.map_err(|e| {
            error!(
                "Blob {} stored but metadata insert failed, needs reconciliation: {:?}",
                storage_key, e
            );
            ApplicationError::MetadataInconsistency {
                storage_key: storage_key.clone(),
                cause: format!("{:?}", e),
            }
        })?;

        info!(
            "Stored {} ({} bytes, sha256 {})",
            record.storage_key, record.size_bytes, record.content_hash
        );

        Ok(StoredReceipt::from(record))
    }
}
