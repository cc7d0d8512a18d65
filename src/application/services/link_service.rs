use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    application::{
        error::ApplicationError, repositories::document_repository::DocumentRepository,
        services::StorageService,
    },
    domain::models::document::{DocumentRecord, SignedLink},
};

/// Read path: resolves a stored document and hands out short-lived read links.
#[derive(Clone)]
pub struct LinkService {
    storage: Arc<dyn StorageService>,
    documents: Arc<dyn DocumentRepository>,
}

impl LinkService {
    pub fn new(storage: Arc<dyn StorageService>, documents: Arc<dyn DocumentRepository>) -> Self {
        Self { storage, documents }
    }

    pub async fn describe(
        &self,
        interview_id: &str,
        coder_id: Option<&str>,
    ) -> Result<DocumentRecord, ApplicationError> {
        let record = self
            .documents
            .find_by_interview(interview_id, coder_id)
            .await
            .map_err(|e| match e {
                ApplicationError::DatabaseError(msg) => {
                    error!("Metadata lookup failed for interview {}: {}", interview_id, msg);
                    ApplicationError::StorageUnavailable(msg)
                }
                other => other,
            })?;

        record.ok_or_else(|| {
            warn!("No stored document for interview {}", interview_id);
            ApplicationError::NotFound
        })
    }

    pub async fn issue_link(
        &self,
        interview_id: &str,
        coder_id: Option<&str>,
        ttl_seconds: u64,
    ) -> Result<SignedLink, ApplicationError> {
        let record = self.describe(interview_id, coder_id).await?;

        let url = self
            .storage
            .sign_url(&record.storage_key, ttl_seconds)
            .await
            .map_err(|e| {
                error!("Could not sign URL for {}: {}", record.storage_key, e);
                ApplicationError::StorageUnavailable(e.to_string())
            })?;

        info!(
            "Issued {}s read link for {}",
            ttl_seconds, record.storage_key
        );

        Ok(SignedLink {
            url,
            expires_in: ttl_seconds,
        })
    }
}
