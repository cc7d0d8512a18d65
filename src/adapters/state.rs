use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    application::{
        repositories::document_repository::DocumentRepository,
        services::{AdmissionValidator, LinkService, StorageService, UploadService},
    },
    domain::config::settings::Settings,
};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub server_id: String,
    pub provider: &'static str,
    pub settings: Arc<Settings>,
    pub upload_service: UploadService,
    pub link_service: LinkService,
}

impl AppState {
    pub fn new(
        settings: Settings,
        storage_service: Arc<dyn StorageService>,
        document_repository: Arc<dyn DocumentRepository>,
    ) -> Self {
        let validator = AdmissionValidator::new(settings.max_pdf_size_bytes);

        Self {
            server_id: settings.server_id.clone(),
            provider: storage_service.provider(),
            upload_service: UploadService::new(
                validator,
                storage_service.clone(),
                document_repository.clone(),
            ),
            link_service: LinkService::new(storage_service, document_repository),
            settings: Arc::new(settings),
        }
    }
}
