mod error;
mod memory_storage;
mod s3_storage;
mod supabase_storage;

pub use error::StorageError;
pub use memory_storage::MemoryStorageService;
pub use s3_storage::S3StorageService;
pub use supabase_storage::SupabaseStorageService;

use std::sync::Arc;

use crate::{
    application::services::StorageService,
    domain::config::{local::Provider, secrets::Secrets},
};

pub fn create_storage_service(
    provider: &Provider,
    secrets: &Secrets,
) -> Result<Arc<dyn StorageService>, StorageError> {
    match provider {
        Provider::Supabase => {
            let supabase_secrets = secrets.supabase_secrets.as_ref().ok_or_else(|| {
                StorageError::InvalidCredentials("Supabase secrets not found".to_string())
            })?;

            Ok(Arc::new(SupabaseStorageService::new(supabase_secrets.clone())))
        }
        Provider::S3 => {
            let s3_secrets = secrets.s3_secrets.as_ref().ok_or_else(|| {
                StorageError::InvalidCredentials("S3 secrets not found".to_string())
            })?;

            Ok(Arc::new(S3StorageService::new(s3_secrets.clone())))
        }
        Provider::Memory => Ok(Arc::new(MemoryStorageService::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_secrets_are_reported() {
        let err = create_storage_service(&Provider::Supabase, &Secrets::default())
            .err()
            .unwrap();
        assert!(matches!(err, StorageError::InvalidCredentials(_)));

        let err = create_storage_service(&Provider::S3, &Secrets::default())
            .err()
            .unwrap();
        assert!(matches!(err, StorageError::InvalidCredentials(_)));
    }

    #[test]
    fn memory_provider_needs_nothing() {
        let service = create_storage_service(&Provider::Memory, &Secrets::default()).unwrap();
        assert_eq!(service.provider(), "memory");
    }
}
