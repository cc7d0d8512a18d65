use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::{
    config::{BehaviorVersion, Credentials, Region},
    error::{DisplayErrorContext, SdkError},
    presigning::PresigningConfig,
    primitives::ByteStream,
    Client,
};
use bytes::Bytes;
use tracing::debug;

use crate::{
    application::services::StorageService,
    domain::{config::secrets::S3Secrets, models::file::PutOutcome},
    services::error::StorageError,
};

/// S3-compatible object store (AWS, MinIO, Supabase's S3 gateway).
///
/// Write-once is enforced with a conditional `PutObject` carrying
/// `If-None-Match: *`.
pub struct S3StorageService {
    client: Client,
    bucket_name: String,
}

impl S3StorageService {
    pub fn new(secrets: S3Secrets) -> Self {
        let credentials = Credentials::new(
            secrets.access_key_id,
            secrets.secret_access_key,
            None,
            None,
            "pdf-custody",
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(secrets.region))
            .credentials_provider(credentials)
            .force_path_style(true);

        if let Some(endpoint) = secrets.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket_name: secrets.bucket_name,
        }
    }
}

/// 412 is the standard answer to a failed `If-None-Match`; 409 is returned
/// when a concurrent conditional write to the same key is still in flight.
fn is_conflict_status(status: u16) -> bool {
    status == 412 || status == 409
}

fn classify<E, R>(error: SdkError<E, R>) -> StorageError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match &error {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            StorageError::NetworkError(DisplayErrorContext(&error).to_string())
        }
        SdkError::ConstructionFailure(_) => {
            StorageError::InternalError(DisplayErrorContext(&error).to_string())
        }
        _ => StorageError::ProviderError(DisplayErrorContext(&error).to_string()),
    }
}

#[async_trait]
impl StorageService for S3StorageService {
    async fn put_if_absent(
        &self,
        key: &str,
        content: Bytes,
        content_type: &str,
    ) -> Result<PutOutcome, StorageError> {
        let result = self
            .client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type(content_type)
            .if_none_match("*")
            .body(ByteStream::from(content))
            .send()
            .await;

        match result {
            Ok(_) => Ok(PutOutcome::Created),
            Err(error) => {
                let status = error.raw_response().map(|r| r.status().as_u16());
                if status.is_some_and(is_conflict_status) {
                    debug!("S3 reports {} as already present", key);
                    return Ok(PutOutcome::Conflict);
                }
                Err(classify(error))
            }
        }
    }

    async fn sign_url(&self, key: &str, ttl_seconds: u64) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(Duration::from_secs(ttl_seconds))
            .map_err(|e| StorageError::InternalError(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(classify)?;

        Ok(request.uri().to_string())
    }

    fn provider(&self) -> &'static str {
        "s3"
    }
}
