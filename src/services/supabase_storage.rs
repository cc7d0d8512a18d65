use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    application::services::StorageService,
    domain::{config::secrets::SupabaseSecrets, models::file::PutOutcome},
    services::error::StorageError,
};

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

/// Supabase Storage over its REST API.
///
/// Uploads are sent with `x-upsert: false`, which makes the server reject a
/// write to an occupied path atomically.
pub struct SupabaseStorageService {
    client: Client,
    storage_url: String,
    api_key: String,
    bucket_name: String,
}

impl SupabaseStorageService {
    pub fn new(secrets: SupabaseSecrets) -> Self {
        Self {
            client: Client::new(),
            storage_url: secrets.storage_url.trim_end_matches('/').to_string(),
            api_key: secrets.api_key,
            bucket_name: secrets.bucket_name,
        }
    }

    /// `{storage_url}/{route...}/{bucket}/{key...}` with every segment percent-encoded.
    fn object_url(&self, route: &[&str], key: &str) -> Result<Url, StorageError> {
        let mut url = Url::parse(&self.storage_url)
            .map_err(|e| StorageError::InvalidCredentials(format!("storage url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| StorageError::InvalidCredentials("storage url cannot be a base".into()))?
            .pop_if_empty()
            .extend(route)
            .push(&self.bucket_name)
            .extend(key.split('/'));
        Ok(url)
    }

    fn absolute_signed_url(&self, signed: &str) -> String {
        if signed.starts_with("http://") || signed.starts_with("https://") {
            signed.to_string()
        } else {
            format!("{}/{}", self.storage_url, signed.trim_start_matches('/'))
        }
    }
}

/// Supabase reports an occupied path either as HTTP 409 or, on older
/// deployments, as HTTP 400 with `{"statusCode": "409", "error": "Duplicate"}`.
fn is_duplicate(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::CONFLICT {
        return true;
    }
    if !status.is_client_error() {
        return false;
    }
    let Ok(payload) = serde_json::from_str::<Value>(body) else {
        return false;
    };
    let code_is_conflict = match payload.get("statusCode") {
        Some(Value::String(code)) => code == "409",
        Some(Value::Number(code)) => code.as_u64() == Some(409),
        _ => false,
    };
    code_is_conflict || payload.get("error").and_then(Value::as_str) == Some("Duplicate")
}

#[async_trait]
impl StorageService for SupabaseStorageService {
    async fn put_if_absent(
        &self,
        key: &str,
        content: Bytes,
        content_type: &str,
    ) -> Result<PutOutcome, StorageError> {
        let url = self.object_url(&["object"], key)?;

        let response = self
            .client
            .post(url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("apikey", &self.api_key)
            .header("x-upsert", "false")
            .header(header::CONTENT_TYPE, content_type)
            .body(content)
            .send()
            .await
            .map_err(StorageError::from)?;

        let status = response.status();
        if status.is_success() {
            return Ok(PutOutcome::Created);
        }

        let error_text = response.text().await.unwrap_or_default();
        if is_duplicate(status, &error_text) {
            debug!("Supabase reports {} as already present", key);
            return Ok(PutOutcome::Conflict);
        }

        match status.as_u16() {
            401 | 403 => Err(StorageError::Unauthorized(format!(
                "Upload rejected with status: {}",
                status
            ))),
            _ => Err(StorageError::ProviderError(format!(
                "Upload failed with status {}: {}",
                status, error_text
            ))),
        }
    }

    async fn sign_url(&self, key: &str, ttl_seconds: u64) -> Result<String, StorageError> {
        let url = self.object_url(&["object", "sign"], key)?;

        let response = self
            .client
            .post(url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("apikey", &self.api_key)
            .json(&json!({ "expiresIn": ttl_seconds }))
            .send()
            .await
            .map_err(StorageError::from)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(key.to_string()));
        }

        if !response.status().is_success() {
            return Err(StorageError::ProviderError(format!(
                "Sign URL failed with status: {}",
                response.status()
            )));
        }

        let signed: SignResponse = response
            .json()
            .await
            .map_err(|e| StorageError::ProviderError(e.to_string()))?;

        Ok(self.absolute_signed_url(&signed.signed_url))
    }

    fn provider(&self) -> &'static str {
        "supabase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> SupabaseStorageService {
        SupabaseStorageService::new(SupabaseSecrets {
            storage_url: "https://project.supabase.co/storage/v1/".to_string(),
            api_key: "service-key".to_string(),
            bucket_name: "pdfs".to_string(),
        })
    }

    #[test]
    fn object_urls_address_bucket_and_key() {
        let s = service();
        assert_eq!(
            s.object_url(&["object"], "c1/i1.pdf").unwrap().as_str(),
            "https://project.supabase.co/storage/v1/object/pdfs/c1/i1.pdf"
        );
        assert_eq!(
            s.object_url(&["object", "sign"], "c1/i1.pdf").unwrap().as_str(),
            "https://project.supabase.co/storage/v1/object/sign/pdfs/c1/i1.pdf"
        );
    }

    #[test]
    fn object_url_segments_are_encoded() {
        let s = service();
        assert_eq!(
            s.object_url(&["object"], "coder 1/i?1.pdf").unwrap().as_str(),
            "https://project.supabase.co/storage/v1/object/pdfs/coder%201/i%3F1.pdf"
        );
    }

    #[test]
    fn relative_signed_urls_are_made_absolute() {
        let s = service();
        assert_eq!(
            s.absolute_signed_url("/object/sign/pdfs/c/i.pdf?token=t"),
            "https://project.supabase.co/storage/v1/object/sign/pdfs/c/i.pdf?token=t"
        );
        assert_eq!(
            s.absolute_signed_url("https://cdn.test/x?token=t"),
            "https://cdn.test/x?token=t"
        );
    }

    #[test]
    fn duplicate_detection_uses_status_and_structured_body() {
        assert!(is_duplicate(StatusCode::CONFLICT, ""));
        assert!(is_duplicate(
            StatusCode::BAD_REQUEST,
            r#"{"statusCode":"409","error":"Duplicate","message":"The resource already exists"}"#
        ));
        assert!(is_duplicate(StatusCode::BAD_REQUEST, r#"{"statusCode":409}"#));
        assert!(!is_duplicate(
            StatusCode::BAD_REQUEST,
            r#"{"statusCode":"400","error":"Invalid","message":"409 in text is not a conflict"}"#
        ));
        assert!(!is_duplicate(StatusCode::BAD_REQUEST, "409"));
        assert!(!is_duplicate(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"statusCode":"409"}"#
        ));
    }
}
