use std::{str::FromStr, time::Duration};

use thiserror::Error;

use crate::domain::config::{
    local::Provider,
    secrets::{S3Secrets, Secrets, SupabaseSecrets},
};

pub const DEFAULT_MAX_PDF_SIZE_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_SIGNED_URL_TTL_SECONDS: u64 = 120;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
/// Longest lifetime S3 accepts for a presigned URL (7 days).
pub const MAX_SIGNED_URL_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;
const DEFAULT_BUCKET: &str = "pdfs";
const DEFAULT_S3_REGION: &str = "us-east-1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Process-wide settings, read once from the environment at startup.
#[derive(Clone)]
pub struct Settings {
    pub server_id: String,
    pub port: u16,
    pub provider: Provider,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub max_pdf_size_bytes: u64,
    pub signed_url_ttl_seconds: u64,
    pub request_timeout: Duration,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub secrets: Secrets,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let provider = match var("STORAGE_PROVIDER") {
            Some(raw) => Provider::from_str(&raw).map_err(|reason| ConfigError::Invalid {
                name: "STORAGE_PROVIDER",
                reason,
            })?,
            None => Provider::Supabase,
        };

        let bucket_name = var("STORAGE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string());

        let mut secrets = Secrets::default();
        match provider {
            Provider::Supabase => {
                let url = var("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?;
                let api_key = var("SUPABASE_SERVICE_ROLE_KEY")
                    .ok_or(ConfigError::Missing("SUPABASE_SERVICE_ROLE_KEY"))?;
                secrets.supabase_secrets = Some(SupabaseSecrets {
                    storage_url: format!("{}/storage/v1", url.trim_end_matches('/')),
                    api_key,
                    bucket_name,
                });
            }
            Provider::S3 => {
                secrets.s3_secrets = Some(S3Secrets {
                    endpoint: var("S3_ENDPOINT"),
                    region: var("S3_REGION").unwrap_or_else(|| DEFAULT_S3_REGION.to_string()),
                    access_key_id: var("S3_ACCESS_KEY_ID")
                        .ok_or(ConfigError::Missing("S3_ACCESS_KEY_ID"))?,
                    secret_access_key: var("S3_SECRET_ACCESS_KEY")
                        .ok_or(ConfigError::Missing("S3_SECRET_ACCESS_KEY"))?,
                    bucket_name,
                });
            }
            Provider::Memory => {}
        }

        let database_url = var("DATABASE_URL");
        if provider != Provider::Memory && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let request_timeout_seconds = positive(
            "REQUEST_TIMEOUT_SECONDS",
            var("REQUEST_TIMEOUT_SECONDS"),
            DEFAULT_REQUEST_TIMEOUT_SECONDS,
        )?;

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS").map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        let signed_url_ttl_seconds = positive(
            "SIGNED_URL_TTL_SECONDS",
            var("SIGNED_URL_TTL_SECONDS"),
            DEFAULT_SIGNED_URL_TTL_SECONDS,
        )?;
        if signed_url_ttl_seconds > MAX_SIGNED_URL_TTL_SECONDS {
            return Err(ConfigError::Invalid {
                name: "SIGNED_URL_TTL_SECONDS",
                reason: format!("must not exceed {} seconds", MAX_SIGNED_URL_TTL_SECONDS),
            });
        }

        Ok(Self {
            server_id: var("SERVER_ID").unwrap_or_else(|| "pdf-custody".to_string()),
            port: parse("PORT", var("PORT"), 8080)?,
            provider,
            database_url,
            db_max_connections: positive("DB_MAX_CONNECTIONS", var("DB_MAX_CONNECTIONS"), 5)?,
            max_pdf_size_bytes: positive(
                "MAX_PDF_SIZE_BYTES",
                var("MAX_PDF_SIZE_BYTES"),
                DEFAULT_MAX_PDF_SIZE_BYTES,
            )?,
            signed_url_ttl_seconds,
            request_timeout: Duration::from_secs(request_timeout_seconds),
            cors_allowed_origins,
            secrets,
        })
    }
}

fn parse<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn positive<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialEq + Default,
    T::Err: std::fmt::Display,
{
    let value = parse(name, raw, default)?;
    if value == T::default() {
        return Err(ConfigError::Invalid {
            name,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}
