use std::fmt;

#[derive(Clone)]
pub struct SupabaseSecrets {
    /// Base URL of the storage API, e.g. `https://<project>.supabase.co/storage/v1`.
    pub storage_url: String,
    pub api_key: String,
    pub bucket_name: String,
}

#[derive(Clone)]
pub struct S3Secrets {
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
}

#[derive(Clone, Default)]
pub struct Secrets {
    pub supabase_secrets: Option<SupabaseSecrets>,
    pub s3_secrets: Option<S3Secrets>,
}

// Credentials must never reach the logs, so Debug only reports presence.
impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("has_supabase_secrets", &self.supabase_secrets.is_some())
            .field("has_s3_secrets", &self.s3_secrets.is_some())
            .finish()
    }
}
