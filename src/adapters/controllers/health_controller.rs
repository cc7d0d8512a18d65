use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sysinfo::System;
use tracing::debug;

use crate::adapters::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(rename = "serverId")]
    pub server_id: String,
    pub provider: String,
    pub config: HealthConfigInfo,
    pub metrics: SystemMetrics,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemMetrics {
    #[serde(rename = "cpuUsagePercent")]
    pub cpu_usage_percent: f32,
    #[serde(rename = "memoryUsedBytes")]
    pub memory_used_bytes: u64,
    #[serde(rename = "memoryTotalBytes")]
    pub memory_total_bytes: u64,
    #[serde(rename = "memoryUsagePercent")]
    pub memory_usage_percent: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthConfigInfo {
    #[serde(rename = "maxPdfSizeBytes")]
    pub max_pdf_size_bytes: u64,
    #[serde(rename = "signedUrlTtlSeconds")]
    pub signed_url_ttl_seconds: u64,
    #[serde(rename = "requestTimeoutSeconds")]
    pub request_timeout_seconds: u64,
}

pub struct HealthController;

impl HealthController {
    /// GET /health
    pub async fn health_check(State(app_state): State<AppState>) -> Json<HealthResponse> {
        debug!("Health check requested");

        let config_info = HealthConfigInfo {
            max_pdf_size_bytes: app_state.settings.max_pdf_size_bytes,
            signed_url_ttl_seconds: app_state.settings.signed_url_ttl_seconds,
            request_timeout_seconds: app_state.settings.request_timeout.as_secs(),
        };

        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();

        let memory_used = sys.used_memory();
        let memory_total = sys.total_memory();
        let memory_usage_percent = if memory_total > 0 {
            (memory_used as f32 / memory_total as f32) * 100.0
        } else {
            0.0
        };

        let metrics = SystemMetrics {
            cpu_usage_percent: sys.global_cpu_usage(),
            memory_used_bytes: memory_used,
            memory_total_bytes: memory_total,
            memory_usage_percent,
        };

        Json(HealthResponse {
            status: "healthy".to_string(),
            server_id: app_state.server_id.clone(),
            provider: app_state.provider.to_string(),
            config: config_info,
            metrics,
        })
    }
}
