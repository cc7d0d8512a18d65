use std::sync::Arc;

use pdf_custody::{
    adapters::{
        repositories::{MemoryDocumentRepository, PgDocumentRepository},
        router::build_router,
        state::AppState,
    },
    application::repositories::document_repository::DocumentRepository,
    domain::config::{local::Provider, settings::Settings},
    services,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Initialize AWS SDK crypto provider (required for aws-sdk-s3)
    // This must be called before any AWS SDK operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let settings = Settings::from_env().unwrap_or_else(|e| panic!("ERROR: {}", e));

    tracing::info!(
        "Starting pdf-custody with SERVER_ID: {}, provider: {}",
        settings.server_id,
        settings.provider
    );

    let document_repository: Arc<dyn DocumentRepository> = match settings.provider {
        Provider::Memory => {
            tracing::warn!("Memory provider selected: documents will not survive a restart");
            Arc::new(MemoryDocumentRepository::new())
        }
        Provider::Supabase | Provider::S3 => {
            let database_url = settings
                .database_url
                .as_deref()
                .expect("ERROR: DATABASE_URL environment variable must be set");

            tracing::info!("Connecting to database...");
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.db_max_connections)
                .acquire_timeout(std::time::Duration::from_secs(30))
                .connect(database_url)
                .await
                .expect("ERROR: Failed to connect to PostgreSQL database. Check DATABASE_URL and network connectivity.");
            tracing::info!("Database connection established");

            let repository = PgDocumentRepository::new(pool);
            repository
                .migrate()
                .await
                .expect("Failed to apply database migrations");
            Arc::new(repository)
        }
    };

    let storage_service = services::create_storage_service(&settings.provider, &settings.secrets)
        .expect("Failed to create storage service");

    let port = settings.port;
    let app_state = AppState::new(settings, storage_service, document_repository);
    let router = build_router(app_state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("Server listening on 0.0.0.0:{}", port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");

    tracing::info!("Server stopped");
}

/// Resolves on Ctrl+C or SIGTERM; in-flight requests are drained afterwards.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining in-flight requests");
}
