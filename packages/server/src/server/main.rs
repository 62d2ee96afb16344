// Main entry point for the notification dispatcher

use std::sync::Arc;

use anyhow::{Context, Result};
use fcm::{Credentials, FcmOptions, FcmService};
use spark_core::kernel::scheduled_tasks::start_scheduler;
use spark_core::kernel::{
    FcmAdapter, PostgresAccountService, PostgresDocumentStore, ServerDeps, SmtpMailer,
};
use spark_core::{server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn build_fcm(config: &Config) -> Result<FcmService> {
    if let Some(token) = &config.fcm_access_token {
        let project_id = config
            .fcm_project_id
            .clone()
            .context("FCM_PROJECT_ID must be set when using FCM_ACCESS_TOKEN")?;
        return Ok(FcmService::new(FcmOptions {
            project_id,
            credentials: Credentials::AccessToken(token.clone()),
        }));
    }

    let path = config
        .google_application_credentials
        .as_deref()
        .context("GOOGLE_APPLICATION_CREDENTIALS must be set")?;
    FcmService::from_service_account_file(path, config.fcm_project_id.clone())
        .context("Failed to load FCM service account")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,spark_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Spark notification dispatcher");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let fcm = build_fcm(&config)?;
    tracing::info!(project_id = %fcm.project_id(), "FCM configured");

    let deps = ServerDeps::new(
        Arc::new(PostgresDocumentStore::new(pool.clone())),
        Arc::new(FcmAdapter::new(Arc::new(fcm), config.fcm_channel_id.clone())),
        Arc::new(SmtpMailer::from_config(&config)?),
        Arc::new(PostgresAccountService::new(pool)),
    );

    // Keep the scheduler alive for the life of the process
    let _scheduler = if config.scheduler_enabled {
        Some(
            start_scheduler(deps.clone())
                .await
                .context("Failed to start scheduler")?,
        )
    } else {
        tracing::info!("Scheduler disabled");
        None
    };

    let app = build_app(deps);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
