// Framework bootstrap for the patient service runtime.

use crate::domain::ports::PatientService;
use crate::frameworks::config::{self, LogFormat, Settings};
use crate::frameworks::db;
use crate::interface_adapters::repositories::{InMemoryPatientRepository, PostgresPatientRepository};
use crate::interface_adapters::routes;
use crate::interface_adapters::state::AppState;
use crate::use_cases::PatientUseCases;

use axum::http::HeaderValue;
use std::io::Result;
use std::net::SocketAddr;
use std::sync::Arc;

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match format {
        LogFormat::Json => subscriber.json().with_current_span(true).init(),
        LogFormat::Compact => subscriber.compact().init(),
    }

    // Panics are logged as error events with their location.
    std::panic::set_hook(Box::new(|info| {
        let location = info.location().map(ToString::to_string);
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?location, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener, settings: Settings) -> Result<()> {
    let address = listener.local_addr()?;

    let allowed_origin = HeaderValue::from_str(&settings.allowed_origin).map_err(|e| {
        std::io::Error::other(format!(
            "invalid CORS origin {:?}: {e}",
            settings.allowed_origin
        ))
    })?;
    let state = build_state(&settings).await?;
    let app = routes::app(state, allowed_origin);

    tracing::info!(%address, origin = %settings.allowed_origin, "listening");

    // Serve app and report errors rather than panicking.
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing(config::log_format());

    let address = SocketAddr::from(([0, 0, 0, 0], config::http_port()));

    // Bind TCP listener with error handling.
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, Settings::from_env()).await
}

async fn build_state(settings: &Settings) -> Result<Arc<AppState>> {
    let patients: Arc<dyn PatientService> = match &settings.database_url {
        Some(database_url) => {
            let db = db::connect_pool(database_url, settings.database_max_connections)
                .await
                .map_err(|e| std::io::Error::other(format!("failed to connect to database: {e}")))?;
            db::run_migrations(&db)
                .await
                .map_err(|e| std::io::Error::other(format!("failed to run migrations: {e}")))?;
            tracing::debug!(
                max_connections = settings.database_max_connections,
                "patient storage: postgres"
            );
            Arc::new(PatientUseCases::new(PostgresPatientRepository { db }))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; patients are kept in memory");
            Arc::new(PatientUseCases::new(InMemoryPatientRepository::new()))
        }
    };

    Ok(Arc::new(AppState { patients }))
}
