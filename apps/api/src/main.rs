//! HSG intake API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::time::Duration;

use hsg_application::RateLimitService;
use hsg_core::AppError;
use hsg_infrastructure::GC_INTERVAL_SECONDS;
use tracing::{debug, info, warn};

use crate::api_config::{ApiConfig, PersistenceBackend, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let pool = match (&config.database_url, config.persistence_backend) {
        (Some(database_url), PersistenceBackend::Postgres) => {
            Some(api_services::connect_and_migrate(database_url).await?)
        }
        (Some(database_url), PersistenceBackend::Memory) if config.migrate_only => {
            Some(api_services::connect_and_migrate(database_url).await?)
        }
        _ => None,
    };

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let app_state = api_services::build_app_state(&config, pool)?;
    spawn_rate_limit_sweeper(app_state.rate_limit_service.clone());

    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(
        %address,
        backend = config.persistence_backend.as_str(),
        "hsg-api listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn spawn_rate_limit_sweeper(rate_limit_service: RateLimitService) {
    let period = Duration::from_secs(GC_INTERVAL_SECONDS.unsigned_abs());

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;

        loop {
            interval.tick().await;
            match rate_limit_service.cleanup().await {
                Ok(removed) if removed > 0 => debug!(removed, "rate limit sweep finished"),
                Ok(_) => {}
                Err(error) => warn!(error = %error, "rate limit sweep failed"),
            }
        }
    });
}
