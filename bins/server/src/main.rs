//! Brilink API Server
//!
//! Main entry point for the agent-banking back office.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use brilink_api::{AppState, Settings, create_router};
use brilink_core::reports::parse_timezone;
use brilink_db::{TokenBlacklistRepository, connect};
use brilink_shared::{AppConfig, JwtService, config::LogConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.log);

    let timezone = parse_timezone(&config.reporting.timezone)
        .with_context(|| format!("invalid reporting timezone {}", config.reporting.timezone))?;

    let db = connect(&config.database).await?;
    info!("Connected to database");

    spawn_token_sweep(
        TokenBlacklistRepository::new(db.clone()),
        Duration::from_secs(config.maintenance.token_sweep_interval_secs.max(60)),
    );

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(JwtService::new(config.jwt.clone())),
        settings: Arc::new(Settings {
            multi_agent_enabled: config.features.multi_agent_enabled,
            timezone,
        }),
    };
    info!(
        multi_agent = config.features.multi_agent_enabled,
        timezone = %timezone,
        "Settings applied"
    );

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "brilink=debug,brilink_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    if log.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Periodically drops revoked tokens whose natural expiry has passed.
fn spawn_token_sweep(repo: TokenBlacklistRepository, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            match repo.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "Expired revoked tokens removed"),
                Err(e) => warn!(error = %e, "Token blacklist sweep failed"),
            }
        }
    });
}
