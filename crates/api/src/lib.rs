//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api`
//! - Authentication middleware and the `AuthUser` extractor
//! - JSON extractors that answer in the response envelope
//! - Money-as-number response views

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod views;

use axum::Router;
use brilink_shared::JwtService;
use chrono_tz::Tz;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Runtime settings that handlers consult.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Allows owners to create and delete additional agents.
    pub multi_agent_enabled: bool,
    /// Zone in which "today" and report dates are evaluated.
    pub timezone: Tz,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            multi_agent_enabled: false,
            timezone: chrono_tz::Asia::Jakarta,
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Runtime settings.
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Returns a handle to the connection pool for a repository.
    #[must_use]
    pub fn db(&self) -> DatabaseConnection {
        (*self.db).clone()
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
