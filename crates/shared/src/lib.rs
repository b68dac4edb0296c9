//! Shared types, errors, and configuration for Brilink.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types and the response envelope
//! - JWT token service and claims
//! - Rupiah formatting and pagination helpers
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod response;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
pub use response::{ApiResponse, ErrorBody};
