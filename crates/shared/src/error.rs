//! Application-wide error types.
//!
//! Every variant carries the machine-readable code that clients receive in
//! the `error` field of the response envelope.

use rust_decimal::Decimal;
use serde_json::{Value, json};
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Message shown to clients for any server-side failure.
pub const GENERIC_SERVER_MESSAGE: &str = "Terjadi kesalahan pada server";

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input.
    #[error("{message}")]
    Validation {
        /// Wire error code.
        code: &'static str,
        /// Human readable message.
        message: String,
    },

    /// Referenced resource does not exist.
    #[error("{message}")]
    NotFound {
        /// Wire error code.
        code: &'static str,
        /// Human readable message.
        message: String,
    },

    /// Duplicate unique key.
    #[error("{message}")]
    Conflict {
        /// Wire error code.
        code: &'static str,
        /// Human readable message.
        message: String,
    },

    /// Role or ownership check failed, or the operation is disabled.
    #[error("{message}")]
    Forbidden {
        /// Wire error code.
        code: &'static str,
        /// Human readable message.
        message: String,
    },

    /// A float does not cover the requested amount.
    #[error("{message}")]
    InsufficientBalance {
        /// Human readable message.
        message: String,
        /// Balance available at the time of the check.
        available: Decimal,
        /// Amount the operation needed.
        required: Decimal,
    },

    /// Missing, malformed, invalid, expired or revoked token.
    #[error("{message}")]
    Unauthorized {
        /// Wire error code.
        code: &'static str,
        /// Human readable message.
        message: String,
    },

    /// Database error. The detail is only ever logged.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error. The detail is only ever logged.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation error with a specific code.
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    /// Validation error with the generic `INVALID_INPUT` code.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::validation("INVALID_INPUT", message)
    }

    /// Not-found error with the generic `NOT_FOUND` code.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            code: "NOT_FOUND",
            message: message.into(),
        }
    }

    /// Conflict error with a specific code.
    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
        }
    }

    /// Forbidden error with the generic `FORBIDDEN` code.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::forbidden_with("FORBIDDEN", message)
    }

    /// Forbidden error with a specific code.
    pub fn forbidden_with(code: &'static str, message: impl Into<String>) -> Self {
        Self::Forbidden {
            code,
            message: message.into(),
        }
    }

    /// Authentication error with a specific code.
    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code,
            message: message.into(),
        }
    }

    /// Insufficient balance error.
    pub fn insufficient_balance(
        message: impl Into<String>,
        available: Decimal,
        required: Decimal,
    ) -> Self {
        Self::InsufficientBalance {
            message: message.into(),
            available,
            required,
        }
    }

    /// Internal error. `detail` goes to the logs, never to clients.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        Self::Internal(detail.to_string())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } | Self::InsufficientBalance { .. } => 400,
            Self::Unauthorized { .. } => 401,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { code, .. }
            | Self::NotFound { code, .. }
            | Self::Conflict { code, .. }
            | Self::Forbidden { code, .. }
            | Self::Unauthorized { code, .. } => code,
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::Database(_) | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for failures the client cannot fix.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Internal(_))
    }

    /// Message safe to show to clients.
    #[must_use]
    pub fn client_message(&self) -> String {
        if self.is_server_error() {
            GENERIC_SERVER_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    /// Optional structured details for the response envelope.
    #[must_use]
    pub fn details(&self) -> Option<Value> {
        match self {
            Self::InsufficientBalance {
                available,
                required,
                ..
            } => Some(json!({
                "available": available.to_string(),
                "required": required.to_string(),
            })),
            _ => None,
        }
    }
}
