//! Authentication types shared by the token service and the HTTP layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub user_id: i64,
    /// User email at the time of login.
    pub email: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: i64, email: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the expiry as a UTC timestamp.
    ///
    /// Falls back to the current time for an out-of-range `exp`.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Login request payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: Option<String>,
    /// User password.
    pub password: Option<String>,
}

/// Registration request payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: Option<String>,
    /// User email.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
    /// `owner` or `kasir`. Defaults to owner.
    pub role: Option<String>,
    /// Owner the new kasir works for.
    pub owner_id: Option<i64>,
}

/// Partial user update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    /// New display name.
    pub name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New plaintext password.
    pub password: Option<String>,
    /// New role.
    pub role: Option<String>,
    /// New status.
    pub status: Option<String>,
}

/// Data returned after a successful logout.
#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
    /// User whose token was revoked.
    pub user_id: i64,
    /// Email from the revoked token.
    pub email: String,
    /// Time of revocation.
    pub logout_time: DateTime<Utc>,
}
