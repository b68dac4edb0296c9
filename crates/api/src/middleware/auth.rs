//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use brilink_db::TokenBlacklistRepository;
use brilink_shared::{AppError, Claims};
use tracing::debug;

use crate::AppState;
use crate::error::ApiError;

/// Extracts the bearer token from the Authorization header.
///
/// # Errors
///
/// `MISSING_TOKEN` without a header, `INVALID_HEADER_FORMAT` when the header
/// does not carry a bearer token.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Err(AppError::unauthorized("MISSING_TOKEN", "Token diperlukan"));
    };

    let invalid = || {
        AppError::unauthorized(
            "INVALID_HEADER_FORMAT",
            "Format Authorization header salah (Bearer <token>)",
        )
    };

    let header = value.to_str().map_err(|_| invalid())?;
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("Bearer" | "bearer"), Some(token)) => Ok(token),
        _ => Err(invalid()),
    }
}

/// Validates the bearer token of a request and checks it was not logged out.
///
/// # Errors
///
/// Returns an `Unauthorized` error for every rejected token.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Claims, ApiError> {
    let token = bearer_token(headers)?;
    let claims = state.jwt_service.validate_token(token)?;

    let revoked = TokenBlacklistRepository::new(state.db())
        .is_revoked(token)
        .await?;
    if revoked {
        debug!(user_id = claims.user_id, "Rejected logged-out token");
        return Err(ApiError(AppError::unauthorized(
            "INVALID_TOKEN",
            "Token sudah logout",
        )));
    }

    Ok(claims)
}

/// Authentication middleware that validates JWT tokens.
///
/// On success the claims are stored in the request extensions for
/// [`AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, request.headers()).await {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Extractor for authenticated user claims.
///
/// Behind [`auth_middleware`] it reuses the stored claims. On routes that mix
/// public and protected methods it authenticates the request itself.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> i64 {
        self.0.user_id
    }

    /// Returns the email from the claims.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(Self(claims.clone()));
        }
        authenticate(state, &parts.headers).await.map(Self)
    }
}
