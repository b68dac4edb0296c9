//! Request extractors that reject with the error envelope.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use brilink_shared::AppError;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

/// JSON body. A missing or malformed body is a 400 `INVALID_REQUEST`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!(error = %rejection.body_text(), "Rejected request body");
                Err(ApiError(AppError::validation(
                    "INVALID_REQUEST",
                    "Request body tidak valid atau kosong",
                )))
            }
        }
    }
}

/// Query string. Undecodable parameters are a 400 `INVALID_INPUT`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError(AppError::invalid_input(format!(
                "Parameter query tidak valid: {}",
                rejection.body_text()
            )))),
        }
    }
}
