//! Success responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use brilink_shared::ApiResponse;
use serde::Serialize;

/// 200 with a success envelope.
pub fn ok<T: Serialize>(message: &str, data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::ok(message, data))).into_response()
}

/// 201 with a success envelope.
pub fn created<T: Serialize>(message: &str, data: T) -> Response {
    (StatusCode::CREATED, Json(ApiResponse::ok(message, data))).into_response()
}
