//! API route definitions.

use axum::{Router, middleware};
use brilink_db::{UserRepository, entities::users};
use brilink_shared::{AppError, types::parse_amount};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::{AuthUser, auth_middleware},
};

pub mod agents;
pub mod auth;
pub mod bank_fees;
pub mod cash_flows;
pub mod cashier;
pub mod dashboard;
pub mod edc_machines;
pub mod health;
pub mod reports;
pub mod service_fees;
pub mod services;
pub mod transactions;

/// Creates the `/api` router.
///
/// Groups whose every route needs a token sit behind [`auth_middleware`].
/// Groups that mix public and protected methods on one path authenticate
/// per handler through the `AuthUser` extractor.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(agents::routes())
        .merge(bank_fees::routes())
        .merge(transactions::routes())
        .merge(cash_flows::routes())
        .merge(dashboard::routes())
        .merge(reports::routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(edc_machines::routes())
        .merge(services::routes())
        .merge(service_fees::routes())
        .merge(cashier::routes())
        .merge(protected_routes)
}

// ============================================================================
// Shared handler helpers
// ============================================================================

/// Loads the caller's user row.
pub(crate) async fn current_user(state: &AppState, auth: &AuthUser) -> ApiResult<users::Model> {
    UserRepository::new(state.db())
        .find_by_id(auth.user_id())
        .await?
        .ok_or_else(|| {
            ApiError(AppError::NotFound {
                code: "USER_NOT_FOUND",
                message: "User tidak ditemukan".to_string(),
            })
        })
}

/// Loads the caller and rejects anyone but an owner with `message`.
pub(crate) async fn require_owner(
    state: &AppState,
    auth: &AuthUser,
    message: &str,
) -> ApiResult<users::Model> {
    let user = current_user(state, auth).await?;
    check_owner(&user, message)?;
    Ok(user)
}

/// Rejects non-owners with `message`.
pub(crate) fn check_owner(user: &users::Model, message: &str) -> ApiResult<()> {
    if user.is_owner() {
        Ok(())
    } else {
        Err(ApiError(AppError::forbidden(message)))
    }
}

/// Parses an optional money field.
///
/// `None` and JSON null are absent. Values are rounded to the stored money
/// scale, so range checks apply to what gets persisted. Anything that is not a number or a
/// numeric string is `INVALID_INPUT` with `message`.
pub(crate) fn optional_money(value: Option<&Value>, message: &str) -> ApiResult<Option<Decimal>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => parse_amount(v)
            .map(Some)
            .ok_or_else(|| ApiError(AppError::invalid_input(message))),
    }
}

/// Trims a string, mapping blank to `None`.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Reads a numeric id given either as a JSON number or a numeric string.
pub(crate) fn id_value(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod test_support;
