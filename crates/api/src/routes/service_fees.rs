//! Service fee bracket routes. Reads are public; writes are owner-only.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::get,
};
use brilink_db::{
    ServiceFeeRepository, ServiceRepository,
    entities::service_fees,
    repositories::{CreateServiceFeeInput, UpdateServiceFeeInput},
};
use brilink_shared::AppError;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{ApiJson, ApiQuery},
    middleware::AuthUser,
    response::{created, ok},
    routes::{id_value, optional_money, require_owner},
    views::{ServiceFeeView, views},
};

/// Creates the service fee routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/service-fees", get(list_fees).post(create_fee))
        .route(
            "/service-fees/{id}",
            get(get_fee).put(update_fee).delete(delete_fee),
        )
}

/// Query parameters for listing brackets.
#[derive(Debug, Deserialize)]
pub struct ListServiceFeesQuery {
    pub service_id: Option<i64>,
}

/// Request body for creating or updating a bracket. Amounts accept numbers
/// or numeric strings.
#[derive(Debug, Deserialize)]
pub struct ServiceFeeRequest {
    pub service_id: Option<Value>,
    pub min_amount: Option<Value>,
    pub max_amount: Option<Value>,
    pub fee: Option<Value>,
}

/// GET /service-fees - List brackets, optionally for one service.
async fn list_fees(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListServiceFeesQuery>,
) -> ApiResult<Response> {
    let fees = ServiceFeeRepository::new(state.db())
        .list(query.service_id)
        .await?;
    Ok(ok(
        "Data service fee berhasil diambil",
        views::<_, ServiceFeeView>(&fees),
    ))
}

/// GET /service-fees/{id} - Get a bracket.
async fn get_fee(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    let fee = find_fee(&state, id).await?;
    Ok(ok("Data service fee berhasil diambil", ServiceFeeView::from(&fee)))
}

/// POST /service-fees - Create a bracket (owner only).
async fn create_fee(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<ServiceFeeRequest>,
) -> ApiResult<Response> {
    require_owner(&state, &auth, "Hanya owner yang bisa membuat service fee").await?;

    let Some(service_id) = id_value(payload.service_id.as_ref()).filter(|id| *id > 0) else {
        return Err(AppError::validation("MISSING_FIELDS", "service_id wajib diisi").into());
    };
    ensure_service(&state, service_id).await?;

    let min_amount = amount(payload.min_amount.as_ref())?;
    let max_amount = amount(payload.max_amount.as_ref())?;
    let fee = amount(payload.fee.as_ref())?;
    if min_amount < Decimal::ZERO || max_amount < Decimal::ZERO || fee < Decimal::ZERO {
        return Err(AppError::invalid_input("Amount tidak boleh negatif").into());
    }
    check_bounds(min_amount, max_amount)?;

    let bracket = ServiceFeeRepository::new(state.db())
        .create(CreateServiceFeeInput {
            service_id,
            min_amount,
            max_amount,
            fee,
        })
        .await?;

    info!(service_fee_id = bracket.id, service_id, "Service fee created");

    Ok(created("Service fee berhasil dibuat", ServiceFeeView::from(&bracket)))
}

/// PUT /service-fees/{id} - Update a bracket (owner only).
async fn update_fee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<ServiceFeeRequest>,
) -> ApiResult<Response> {
    require_owner(&state, &auth, "Hanya owner yang bisa mengubah service fee").await?;
    let bracket = find_fee(&state, id).await?;

    let mut input = UpdateServiceFeeInput::default();
    if payload.service_id.is_some() {
        let Some(service_id) = id_value(payload.service_id.as_ref()) else {
            return Err(AppError::invalid_input("service_id harus berupa angka").into());
        };
        ensure_service(&state, service_id).await?;
        input.service_id = Some(service_id);
    }
    input.min_amount = field(payload.min_amount.as_ref(), "min_amount")?;
    input.max_amount = field(payload.max_amount.as_ref(), "max_amount")?;
    input.fee = field(payload.fee.as_ref(), "fee")?;

    check_bounds(
        input.min_amount.unwrap_or(bracket.min_amount),
        input.max_amount.unwrap_or(bracket.max_amount),
    )?;

    let bracket = ServiceFeeRepository::new(state.db())
        .update(bracket, input)
        .await?;

    info!(service_fee_id = id, "Service fee updated");

    Ok(ok("Service fee berhasil diubah", ServiceFeeView::from(&bracket)))
}

/// DELETE /service-fees/{id} - Delete a bracket (owner only).
async fn delete_fee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    require_owner(&state, &auth, "Hanya owner yang bisa menghapus service fee").await?;
    find_fee(&state, id).await?;

    ServiceFeeRepository::new(state.db()).delete(id).await?;

    info!(service_fee_id = id, "Service fee deleted");

    Ok(ok("Service fee berhasil dihapus", Value::Null))
}

// ============================================================================
// Helpers
// ============================================================================

async fn find_fee(state: &AppState, id: i64) -> ApiResult<service_fees::Model> {
    ServiceFeeRepository::new(state.db())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::not_found("Service fee tidak ditemukan")))
}

async fn ensure_service(state: &AppState, service_id: i64) -> ApiResult<()> {
    ServiceRepository::new(state.db())
        .find_by_id(service_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError(AppError::not_found("Service tidak ditemukan")))
}

/// A create-time amount; absent means zero.
fn amount(raw: Option<&Value>) -> ApiResult<Decimal> {
    Ok(optional_money(raw, "Amount harus berupa angka")?.unwrap_or(Decimal::ZERO))
}

/// An update-time amount named `name`; must be non-negative when present.
fn field(raw: Option<&Value>, name: &str) -> ApiResult<Option<Decimal>> {
    let value = optional_money(raw, &format!("{name} harus berupa angka"))?;
    if value.is_some_and(|v| v < Decimal::ZERO) {
        return Err(AppError::invalid_input(format!("{name} tidak boleh negatif")).into());
    }
    Ok(value)
}

fn check_bounds(min_amount: Decimal, max_amount: Decimal) -> ApiResult<()> {
    if min_amount > max_amount {
        return Err(AppError::invalid_input(
            "min_amount tidak boleh lebih besar dari max_amount",
        )
        .into());
    }
    Ok(())
}
