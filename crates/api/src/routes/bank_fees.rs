//! Bank fee routes, one flat fee per (EDC machine, service) pair.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::get,
};
use brilink_db::{
    BankFeeRepository, EdcMachineRepository, ServiceRepository, entities::bank_fees,
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
    routes::{id_value, optional_money},
    views::{BankFeeView, views},
};

/// Creates the bank fee routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bank-fees", get(list_fees).post(create_fee))
        .route(
            "/bank-fees/{id}",
            get(get_fee).put(update_fee).delete(delete_fee),
        )
}

/// Query parameters for listing bank fees.
#[derive(Debug, Deserialize)]
pub struct ListBankFeesQuery {
    pub edc_id: Option<i64>,
}

/// Request body for creating a bank fee.
#[derive(Debug, Deserialize)]
pub struct CreateBankFeeRequest {
    pub edc_machine_id: Option<Value>,
    pub service_id: Option<Value>,
    pub fee: Option<Value>,
}

/// Request body for updating a bank fee.
#[derive(Debug, Deserialize)]
pub struct UpdateBankFeeRequest {
    pub fee: Option<Value>,
}

/// GET /bank-fees - List bank fees, optionally for one machine.
async fn list_fees(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListBankFeesQuery>,
) -> ApiResult<Response> {
    let fees = BankFeeRepository::new(state.db()).list(query.edc_id).await?;
    Ok(ok(
        "Data bank fee berhasil diambil",
        views::<_, BankFeeView>(&fees),
    ))
}

/// GET /bank-fees/{id} - Get a bank fee.
async fn get_fee(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    let fee = find_fee(&state, id).await?;
    Ok(ok("Data bank fee berhasil diambil", BankFeeView::from(&fee)))
}

/// POST /bank-fees - Create a bank fee.
async fn create_fee(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateBankFeeRequest>,
) -> ApiResult<Response> {
    let (Some(edc_machine_id), Some(service_id)) = (
        id_value(payload.edc_machine_id.as_ref()),
        id_value(payload.service_id.as_ref()),
    ) else {
        return Err(AppError::validation(
            "MISSING_FIELDS",
            "edc_machine_id dan service_id wajib diisi",
        )
        .into());
    };

    let fee = check_fee(payload.fee.as_ref())?.unwrap_or(Decimal::ZERO);

    if EdcMachineRepository::new(state.db())
        .find_by_id(edc_machine_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found("EDC machine tidak ditemukan").into());
    }
    if ServiceRepository::new(state.db())
        .find_by_id(service_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found("Service tidak ditemukan").into());
    }

    let row = BankFeeRepository::new(state.db())
        .create(edc_machine_id, service_id, fee)
        .await?;

    info!(
        bank_fee_id = row.id,
        edc_machine_id,
        service_id,
        user_id = auth.user_id(),
        "Bank fee created"
    );

    Ok(created("Bank fee berhasil dibuat", BankFeeView::from(&row)))
}

/// PUT /bank-fees/{id} - Change a bank fee.
async fn update_fee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<UpdateBankFeeRequest>,
) -> ApiResult<Response> {
    let row = find_fee(&state, id).await?;

    let row = match check_fee(payload.fee.as_ref())? {
        Some(fee) => {
            BankFeeRepository::new(state.db())
                .update_fee(row, fee)
                .await?
        }
        None => row,
    };

    info!(bank_fee_id = id, "Bank fee updated");

    Ok(ok("Bank fee berhasil diubah", BankFeeView::from(&row)))
}

/// DELETE /bank-fees/{id} - Delete a bank fee.
async fn delete_fee(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    find_fee(&state, id).await?;
    BankFeeRepository::new(state.db()).delete(id).await?;

    info!(bank_fee_id = id, "Bank fee deleted");

    Ok(ok("Bank fee berhasil dihapus", Value::Null))
}

async fn find_fee(state: &AppState, id: i64) -> ApiResult<bank_fees::Model> {
    BankFeeRepository::new(state.db())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::not_found("Bank fee tidak ditemukan")))
}

fn check_fee(raw: Option<&Value>) -> ApiResult<Option<Decimal>> {
    let fee = optional_money(raw, "Fee harus berupa angka")?;
    if fee.is_some_and(|f| f < Decimal::ZERO) {
        return Err(AppError::invalid_input("Fee tidak boleh negatif").into());
    }
    Ok(fee)
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{
        TestApp, authed, body_json, edc_model, exec, mock, service_model, ts,
    };
    use axum::http::StatusCode;
    use brilink_db::entities::{bank_fees, edc_machines};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn row(id: i64) -> bank_fees::Model {
        bank_fees::Model {
            id,
            edc_machine_id: 1,
            service_id: 2,
            fee: dec!(6500),
            created_at: ts(),
            updated_at: ts(),
        }
    }

    #[tokio::test]
    async fn test_requires_token() {
        let app = TestApp::new(mock());
        let res = app.get("/api/bank-fees", None).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_missing_fields() {
        let app = TestApp::new(authed());
        let token = app.token(1);
        let res = app
            .post_json("/api/bank-fees", Some(&token), json!({"edc_machine_id": 1}))
            .await;
        assert_eq!(body_json(res).await["error"], "MISSING_FIELDS");
    }

    #[tokio::test]
    async fn test_create_unknown_machine() {
        let app = TestApp::new(
            authed().append_query_results([Vec::<edc_machines::Model>::new()]),
        );
        let token = app.token(1);
        let res = app
            .post_json(
                "/api/bank-fees",
                Some(&token),
                json!({"edc_machine_id": 9, "service_id": 2, "fee": 6500}),
            )
            .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_duplicate_pair() {
        let app = TestApp::new(
            authed()
                .append_query_results([vec![edc_model(1, dec!(0))]])
                .append_query_results([vec![service_model(2, None)]])
                .append_query_results([vec![row(3)]]),
        );
        let token = app.token(1);
        let res = app
            .post_json(
                "/api/bank-fees",
                Some(&token),
                json!({"edc_machine_id": 1, "service_id": 2, "fee": 6500}),
            )
            .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(res).await["error"], "BANK_FEE_ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn test_update_rejects_negative_fee() {
        let app = TestApp::new(authed().append_query_results([vec![row(3)]]));
        let token = app.token(1);
        let res = app
            .put_json("/api/bank-fees/3", Some(&token), json!({"fee": -10}))
            .await;
        assert_eq!(body_json(res).await["message"], "Fee tidak boleh negatif");
    }

    #[tokio::test]
    async fn test_delete() {
        let app = TestApp::new(
            authed()
                .append_query_results([vec![row(3)]])
                .append_exec_results([exec(1)]),
        );
        let token = app.token(1);
        let res = app.delete("/api/bank-fees/3", &token).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
