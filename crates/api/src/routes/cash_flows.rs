//! Cash-flow routes.
//!
//! Manual entries are records only; they never move an agent's balance.
//! Posting writes its own entries through the transaction repository.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::get,
};
use brilink_core::cashflow::CashFlowType;
use brilink_db::{
    AgentRepository, CashFlowRepository,
    entities::cash_flows,
    repositories::{CashFlowFilter, CreateCashFlowInput, UpdateCashFlowInput},
};
use brilink_shared::AppError;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{ApiJson, ApiQuery},
    middleware::AuthUser,
    response::{created, ok},
    routes::{id_value, non_blank, optional_money},
    views::{CashFlowView, views},
};

const DEFAULT_LIMIT: u64 = 50;

/// Creates the cash-flow routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cash-flows", get(list_cash_flows).post(create_cash_flow))
        .route(
            "/cash-flows/{id}",
            get(get_cash_flow)
                .put(update_cash_flow)
                .delete(delete_cash_flow),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for listing cash flows.
#[derive(Debug, Deserialize)]
pub struct ListCashFlowsQuery {
    pub agent_id: Option<i64>,
    #[serde(rename = "type")]
    pub flow_type: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Request body for recording a cash flow.
#[derive(Debug, Deserialize)]
pub struct CreateCashFlowRequest {
    pub agent_profile_id: Option<Value>,
    #[serde(rename = "type")]
    pub flow_type: Option<String>,
    pub source: Option<String>,
    pub amount: Option<Value>,
    pub description: Option<String>,
}

/// Request body for editing a cash flow.
#[derive(Debug, Deserialize)]
pub struct UpdateCashFlowRequest {
    pub source: Option<String>,
    pub amount: Option<Value>,
    /// Blank clears the description.
    pub description: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /cash-flows - List the caller's own entries.
async fn list_cash_flows(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ListCashFlowsQuery>,
) -> ApiResult<Response> {
    if let Some(agent_id) = query.agent_id {
        let agent = AgentRepository::new(state.db()).find_by_id(agent_id).await?;
        if !agent.is_some_and(|a| a.is_controlled_by(auth.user_id())) {
            return Err(
                AppError::forbidden("Anda tidak memiliki akses ke agent profile ini").into(),
            );
        }
    }

    let flow_type = match query.flow_type.as_deref().filter(|t| !t.is_empty()) {
        Some(raw) => Some(raw.parse::<CashFlowType>()?),
        None => None,
    };

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let offset = query.offset.unwrap_or(0);
    let filter = CashFlowFilter {
        user_id: auth.user_id(),
        agent_id: query.agent_id,
        flow_type,
    };

    let (rows, total) = CashFlowRepository::new(state.db())
        .list(filter, limit, offset)
        .await?;

    Ok(ok(
        "Data cash flow berhasil diambil",
        json!({
            "cash_flows": views::<_, CashFlowView>(&rows),
            "total": total,
            "limit": limit,
            "offset": offset,
        }),
    ))
}

/// GET /cash-flows/{id} - Get an entry (its creator or its agent's controller).
async fn get_cash_flow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let row = find_cash_flow(&state, id).await?;

    if row.user_id != auth.user_id() {
        let agent = match row.agent_profile_id {
            Some(agent_id) => AgentRepository::new(state.db()).find_by_id(agent_id).await?,
            None => None,
        };
        if !agent.is_some_and(|a| a.is_controlled_by(auth.user_id())) {
            return Err(AppError::forbidden("Anda tidak memiliki akses ke cash flow ini").into());
        }
    }

    Ok(ok("Data cash flow berhasil diambil", CashFlowView::from(&row)))
}

/// POST /cash-flows - Record a manual cash movement.
async fn create_cash_flow(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateCashFlowRequest>,
) -> ApiResult<Response> {
    let raw_type = payload
        .flow_type
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    let Some(source) = non_blank(payload.source.as_deref()).filter(|_| !raw_type.is_empty())
    else {
        return Err(AppError::validation("MISSING_FIELDS", "type dan source wajib diisi").into());
    };
    let flow_type: CashFlowType = raw_type.parse()?;

    let amount = positive_amount(payload.amount.as_ref())?
        .ok_or_else(|| ApiError(AppError::invalid_input("Amount harus lebih dari 0")))?;

    let agent_profile_id = match payload.agent_profile_id.as_ref() {
        None | Some(Value::Null) => None,
        Some(raw) => Some(id_value(Some(raw)).ok_or_else(|| {
            ApiError(AppError::invalid_input("agent_profile_id harus berupa angka"))
        })?),
    };

    let row = CashFlowRepository::new(state.db())
        .create(CreateCashFlowInput {
            agent_profile_id,
            user_id: auth.user_id(),
            flow_type,
            source,
            amount,
            description: non_blank(payload.description.as_deref()),
        })
        .await?;

    info!(
        cash_flow_id = row.id,
        user_id = auth.user_id(),
        flow_type = %flow_type,
        amount = %amount,
        "Cash flow recorded"
    );

    Ok(created("Cash flow berhasil dibuat", CashFlowView::from(&row)))
}

/// PUT /cash-flows/{id} - Edit an entry (creator only).
async fn update_cash_flow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<UpdateCashFlowRequest>,
) -> ApiResult<Response> {
    let row = find_cash_flow(&state, id).await?;
    if row.user_id != auth.user_id() {
        return Err(
            AppError::forbidden("Anda tidak memiliki akses untuk mengubah cash flow ini").into(),
        );
    }

    let mut input = UpdateCashFlowInput::default();
    if let Some(source) = payload.source.as_deref() {
        let Some(source) = non_blank(Some(source)) else {
            return Err(AppError::invalid_input("Source tidak boleh kosong").into());
        };
        input.source = Some(source);
    }
    input.amount = positive_amount(payload.amount.as_ref())?;
    if let Some(description) = payload.description.as_deref() {
        input.description = Some(non_blank(Some(description)));
    }

    let row = CashFlowRepository::new(state.db())
        .update(row, input)
        .await?;

    info!(cash_flow_id = id, "Cash flow updated");

    Ok(ok("Cash flow berhasil diubah", CashFlowView::from(&row)))
}

/// DELETE /cash-flows/{id} - Delete an entry (creator only).
async fn delete_cash_flow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let row = find_cash_flow(&state, id).await?;
    if row.user_id != auth.user_id() {
        return Err(AppError::forbidden(
            "Anda tidak memiliki akses untuk menghapus cash flow ini",
        )
        .into());
    }

    CashFlowRepository::new(state.db()).delete(id).await?;

    info!(cash_flow_id = id, "Cash flow deleted");

    Ok(ok("Cash flow berhasil dihapus", Value::Null))
}

async fn find_cash_flow(state: &AppState, id: i64) -> ApiResult<cash_flows::Model> {
    CashFlowRepository::new(state.db())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::not_found("Cash flow tidak ditemukan")))
}

/// Parses an optional amount that must be above zero when present.
fn positive_amount(raw: Option<&Value>) -> ApiResult<Option<Decimal>> {
    let amount = optional_money(raw, "Amount harus berupa angka")?;
    if amount.is_some_and(|a| a <= Decimal::ZERO) {
        return Err(AppError::invalid_input("Amount harus lebih dari 0").into());
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{
        TestApp, agent_model, authed, body_json, count_row, exec, ts,
    };
    use axum::http::StatusCode;
    use brilink_db::entities::cash_flows;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn entry(id: i64, user_id: i64, agent: Option<i64>) -> cash_flows::Model {
        cash_flows::Model {
            id,
            agent_profile_id: agent,
            user_id,
            flow_type: "cash_in".to_string(),
            source: "Modal awal".to_string(),
            amount: dec!(1000000),
            description: None,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    #[tokio::test]
    async fn test_list_rejects_foreign_agent() {
        let app = TestApp::new(authed().append_query_results([vec![agent_model(10, 5)]]));
        let token = app.token(1);
        let res = app.get("/api/cash-flows?agent_id=10", Some(&token)).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_type() {
        let app = TestApp::new(authed());
        let token = app.token(1);
        let res = app.get("/api/cash-flows?type=transfer", Some(&token)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_list_envelope() {
        let app = TestApp::new(
            authed()
                .append_query_results([vec![count_row(1)]])
                .append_query_results([vec![entry(1, 1, None)]]),
        );
        let token = app.token(1);
        let res = app.get("/api/cash-flows?type=cash_in", Some(&token)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["data"]["total"], 1);
        assert_eq!(body["data"]["limit"], 50);
        assert_eq!(body["data"]["cash_flows"][0]["type"], "cash_in");
    }

    #[tokio::test]
    async fn test_create_missing_fields() {
        let app = TestApp::new(authed());
        let token = app.token(1);
        let res = app
            .post_json("/api/cash-flows", Some(&token), json!({"type": "cash_in", "amount": 5}))
            .await;
        assert_eq!(body_json(res).await["error"], "MISSING_FIELDS");
    }

    #[tokio::test]
    async fn test_create_rejects_zero_amount() {
        let app = TestApp::new(authed());
        let token = app.token(1);
        let res = app
            .post_json(
                "/api/cash-flows",
                Some(&token),
                json!({"type": "cash_out", "source": "Listrik", "amount": 0}),
            )
            .await;
        assert_eq!(body_json(res).await["message"], "Amount harus lebih dari 0");
    }

    #[tokio::test]
    async fn test_create_rejects_sub_cent_amount() {
        let app = TestApp::new(authed());
        let token = app.token(1);
        let res = app
            .post_json(
                "/api/cash-flows",
                Some(&token),
                json!({"type": "cash_in", "source": "Modal", "amount": "0.004"}),
            )
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["message"], "Amount harus lebih dari 0");
    }

    #[tokio::test]
    async fn test_create_success() {
        let app = TestApp::new(authed().append_query_results([vec![entry(8, 1, Some(10))]]));
        let token = app.token(1);
        let res = app
            .post_json(
                "/api/cash-flows",
                Some(&token),
                json!({"type": "CASH_IN", "source": "Modal awal", "amount": "1000000", "agent_profile_id": 10}),
            )
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(body_json(res).await["data"]["amount"], json!(1_000_000.0));
    }

    #[tokio::test]
    async fn test_get_by_agent_owner() {
        let app = TestApp::new(
            authed()
                .append_query_results([vec![entry(8, 2, Some(10))]])
                .append_query_results([vec![agent_model(10, 1)]]),
        );
        let token = app.token(1);
        let res = app.get("/api/cash-flows/8", Some(&token)).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_by_other_user_is_forbidden() {
        let app = TestApp::new(authed().append_query_results([vec![entry(8, 2, None)]]));
        let token = app.token(1);
        let res = app
            .put_json("/api/cash-flows/8", Some(&token), json!({"source": "Lain"}))
            .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_delete_by_creator() {
        let app = TestApp::new(
            authed()
                .append_query_results([vec![entry(8, 1, None)]])
                .append_exec_results([exec(1)]),
        );
        let token = app.token(1);
        let res = app.delete("/api/cash-flows/8", &token).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
