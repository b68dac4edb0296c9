//! Transaction routes: posting, listing, the daily PDF and deletion.
//!
//! Posting resolves fees, checks the drawn-down float and hands the ledger
//! update to [`TransactionRepository::post`]. Transactions are immutable once
//! posted.

use axum::{
    Router,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use brilink_core::{
    posting::{
        FeeBreakdown, FeeCalculation, PostingError, check_sufficiency,
        generate_transaction_number, parse_posting_amounts,
    },
    reports::{DailyReport, DailyReportRow, DateRange, ReportService, render_daily_report, today_in},
};
use brilink_db::{
    AgentRepository, EdcMachineRepository, FeeResolver, ServiceRepository, TransactionRepository,
    entities::transactions,
    repositories::{NewTransaction, to_facts},
};
use brilink_shared::AppError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{ApiJson, ApiQuery},
    middleware::AuthUser,
    response::{created, ok},
    routes::{current_user, id_value, non_blank},
    views::{TransactionView, views},
};

const DEFAULT_LIMIT: u64 = 50;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/today", get(today_transactions))
        .route("/transactions/report/daily/pdf", get(daily_report_pdf))
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    pub agent_id: Option<i64>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Request body for posting a transaction.
///
/// Ids and amounts accept JSON numbers or numeric strings.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub edc_machine_id: Option<Value>,
    pub service_id: Option<Value>,
    pub agent_profile_id: Option<Value>,
    pub customer_name: Option<String>,
    pub target_number: Option<String>,
    pub reference_number: Option<String>,
    pub amount: Option<Value>,
    pub extra_fee: Option<Value>,
}

/// A freshly posted transaction with its fee explanation.
#[derive(Debug, Serialize)]
pub struct PostedTransaction {
    #[serde(flatten)]
    pub transaction: TransactionView,
    pub fee_calculation: FeeCalculation,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /transactions - List transactions, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListTransactionsQuery>,
) -> ApiResult<Response> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let offset = query.offset.unwrap_or(0);

    let (rows, total) = TransactionRepository::new(state.db())
        .list(query.agent_id, limit, offset)
        .await?;

    Ok(ok(
        "Data transaction berhasil diambil",
        json!({
            "transactions": views::<_, TransactionView>(&rows),
            "total": total,
            "limit": limit,
            "offset": offset,
        }),
    ))
}

/// GET /transactions/today - Today's transactions, newest first.
async fn today_transactions(State(state): State<AppState>) -> ApiResult<Response> {
    let tz = state.settings.timezone;
    let (start, end) = DateRange::single(today_in(tz)).utc_bounds(tz);

    let mut rows = TransactionRepository::new(state.db())
        .between(start, end, None)
        .await?;
    rows.reverse();

    Ok(ok(
        "Data transaksi hari ini berhasil diambil",
        json!({
            "total": rows.len(),
            "transactions": views::<_, TransactionView>(&rows),
        }),
    ))
}

/// GET /transactions/{id} - Get a transaction.
async fn get_transaction(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    let row = find_transaction(&state, id).await?;
    Ok(ok("Data transaction berhasil diambil", TransactionView::from(&row)))
}

/// POST /transactions - Post a transaction with automatic fees.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateTransactionRequest>,
) -> ApiResult<Response> {
    let (Some(edc_machine_id), Some(service_id)) = (
        id_value(payload.edc_machine_id.as_ref()),
        id_value(payload.service_id.as_ref()),
    ) else {
        return Err(PostingError::MissingFields.into());
    };

    let edc = EdcMachineRepository::new(state.db())
        .find_by_id(edc_machine_id)
        .await?
        .ok_or_else(|| ApiError(AppError::not_found("EDC machine tidak ditemukan")))?;
    let service = ServiceRepository::new(state.db())
        .find_by_id(service_id)
        .await?
        .ok_or_else(|| ApiError(AppError::not_found("Service tidak ditemukan")))?;

    let agent = match payload.agent_profile_id.as_ref() {
        None | Some(Value::Null) => None,
        Some(raw) => {
            let agent_id = id_value(Some(raw)).ok_or_else(|| {
                ApiError(AppError::invalid_input("agent_profile_id harus berupa angka"))
            })?;
            let agent = AgentRepository::new(state.db())
                .find_by_id(agent_id)
                .await?
                .ok_or_else(|| ApiError(AppError::not_found("Agent profile tidak ditemukan")))?;
            Some(agent)
        }
    };

    let amounts =
        parse_posting_amounts(payload.amount.as_ref(), payload.extra_fee.as_ref())?;
    let category = service.service_category();
    check_sufficiency(
        &category,
        amounts.amount,
        edc.saldo,
        agent.as_ref().map(|a| a.total_balance),
    )?;

    let resolver = FeeResolver::new(state.db());
    let service_fee = resolver.service_fee(service.id, amounts.amount).await;
    let bank_fee = resolver.bank_fee(edc.id, service.id).await;
    let fees = FeeBreakdown::new(amounts.amount, service_fee, bank_fee, amounts.extra_fee);

    let cashier = current_user(&state, &auth).await?;

    let row = TransactionRepository::new(state.db())
        .post(NewTransaction {
            transaction_number: generate_transaction_number(),
            edc_machine_id: edc.id,
            service_id: service.id,
            service_name: service.name.clone(),
            category,
            agent_profile_id: agent.as_ref().map(|a| a.id),
            user_id: cashier.id,
            cashier_name: Some(cashier.name),
            customer_name: non_blank(payload.customer_name.as_deref()),
            target_number: non_blank(payload.target_number.as_deref()),
            reference_number: non_blank(payload.reference_number.as_deref()),
            fees,
        })
        .await?;

    info!(
        transaction_id = row.id,
        user_id = auth.user_id(),
        service_fee = %fees.service_fee,
        bank_fee = %fees.bank_fee,
        "Transaction created"
    );

    Ok(created(
        "Transaction berhasil dibuat dengan fee otomatis",
        PostedTransaction {
            transaction: TransactionView::from(&row),
            fee_calculation: FeeCalculation::describe(&fees),
        },
    ))
}

/// PUT /transactions/{id} - Always refused.
async fn update_transaction() -> ApiResult<Response> {
    Err(AppError::forbidden("Transaction tidak dapat diubah setelah dibuat").into())
}

/// DELETE /transactions/{id} - Delete a transaction (its agent's user only).
///
/// Balances and cash flows written at posting time stay as they are.
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let row = find_transaction(&state, id).await?;

    let agent = match row.agent_profile_id {
        Some(agent_id) => AgentRepository::new(state.db()).find_by_id(agent_id).await?,
        None => None,
    };
    if !agent.is_some_and(|a| a.user_id == auth.user_id()) {
        return Err(AppError::forbidden(
            "Anda tidak memiliki akses untuk menghapus transaction ini",
        )
        .into());
    }

    TransactionRepository::new(state.db()).delete(id).await?;

    info!(transaction_id = id, user_id = auth.user_id(), "Transaction deleted");

    Ok(ok("Transaction berhasil dihapus", Value::Null))
}

/// GET /transactions/report/daily/pdf - Today's transactions as a PDF.
async fn daily_report_pdf(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Response> {
    let tz = state.settings.timezone;
    let today = today_in(tz);
    let (start, end) = DateRange::single(today).utc_bounds(tz);

    let fallback = current_user(&state, &auth).await.map_or_else(
        |_| "Unknown".to_string(),
        |u| u.name,
    );

    let repo = TransactionRepository::new(state.db());
    let rows = repo.between(start, end, None).await?;
    let refs = repo.load_refs(&rows).await?;
    let facts = to_facts(&rows, &refs, tz);

    let detail: Vec<DailyReportRow> = rows
        .iter()
        .zip(&facts)
        .map(|(t, f)| DailyReportRow {
            time: t
                .created_at
                .with_timezone(&tz)
                .format("%H:%M:%S")
                .to_string(),
            transaction_number: t.transaction_number.clone(),
            cashier_name: t.cashier_name.clone(),
            customer_name: t.customer_name.clone(),
            service_name: f.service_name.clone(),
            amount: t.amount,
            service_fee: t.service_fee,
            bank_fee: t.bank_fee,
            net_profit: t.net_profit,
        })
        .collect();

    let report = DailyReport {
        date: today,
        cashier_label: DailyReport::cashier_label(&detail, &fallback),
        generated_at: Utc::now().with_timezone(&tz).naive_local(),
        totals: ReportService::summarize(&facts),
        rows: detail,
    };
    let bytes = render_daily_report(&report)?;

    info!(
        user_id = auth.user_id(),
        transactions = report.rows.len(),
        bytes = bytes.len(),
        "Daily report rendered"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.file_name()),
            ),
        ],
        bytes,
    )
        .into_response())
}

async fn find_transaction(state: &AppState, id: i64) -> ApiResult<transactions::Model> {
    TransactionRepository::new(state.db())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::not_found("Transaction tidak ditemukan")))
}
