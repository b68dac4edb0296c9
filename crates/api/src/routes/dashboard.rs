//! Dashboard routes.
//!
//! All figures are global across users and agents. "Today" is the current
//! date in the configured reporting time zone.

use axum::{
    Router,
    extract::State,
    response::Response,
    routing::get,
};
use brilink_core::reports::{
    CashTotals, DateRange, ReportService, ServiceRank, TOP_SERVICES, TrendPoint,
    dashboard_range, today_in,
};
use brilink_db::{
    CashFlowRepository, EdcMachineRepository, ReportRepository, TransactionRepository,
    UserRepository, repositories::transfer_sum,
};
use brilink_shared::types::{PageMeta, PageRequest};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::{
    AppState,
    error::ApiResult,
    extractors::ApiQuery,
    response::ok,
    views::TransactionWithRefs,
};

const RECENT_TRANSACTIONS: u64 = 10;
const MAX_RECENT_TRANSACTIONS: i64 = 50;
const DEFAULT_CASHIER_PER_PAGE: u64 = 25;
const MAX_CASHIER_PER_PAGE: u64 = 200;

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(overview))
        .route("/dashboard/cashier", get(cashier_dashboard))
        .route("/dashboard/cashier/transactions", get(cashier_transactions))
        .route(
            "/dashboard/cards/total-revenue-today",
            get(card_total_revenue_today),
        )
        .route("/dashboard/cards/saldo-tunai", get(card_saldo_tunai))
        .route("/dashboard/cards/saldo-edc", get(card_saldo_edc))
        .route(
            "/dashboard/cards/total-transactions-today",
            get(card_total_transactions_today),
        )
        .route(
            "/dashboard/cards/recent-transactions",
            get(card_recent_transactions),
        )
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for the overview.
#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    /// Trailing days ending today; ignored when both dates are given.
    pub days: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Query parameters for the cashier transaction list.
#[derive(Debug, Deserialize)]
pub struct CashierTransactionsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Query parameters for the recent-transactions card.
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Start and end of the overview range.
#[derive(Debug, Serialize)]
pub struct PeriodBounds {
    pub start_date: String,
    pub end_date: String,
}

/// Owner dashboard.
#[derive(Debug, Serialize)]
pub struct Overview {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue_today: Decimal,
    pub total_transactions_today: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub saldo_tunai: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub saldo_edc: Decimal,
    pub active_kasir: u64,
    pub top_services_by_revenue: Vec<ServiceRank>,
    pub top_services_by_volume: Vec<ServiceRank>,
    pub daily_trend: Vec<TrendPoint>,
    pub recent_transactions: Vec<TransactionWithRefs>,
    pub period: PeriodBounds,
}

/// Today's fee sums.
#[derive(Debug, Serialize)]
pub struct FeeSums {
    #[serde(with = "rust_decimal::serde::float")]
    pub service_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub bank_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub extra_fee: Decimal,
}

/// Cashier dashboard.
#[derive(Debug, Serialize)]
pub struct CashierDashboard {
    pub date: String,
    pub total_transactions_today: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub cash_out_today: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_transfer_via_edc: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub cash_on_hand: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_fees_today: Decimal,
    pub fee_breakdown: FeeSums,
}

/// Saldo tunai card.
#[derive(Debug, Serialize)]
pub struct SaldoTunai {
    #[serde(with = "rust_decimal::serde::float")]
    pub saldo_tunai: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub cash_in_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub cash_out_total: Decimal,
}

impl From<CashTotals> for SaldoTunai {
    fn from(cash: CashTotals) -> Self {
        Self {
            saldo_tunai: cash.net(),
            cash_in_total: cash.cash_in,
            cash_out_total: cash.cash_out,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /dashboard - Owner overview.
async fn overview(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<OverviewQuery>,
) -> ApiResult<Response> {
    let tz = state.settings.timezone;
    let today = today_in(tz);
    let range = dashboard_range(
        today,
        query.days,
        query.start_date.as_deref(),
        query.end_date.as_deref(),
    )?;

    let reports = ReportRepository::new(state.db(), tz);
    let facts = reports.facts(&range, None).await?;
    let today_totals = ReportService::summarize(&reports.facts(&DateRange::single(today), None).await?);

    let cash = CashFlowRepository::new(state.db()).totals(None).await?;
    let saldo_edc = EdcMachineRepository::new(state.db()).total_saldo().await?;
    let active_kasir = UserRepository::new(state.db()).count_kasir().await?;

    let transactions = TransactionRepository::new(state.db());
    let recent = transactions.recent(RECENT_TRANSACTIONS).await?;
    let refs = transactions.load_refs(&recent).await?;

    debug!(
        start = %range.start_str(),
        end = %range.end_str(),
        transactions = facts.len(),
        "Dashboard computed"
    );

    Ok(ok(
        "Dashboard data berhasil diambil",
        Overview {
            total_revenue_today: today_totals.amount,
            total_transactions_today: today_totals.count,
            saldo_tunai: cash.net(),
            saldo_edc,
            active_kasir,
            top_services_by_revenue: ReportService::top_services_by_revenue(&facts, TOP_SERVICES),
            top_services_by_volume: ReportService::top_services_by_volume(&facts, TOP_SERVICES),
            daily_trend: ReportService::daily_trend(&facts, &range),
            recent_transactions: TransactionWithRefs::build(&recent, &refs),
            period: PeriodBounds {
                start_date: range.start_str(),
                end_date: range.end_str(),
            },
        },
    ))
}

/// GET /dashboard/cashier - Today's figures for the cashier screen.
async fn cashier_dashboard(State(state): State<AppState>) -> ApiResult<Response> {
    let tz = state.settings.timezone;
    let today = DateRange::single(today_in(tz));

    let facts = ReportRepository::new(state.db(), tz)
        .facts(&today, None)
        .await?;
    let totals = ReportService::summarize(&facts);

    let cash_flows = CashFlowRepository::new(state.db());
    let cash_today = cash_flows.totals(Some(today.utc_bounds(tz))).await?;
    let cash_all = cash_flows.totals(None).await?;

    Ok(ok(
        "Cashier dashboard data berhasil diambil",
        CashierDashboard {
            date: today.start_str(),
            total_transactions_today: totals.count,
            cash_out_today: cash_today.cash_out,
            total_transfer_via_edc: transfer_sum(&facts),
            cash_on_hand: ReportService::cash_on_hand(cash_all, &totals),
            total_fees_today: totals.total_fees(),
            fee_breakdown: FeeSums {
                service_fee: totals.service_fee,
                bank_fee: totals.bank_fee,
                extra_fee: totals.extra_fee,
            },
        },
    ))
}

/// GET /dashboard/cashier/transactions - Today's transactions, paginated.
async fn cashier_transactions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CashierTransactionsQuery>,
) -> ApiResult<Response> {
    let tz = state.settings.timezone;
    let today = DateRange::single(today_in(tz));
    let (start, end) = today.utc_bounds(tz);
    let page = PageRequest::new(
        query.page,
        query.per_page,
        DEFAULT_CASHIER_PER_PAGE,
        MAX_CASHIER_PER_PAGE,
    );

    let repo = TransactionRepository::new(state.db());
    let (rows, total) = repo.page_between(start, end, &page).await?;
    let refs = repo.load_refs(&rows).await?;

    Ok(ok(
        "Cashier transactions berhasil diambil",
        json!({
            "date": today.start_str(),
            "meta": PageMeta::new(page, total),
            "transactions": TransactionWithRefs::build(&rows, &refs),
        }),
    ))
}

/// GET /dashboard/cards/total-revenue-today
async fn card_total_revenue_today(State(state): State<AppState>) -> ApiResult<Response> {
    let tz = state.settings.timezone;
    let today = DateRange::single(today_in(tz));
    let totals = ReportService::summarize(
        &ReportRepository::new(state.db(), tz)
            .facts(&today, None)
            .await?,
    );

    Ok(ok(
        "Total pendapatan hari ini berhasil diambil",
        json!({
            "total_revenue_today": money(totals.amount),
            "date": today.start_str(),
        }),
    ))
}

/// GET /dashboard/cards/saldo-tunai
async fn card_saldo_tunai(State(state): State<AppState>) -> ApiResult<Response> {
    let cash = CashFlowRepository::new(state.db()).totals(None).await?;
    Ok(ok("Saldo tunai berhasil diambil", SaldoTunai::from(cash)))
}

/// GET /dashboard/cards/saldo-edc
async fn card_saldo_edc(State(state): State<AppState>) -> ApiResult<Response> {
    let saldo = EdcMachineRepository::new(state.db()).total_saldo().await?;
    Ok(ok(
        "Saldo EDC berhasil diambil",
        json!({ "saldo_edc": money(saldo) }),
    ))
}

/// GET /dashboard/cards/total-transactions-today
async fn card_total_transactions_today(State(state): State<AppState>) -> ApiResult<Response> {
    let tz = state.settings.timezone;
    let today = DateRange::single(today_in(tz));
    let facts = ReportRepository::new(state.db(), tz)
        .facts(&today, None)
        .await?;

    Ok(ok(
        "Total transaksi hari ini berhasil diambil",
        json!({
            "total_transactions_today": facts.len(),
            "date": today.start_str(),
        }),
    ))
}

/// GET /dashboard/cards/recent-transactions
async fn card_recent_transactions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RecentQuery>,
) -> ApiResult<Response> {
    let limit = query
        .limit
        .unwrap_or(10)
        .clamp(1, MAX_RECENT_TRANSACTIONS)
        .unsigned_abs();

    let repo = TransactionRepository::new(state.db());
    let rows = repo.recent(limit).await?;
    let refs = repo.load_refs(&rows).await?;

    Ok(ok(
        "Transaksi terbaru berhasil diambil",
        json!({
            "recent_transactions": TransactionWithRefs::build(&rows, &refs),
            "limit": limit,
        }),
    ))
}

/// Money as a JSON number.
pub(crate) fn money(amount: Decimal) -> serde_json::Value {
    amount
        .to_f64()
        .map_or(serde_json::Value::Null, serde_json::Value::from)
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{TestApp, authed, body_json, count_row, edc_model, mock, ts};
    use axum::http::StatusCode;
    use brilink_db::entities::{cash_flows, transactions};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn none<T>() -> Vec<T> {
        Vec::new()
    }

    #[tokio::test]
    async fn test_requires_token() {
        let app = TestApp::new(mock());
        let res = app.get("/api/dashboard", None).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_overview_rejects_bad_date() {
        let app = TestApp::new(authed());
        let token = app.token(1);
        let res = app
            .get(
                "/api/dashboard?start_date=2026-13-01&end_date=2026-01-31",
                Some(&token),
            )
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], "INVALID_DATE_FORMAT");
    }

    #[tokio::test]
    async fn test_overview_rejects_days_past_calendar() {
        let app = TestApp::new(authed());
        let token = app.token(1);
        let res = app
            .get("/api/dashboard?days=9223372036854775807", Some(&token))
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_overview_on_empty_books() {
        let app = TestApp::new(
            authed()
                .append_query_results([none::<transactions::Model>()])
                .append_query_results([none::<transactions::Model>()])
                .append_query_results([none::<cash_flows::Model>()])
                .append_query_results([vec![edc_model(1, dec!(750000)), edc_model(2, dec!(250000))]])
                .append_query_results([vec![count_row(2)]])
                .append_query_results([none::<transactions::Model>()]),
        );
        let token = app.token(1);
        let res = app.get("/api/dashboard?days=3", Some(&token)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let data = body_json(res).await["data"].clone();
        assert_eq!(data["saldo_edc"], json!(1_000_000.0));
        assert_eq!(data["active_kasir"], 2);
        assert_eq!(data["daily_trend"].as_array().map(Vec::len), Some(3));
        assert_eq!(data["daily_trend"][0]["count"], 0);
        assert_eq!(data["top_services_by_revenue"], json!([]));
    }

    #[tokio::test]
    async fn test_saldo_edc_card() {
        let app = TestApp::new(authed().append_query_results([vec![edc_model(1, dec!(1250.50))]]));
        let token = app.token(1);
        let res = app.get("/api/dashboard/cards/saldo-edc", Some(&token)).await;
        assert_eq!(body_json(res).await["data"]["saldo_edc"], json!(1250.5));
    }

    #[tokio::test]
    async fn test_saldo_tunai_card() {
        let app = TestApp::new(authed().append_query_results([none::<cash_flows::Model>()]));
        let token = app.token(1);
        let res = app.get("/api/dashboard/cards/saldo-tunai", Some(&token)).await;
        let data = body_json(res).await["data"].clone();
        assert_eq!(data["saldo_tunai"], json!(0.0));
        assert_eq!(data["cash_in_total"], json!(0.0));
    }

    #[tokio::test]
    async fn test_recent_card_clamps_limit() {
        let app = TestApp::new(authed().append_query_results([none::<transactions::Model>()]));
        let token = app.token(1);
        let res = app
            .get("/api/dashboard/cards/recent-transactions?limit=500", Some(&token))
            .await;
        assert_eq!(body_json(res).await["data"]["limit"], 50);
    }

    #[tokio::test]
    async fn test_cashier_transactions_meta() {
        let app = TestApp::new(
            authed()
                .append_query_results([vec![count_row(0)]])
                .append_query_results([none::<transactions::Model>()]),
        );
        let token = app.token(1);
        let res = app
            .get("/api/dashboard/cashier/transactions?per_page=0&page=-3", Some(&token))
            .await;
        let meta = body_json(res).await["data"]["meta"].clone();
        assert_eq!(meta["per_page"], 1);
        assert_eq!(meta["current_page"], 1);
        assert_eq!(meta["last_page"], 1);
    }

    #[tokio::test]
    async fn test_cashier_dashboard_cash_on_hand() {
        let cash_in = cash_flows::Model {
            id: 1,
            agent_profile_id: None,
            user_id: 1,
            flow_type: "cash_in".to_string(),
            source: "Modal".to_string(),
            amount: dec!(500000),
            description: None,
            created_at: ts(),
            updated_at: ts(),
        };
        let app = TestApp::new(
            authed()
                .append_query_results([none::<transactions::Model>()])
                .append_query_results([none::<cash_flows::Model>()])
                .append_query_results([vec![cash_in]]),
        );
        let token = app.token(1);
        let res = app.get("/api/dashboard/cashier", Some(&token)).await;
        let data = body_json(res).await["data"].clone();
        assert_eq!(data["cash_on_hand"], json!(500_000.0));
        assert_eq!(data["total_transactions_today"], 0);
        assert_eq!(data["fee_breakdown"]["bank_fee"], json!(0.0));
    }
}
