//! Report routes.

use axum::{Router, extract::State, response::Response, routing::get};
use brilink_core::reports::{ReportPeriod, ReportService, resolve_report_period, today_in};
use brilink_db::{CashFlowRepository, ReportRepository};
use serde::Deserialize;
use tracing::debug;

use crate::{AppState, error::ApiResult, extractors::ApiQuery, response::ok};

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports", get(get_report))
}

/// Query parameters for the period report.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// daily, weekly, monthly, yearly or custom. Anything else is monthly.
    pub period: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /reports - Aggregated report for a named or custom period.
async fn get_report(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> ApiResult<Response> {
    let tz = state.settings.timezone;
    let resolved = resolve_report_period(
        ReportPeriod::parse(query.period.as_deref()),
        today_in(tz),
        query.start_date.as_deref(),
        query.end_date.as_deref(),
    )?;

    let facts = ReportRepository::new(state.db(), tz)
        .facts(&resolved.range, None)
        .await?;
    let cash = CashFlowRepository::new(state.db())
        .totals(Some(resolved.range.utc_bounds(tz)))
        .await?;

    debug!(
        period = %resolved.name,
        transactions = facts.len(),
        "Report built"
    );

    Ok(ok(
        "Laporan berhasil diambil",
        ReportService::build_period_report(&resolved, &facts, cash),
    ))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{TestApp, authed, body_json, mock, ts};
    use axum::http::StatusCode;
    use brilink_db::entities::{cash_flows, transactions};
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[tokio::test]
    async fn test_requires_token() {
        let app = TestApp::new(mock());
        let res = app.get("/api/reports", None).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_custom_period_requires_both_dates() {
        let app = TestApp::new(authed());
        let token = app.token(1);
        let res = app
            .get("/api/reports?period=custom&start_date=2026-01-01", Some(&token))
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], "INVALID_PERIOD");
    }

    #[tokio::test]
    async fn test_custom_period_rejects_bad_date() {
        let app = TestApp::new(authed());
        let token = app.token(1);
        let res = app
            .get(
                "/api/reports?period=custom&start_date=01-01-2026&end_date=2026-01-31",
                Some(&token),
            )
            .await;
        assert_eq!(body_json(res).await["error"], "INVALID_PERIOD");
    }

    #[tokio::test]
    async fn test_custom_period_report() {
        let cash_out = cash_flows::Model {
            id: 1,
            agent_profile_id: None,
            user_id: 1,
            flow_type: "cash_out".to_string(),
            source: "Operasional".to_string(),
            amount: dec!(20000),
            description: None,
            created_at: ts(),
            updated_at: ts(),
        };
        let app = TestApp::new(
            authed()
                .append_query_results([Vec::<transactions::Model>::new()])
                .append_query_results([vec![cash_out]]),
        );
        let token = app.token(1);
        let res = app
            .get(
                "/api/reports?period=custom&start_date=2026-02-01&end_date=2026-02-03",
                Some(&token),
            )
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["message"], "Laporan berhasil diambil");
        let data = &body["data"];
        assert_eq!(data["period"]["days"], 3);
        assert_eq!(data["period"]["start_date"], "2026-02-01");
        assert_eq!(data["summary"]["net_cash_flow"], json!(-20_000.0));
        assert_eq!(data["daily_breakdown"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_daily_period_has_no_daily_breakdown() {
        let app = TestApp::new(
            authed()
                .append_query_results([Vec::<transactions::Model>::new()])
                .append_query_results([Vec::<cash_flows::Model>::new()]),
        );
        let token = app.token(1);
        let res = app.get("/api/reports?period=daily", Some(&token)).await;
        let data = body_json(res).await["data"].clone();
        assert_eq!(data["period"]["days"], 1);
        assert_eq!(data["daily_breakdown"], json!([]));
    }
}
