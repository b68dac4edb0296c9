//! Public cashier card: transfer money received on one day.

use axum::{Router, extract::State, response::Response, routing::get};
use brilink_core::reports::{single_day, today_in};
use brilink_db::ReportRepository;
use brilink_shared::AppError;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::ApiResult, extractors::ApiQuery, response::ok};

/// Creates the cashier routes. No token is required.
pub fn routes() -> Router<AppState> {
    Router::new().route("/cashier/uangmasuk", get(uang_masuk))
}

/// Query parameters for the transfer card.
#[derive(Debug, Deserialize)]
pub struct UangMasukQuery {
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub agent_id: Option<String>,
}

/// GET /cashier/uangmasuk - Sum of Transfer-category amounts for a day.
async fn uang_masuk(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UangMasukQuery>,
) -> ApiResult<Response> {
    let tz = state.settings.timezone;
    let range = single_day(
        today_in(tz),
        query.date.as_deref(),
        query.start_date.as_deref(),
    )?;

    let agent_id = match query.agent_id.as_deref() {
        None => None,
        Some(raw) => Some(
            raw.trim()
                .parse::<i64>()
                .map_err(|_| AppError::invalid_input("agent_id harus berupa angka"))?,
        ),
    };

    let total = ReportRepository::new(state.db(), tz)
        .transfer_total(&range, agent_id)
        .await?;

    Ok(ok(
        "Data uang masuk (transfer only) berhasil diambil",
        json!({
            "period": {
                "start_date": range.start_str(),
                "end_date": range.end_str(),
            },
            "total_transfer": super::dashboard::money(total),
        }),
    ))
}
