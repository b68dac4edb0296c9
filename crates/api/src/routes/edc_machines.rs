//! EDC machine routes.
//!
//! Every route needs a token except `POST /edc-machines/reset-all`, which is
//! open. Saldo edits here are reference-data changes and do not go through
//! posting.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::{get, post},
};
use brilink_db::{
    AgentRepository, EdcMachineRepository,
    entities::edc_machines,
    repositories::{CreateEdcMachineInput, UpdateEdcMachineInput},
};
use brilink_shared::AppError;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{ApiJson, ApiQuery},
    middleware::AuthUser,
    response::{created, ok},
    routes::{non_blank, optional_money, require_owner},
    views::{EdcMachineView, views},
};

const MIN_NAME_LEN: usize = 3;
const MIN_BANK_NAME_LEN: usize = 2;

/// Creates the EDC machine routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/edc-machines", get(list_machines).post(create_machine))
        .route("/edc-machines/reset-all", post(reset_all))
        .route(
            "/edc-machines/{id}",
            get(get_machine).put(update_machine).delete(delete_machine),
        )
        .route("/edc-machines/{id}/add-saldo", post(add_saldo))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for creating a machine.
#[derive(Debug, Deserialize)]
pub struct CreateEdcMachineRequest {
    /// Owning agent; must belong to the caller.
    pub agent_profile_id: Option<i64>,
    /// Machine name.
    pub name: Option<String>,
    /// Issuing bank.
    pub bank_name: Option<String>,
    /// Settlement account.
    pub account_number: Option<String>,
    /// Opening float, number or numeric string.
    pub saldo: Option<Value>,
}

/// Request body for updating a machine.
#[derive(Debug, Deserialize)]
pub struct UpdateEdcMachineRequest {
    pub name: Option<String>,
    pub bank_name: Option<String>,
    /// Blank clears the account number.
    pub account_number: Option<String>,
    pub saldo: Option<Value>,
    pub status: Option<String>,
}

/// Request body for crediting a machine. `amount` wins over `saldo`.
#[derive(Debug, Deserialize)]
pub struct AddSaldoRequest {
    pub amount: Option<Value>,
    pub saldo: Option<Value>,
}

/// Query parameters for listing machines.
#[derive(Debug, Deserialize)]
pub struct ListEdcMachinesQuery {
    pub agent_id: Option<i64>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /edc-machines - Create a machine.
async fn create_machine(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateEdcMachineRequest>,
) -> ApiResult<Response> {
    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    let bank_name = payload
        .bank_name
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if name.is_empty() || bank_name.is_empty() {
        return Err(AppError::validation("MISSING_FIELDS", "name dan bank_name wajib diisi").into());
    }

    if let Some(agent_id) = payload.agent_profile_id {
        let agent = AgentRepository::new(state.db()).find_by_id(agent_id).await?;
        if !agent.is_some_and(|a| a.user_id == auth.user_id()) {
            return Err(
                AppError::forbidden("Anda tidak memiliki akses ke agent profile ini").into(),
            );
        }
    }

    check_name(name)?;
    check_bank_name(bank_name)?;
    let saldo = check_saldo(payload.saldo.as_ref())?.unwrap_or(Decimal::ZERO);

    let repo = EdcMachineRepository::new(state.db());
    if repo
        .name_exists_for_agent(payload.agent_profile_id, name)
        .await?
    {
        return Err(name_exists());
    }

    let machine = repo
        .create(CreateEdcMachineInput {
            agent_profile_id: payload.agent_profile_id,
            name: name.to_string(),
            bank_name: bank_name.to_string(),
            account_number: non_blank(payload.account_number.as_deref()),
            saldo,
            status: "active".to_string(),
        })
        .await?;

    info!(edc_machine_id = machine.id, user_id = auth.user_id(), "EDC machine created");

    Ok(created("EDC machine berhasil dibuat", EdcMachineView::from(&machine)))
}

/// GET /edc-machines - List machines, optionally for one agent.
async fn list_machines(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(query): ApiQuery<ListEdcMachinesQuery>,
) -> ApiResult<Response> {
    let machines = EdcMachineRepository::new(state.db())
        .list(query.agent_id)
        .await?;

    Ok(ok(
        "Data EDC machine berhasil diambil",
        views::<_, EdcMachineView>(&machines),
    ))
}

/// GET /edc-machines/{id} - Get a machine.
async fn get_machine(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let machine = find_machine(&state, id).await?;
    Ok(ok("Data EDC machine berhasil diambil", EdcMachineView::from(&machine)))
}

/// PUT /edc-machines/{id} - Update a machine (owner only).
async fn update_machine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<UpdateEdcMachineRequest>,
) -> ApiResult<Response> {
    find_machine(&state, id).await?;
    require_owner(&state, &auth, "Hanya owner yang dapat mengubah EDC machine").await?;

    let repo = EdcMachineRepository::new(state.db());
    let mut input = UpdateEdcMachineInput::default();

    if let Some(name) = payload.name.as_deref() {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_input("Name tidak boleh kosong").into());
        }
        check_name(name)?;
        if repo.name_taken(name, id).await? {
            return Err(name_exists());
        }
        input.name = Some(name.to_string());
    }
    if let Some(bank_name) = payload.bank_name.as_deref() {
        let bank_name = bank_name.trim();
        if bank_name.is_empty() {
            return Err(AppError::invalid_input("Bank name tidak boleh kosong").into());
        }
        check_bank_name(bank_name)?;
        input.bank_name = Some(bank_name.to_string());
    }
    if let Some(account_number) = payload.account_number.as_deref() {
        input.account_number = Some(non_blank(Some(account_number)));
    }
    input.saldo = check_saldo(payload.saldo.as_ref())?;
    if let Some(status) = payload.status.as_deref() {
        let status = status.trim().to_lowercase();
        if status != "active" && status != "inactive" {
            return Err(
                AppError::invalid_input("Status harus \"active\" atau \"inactive\"").into(),
            );
        }
        input.status = Some(status);
    }

    let machine = repo.update(id, input).await?;

    info!(edc_machine_id = id, "EDC machine updated");

    Ok(ok("EDC machine berhasil diubah", EdcMachineView::from(&machine)))
}

/// DELETE /edc-machines/{id} - Delete a machine.
async fn delete_machine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    find_machine(&state, id).await?;
    EdcMachineRepository::new(state.db()).delete(id).await?;

    info!(edc_machine_id = id, user_id = auth.user_id(), "EDC machine deleted");

    Ok(ok("EDC machine berhasil dihapus", Value::Null))
}

/// POST /edc-machines/{id}/add-saldo - Credit a machine's float (owner only).
async fn add_saldo(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<AddSaldoRequest>,
) -> ApiResult<Response> {
    require_owner(&state, &auth, "Hanya owner yang dapat menambah saldo EDC").await?;
    find_machine(&state, id).await?;

    let raw = payload.amount.as_ref().or(payload.saldo.as_ref());
    let amount = optional_money(raw, "Amount harus berupa angka")?
        .ok_or_else(|| ApiError(AppError::invalid_input("Amount harus berupa angka")))?;
    if amount <= Decimal::ZERO {
        return Err(AppError::invalid_input("Amount harus lebih besar dari 0").into());
    }

    let machine = EdcMachineRepository::new(state.db())
        .add_saldo(id, amount)
        .await?;

    info!(edc_machine_id = id, amount = %amount, "EDC saldo credited");

    Ok(ok("Saldo EDC berhasil ditambahkan", EdcMachineView::from(&machine)))
}

/// POST /edc-machines/reset-all - Zero every float and drop all cash flows.
async fn reset_all(State(state): State<AppState>) -> ApiResult<Response> {
    let summary = EdcMachineRepository::new(state.db()).reset_all().await?;

    warn!(
        edc_machines = summary.edc_machines_reset,
        agents = summary.agents_reset,
        cash_flows = summary.cashflows_deleted,
        "All balances reset"
    );

    Ok(ok(
        "Semua saldo EDC, cash flow, dan tunai di tangan berhasil di-reset",
        summary,
    ))
}

// ============================================================================
// Helpers
// ============================================================================

async fn find_machine(state: &AppState, id: i64) -> ApiResult<edc_machines::Model> {
    EdcMachineRepository::new(state.db())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::not_found("EDC machine tidak ditemukan")))
}

fn check_name(name: &str) -> ApiResult<()> {
    if name.chars().count() < MIN_NAME_LEN {
        return Err(AppError::invalid_input("Name minimal 3 karakter").into());
    }
    Ok(())
}

fn check_bank_name(bank_name: &str) -> ApiResult<()> {
    if bank_name.chars().count() < MIN_BANK_NAME_LEN {
        return Err(AppError::invalid_input("Bank name minimal 2 karakter").into());
    }
    Ok(())
}

fn check_saldo(raw: Option<&Value>) -> ApiResult<Option<Decimal>> {
    let saldo = optional_money(raw, "Saldo harus berupa angka")?;
    if saldo.is_some_and(|s| s < Decimal::ZERO) {
        return Err(AppError::invalid_input("Saldo tidak boleh negatif").into());
    }
    Ok(saldo)
}

fn name_exists() -> ApiError {
    ApiError(AppError::conflict(
        "EDC_ALREADY_EXISTS",
        "EDC machine dengan nama ini sudah ada",
    ))
}
