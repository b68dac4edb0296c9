//! Agent profile routes.
//!
//! With multi-agent mode off (the default) every owner keeps the single agent
//! created at registration; creating and deleting agents is refused.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::get,
};
use brilink_db::{
    AgentRepository,
    entities::agent_profiles,
    repositories::{CreateAgentInput, UpdateAgentInput},
};
use brilink_shared::AppError;
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::ApiJson,
    middleware::AuthUser,
    response::{created, ok},
    routes::{check_owner, current_user, non_blank, require_owner},
    views::{AgentView, views},
};

const MIN_AGENT_NAME_LEN: usize = 3;

/// Creates the agent routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/agents", get(list_agents).post(create_agent))
        .route(
            "/agents/{id}",
            get(get_agent).put(update_agent).delete(delete_agent),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for creating an agent.
#[derive(Debug, Deserialize)]
pub struct CreateAgentRequest {
    /// Display name.
    pub agent_name: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Logo URL or path.
    pub logo: Option<String>,
}

/// Request body for updating an agent. Empty strings clear optional fields.
#[derive(Debug, Deserialize)]
pub struct UpdateAgentRequest {
    /// Display name.
    pub agent_name: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Logo URL or path.
    pub logo: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /agents - Create an agent (multi-agent mode only).
async fn create_agent(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateAgentRequest>,
) -> ApiResult<Response> {
    if !state.settings.multi_agent_enabled {
        return Err(AppError::forbidden_with(
            "MULTI_AGENT_DISABLED",
            "Fitur multi-agen sedang dinonaktifkan. Setiap owner hanya memiliki 1 agent.",
        )
        .into());
    }

    let user = require_owner(&state, &auth, "Hanya owner yang bisa membuat agent profile").await?;
    let agent_name = check_agent_name(payload.agent_name.as_deref())?;

    let repo = AgentRepository::new(state.db());
    if repo.name_exists_for_owner(user.id, &agent_name, None).await? {
        return Err(name_exists());
    }

    let agent = repo
        .create(CreateAgentInput {
            user_id: user.id,
            owner_id: Some(user.id),
            agent_name,
            address: non_blank(payload.address.as_deref()),
            phone: non_blank(payload.phone.as_deref()),
            logo: non_blank(payload.logo.as_deref()),
        })
        .await?;

    info!(agent_id = agent.id, owner_id = user.id, "Agent created");

    Ok(created("Agent profile berhasil dibuat", AgentView::from(&agent)))
}

/// GET /agents - List the caller's agents (owner only).
async fn list_agents(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Response> {
    let user = require_owner(&state, &auth, "Hanya owner yang bisa melihat agent profile").await?;
    let agents = AgentRepository::new(state.db()).list_for_user(user.id).await?;

    Ok(ok(
        "Data agent profile berhasil diambil",
        views::<_, AgentView>(&agents),
    ))
}

/// GET /agents/{id} - Get an agent (its user or any owner).
async fn get_agent(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let agent = find_agent(&state, id).await?;

    if agent.user_id != auth.user_id() {
        let user = current_user(&state, &auth).await?;
        check_owner(&user, "Anda tidak memiliki akses ke agent profile ini")?;
    }

    Ok(ok("Data agent profile berhasil diambil", AgentView::from(&agent)))
}

/// PUT /agents/{id} - Update the caller's own agent (owner only).
async fn update_agent(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<UpdateAgentRequest>,
) -> ApiResult<Response> {
    let user = require_owner(&state, &auth, "Hanya owner yang bisa mengubah agent profile").await?;
    let agent = find_agent(&state, id).await?;
    if agent.user_id != user.id {
        return Err(AppError::forbidden(
            "Anda tidak memiliki akses untuk mengubah agent profile ini",
        )
        .into());
    }

    let repo = AgentRepository::new(state.db());
    let mut input = UpdateAgentInput::default();

    if let Some(name) = payload.agent_name.as_deref() {
        let name = check_agent_name(Some(name))?;
        let owner_id = agent.owner_id.unwrap_or(user.id);
        if repo.name_exists_for_owner(owner_id, &name, Some(id)).await? {
            return Err(name_exists());
        }
        input.agent_name = Some(name);
    }
    if let Some(address) = payload.address.as_deref() {
        input.address = Some(non_blank(Some(address)));
    }
    if let Some(phone) = payload.phone.as_deref() {
        input.phone = Some(non_blank(Some(phone)));
    }
    if let Some(logo) = payload.logo.as_deref() {
        input.logo = Some(non_blank(Some(logo)));
    }

    let agent = repo.update(id, input).await?;

    info!(agent_id = agent.id, "Agent updated");

    Ok(ok("Agent profile berhasil diubah", AgentView::from(&agent)))
}

/// DELETE /agents/{id} - Delete an agent (multi-agent mode only).
async fn delete_agent(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    if !state.settings.multi_agent_enabled {
        return Err(AppError::forbidden_with(
            "AGENT_DELETE_DISABLED",
            "Fitur hapus agent sedang dinonaktifkan dalam mode single-agent.",
        )
        .into());
    }

    let user = require_owner(&state, &auth, "Hanya owner yang bisa menghapus agent profile").await?;
    let agent = find_agent(&state, id).await?;
    if agent.user_id != user.id {
        return Err(AppError::forbidden(
            "Anda tidak memiliki akses untuk menghapus agent profile ini",
        )
        .into());
    }

    AgentRepository::new(state.db()).delete(id).await?;

    info!(agent_id = id, "Agent deleted");

    Ok(ok("Agent profile berhasil dihapus", serde_json::Value::Null))
}

// ============================================================================
// Helpers
// ============================================================================

async fn find_agent(state: &AppState, id: i64) -> ApiResult<agent_profiles::Model> {
    AgentRepository::new(state.db())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::not_found("Agent profile tidak ditemukan")))
}

fn check_agent_name(raw: Option<&str>) -> ApiResult<String> {
    let name = raw.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(AppError::invalid_input("Agent name tidak boleh kosong").into());
    }
    if name.chars().count() < MIN_AGENT_NAME_LEN {
        return Err(AppError::invalid_input("Agent name minimal 3 karakter").into());
    }
    Ok(name.to_string())
}

fn name_exists() -> ApiError {
    ApiError(AppError::conflict(
        "AGENT_NAME_EXISTS",
        "Agent profile dengan nama ini sudah ada",
    ))
}

#[cfg(test)]
mod tests {
    use crate::Settings;
    use crate::routes::test_support::{
        TestApp, agent_model, authed, body_json, count_row, kasir_model, owner_model,
    };
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_disabled_in_single_agent_mode() {
        let app = TestApp::new(authed());
        let token = app.token(1);
        let res = app
            .post_json("/api/agents", Some(&token), json!({"agent_name": "Cabang Dua"}))
            .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(res).await["error"], "MULTI_AGENT_DISABLED");
    }

    #[tokio::test]
    async fn test_delete_disabled_in_single_agent_mode() {
        let app = TestApp::new(authed());
        let token = app.token(1);
        let res = app.delete("/api/agents/10", &token).await;
        assert_eq!(body_json(res).await["error"], "AGENT_DELETE_DISABLED");
    }

    #[tokio::test]
    async fn test_create_in_multi_agent_mode() {
        let settings = Settings {
            multi_agent_enabled: true,
            ..Settings::default()
        };
        let app = TestApp::with_settings(
            authed()
                .append_query_results([vec![owner_model(1)]])
                .append_query_results([vec![count_row(0)]])
                .append_query_results([vec![agent_model(11, 1)]]),
            settings,
        );
        let token = app.token(1);
        let res = app
            .post_json("/api/agents", Some(&token), json!({"agent_name": "Agent 11"}))
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(body_json(res).await["data"]["id"], 11);
    }

    #[tokio::test]
    async fn test_kasir_cannot_list_agents() {
        let app = TestApp::new(authed().append_query_results([vec![kasir_model(2, 10)]]));
        let token = app.token(2);
        let res = app.get("/api/agents", Some(&token)).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_update_rejects_short_name() {
        let app = TestApp::new(
            authed()
                .append_query_results([vec![owner_model(1)]])
                .append_query_results([vec![agent_model(10, 1)]]),
        );
        let token = app.token(1);
        let res = app
            .put_json("/api/agents/10", Some(&token), json!({"agent_name": "AB"}))
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["message"], "Agent name minimal 3 karakter");
    }

    #[tokio::test]
    async fn test_get_own_agent_as_kasir_user() {
        let app = TestApp::new(authed().append_query_results([vec![agent_model(10, 2)]]));
        let token = app.token(2);
        let res = app.get("/api/agents/10", Some(&token)).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await["data"]["total_balance"], json!(0.0));
    }
}
