//! Service catalogue routes. Reads are public; writes are owner-only.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::get,
};
use brilink_db::{
    ServiceFeeRepository, ServiceRepository,
    entities::services,
    repositories::{CreateServiceInput, UpdateServiceInput},
};
use brilink_shared::AppError;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::ApiJson,
    middleware::AuthUser,
    response::{created, ok},
    routes::{non_blank, require_owner},
    views::{ServiceDetail, views},
};

/// Creates the service routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services).post(create_service))
        .route(
            "/services/{id}",
            get(get_service).put(update_service).delete(delete_service),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for creating a service.
#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub requires_target: bool,
}

/// Request body for updating a service. Blank `category` or `description`
/// clears the field.
#[derive(Debug, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub requires_target: Option<bool>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /services - List services.
async fn list_services(State(state): State<AppState>) -> ApiResult<Response> {
    let services = ServiceRepository::new(state.db()).list().await?;
    Ok(ok("Data service berhasil diambil", services))
}

/// GET /services/{id} - Get a service with its fee brackets.
async fn get_service(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    let service = find_service(&state, id).await?;
    let fees = ServiceFeeRepository::new(state.db()).list(Some(id)).await?;

    Ok(ok(
        "Data service berhasil diambil",
        ServiceDetail {
            service,
            fees: views(&fees),
        },
    ))
}

/// POST /services - Create a service (owner only).
async fn create_service(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateServiceRequest>,
) -> ApiResult<Response> {
    require_owner(&state, &auth, "Hanya owner yang bisa membuat service").await?;

    let Some(name) = non_blank(payload.name.as_deref()) else {
        return Err(AppError::validation("MISSING_FIELDS", "Service name wajib diisi").into());
    };

    let repo = ServiceRepository::new(state.db());
    if repo.name_exists(&name, None).await? {
        return Err(name_exists());
    }

    let service = repo
        .create(CreateServiceInput {
            name,
            requires_target: payload.requires_target,
            category: non_blank(payload.category.as_deref()),
            description: non_blank(payload.description.as_deref()),
        })
        .await?;

    info!(service_id = service.id, name = %service.name, "Service created");

    Ok(created("Service berhasil dibuat", service))
}

/// PUT /services/{id} - Update a service (owner only).
async fn update_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<UpdateServiceRequest>,
) -> ApiResult<Response> {
    require_owner(&state, &auth, "Hanya owner yang bisa mengubah service").await?;
    find_service(&state, id).await?;

    let repo = ServiceRepository::new(state.db());
    let mut input = UpdateServiceInput {
        requires_target: payload.requires_target,
        ..UpdateServiceInput::default()
    };

    if let Some(name) = payload.name.as_deref() {
        let Some(name) = non_blank(Some(name)) else {
            return Err(AppError::invalid_input("Service name tidak boleh kosong").into());
        };
        if repo.name_exists(&name, Some(id)).await? {
            return Err(name_exists());
        }
        input.name = Some(name);
    }
    if let Some(category) = payload.category.as_deref() {
        input.category = Some(non_blank(Some(category)));
    }
    if let Some(description) = payload.description.as_deref() {
        input.description = Some(non_blank(Some(description)));
    }

    let service = repo.update(id, input).await?;

    info!(service_id = id, "Service updated");

    Ok(ok("Service berhasil diubah", service))
}

/// DELETE /services/{id} - Delete a service (owner only).
async fn delete_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    require_owner(&state, &auth, "Hanya owner yang bisa menghapus service").await?;
    find_service(&state, id).await?;

    ServiceRepository::new(state.db()).delete(id).await?;

    info!(service_id = id, "Service deleted");

    Ok(ok("Service berhasil dihapus", Value::Null))
}

async fn find_service(state: &AppState, id: i64) -> ApiResult<services::Model> {
    ServiceRepository::new(state.db())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::not_found("Service tidak ditemukan")))
}

fn name_exists() -> ApiError {
    ApiError(AppError::conflict(
        "SERVICE_ALREADY_EXISTS",
        "Service dengan nama ini sudah ada",
    ))
}
