//! Authentication and user management routes.

use axum::{
    Router,
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
    routing::{get, post, put},
};
use brilink_core::auth::{
    AccountStatus, UserRole, hash_password, normalize_email, validate_email, validate_name,
    validate_password, verify_password,
};
use brilink_db::{
    AgentRepository, TokenBlacklistRepository, UserRepository,
    repositories::{CreateUserInput, RevokeOutcome, UpdateUserInput, UserFilter},
};
use brilink_shared::{
    AppError,
    auth::{LoginRequest, LogoutResponse, RegisterRequest, UpdateUserRequest},
    types::{PageRequest, Pagination},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{ApiJson, ApiQuery},
    middleware::{AuthUser, auth::bearer_token},
    response::{created, ok},
    routes::{current_user, require_owner},
    views::{AgentSummary, UserListItem},
};

const DEFAULT_USERS_PER_PAGE: u64 = 50;
const MAX_USERS_PER_PAGE: u64 = 200;

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Auth routes that sit behind the auth middleware.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/users", get(list_users))
        .route("/auth/users/{id}", put(update_user).delete(delete_user))
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for listing users.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    /// Filter by role.
    pub role: Option<String>,
    /// Filter by status.
    pub status: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<i64>,
    /// Page size.
    pub per_page: Option<i64>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register - Register a new user.
async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> ApiResult<Response> {
    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    let email = payload.email.as_deref().map(normalize_email).unwrap_or_default();
    let password = payload.password.as_deref().unwrap_or_default();

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::validation(
            "MISSING_FIELDS",
            "Field name, email, dan password wajib diisi",
        )
        .into());
    }

    let role = UserRole::parse_or_default(payload.role.as_deref())?;

    // A kasir joins the agent of an existing owner.
    let owner_agent_id = if role == UserRole::Kasir {
        Some(check_kasir_owner(&state, payload.owner_id).await?)
    } else {
        None
    };

    let name = validate_name(name)?;
    let email = validate_email(&email)?;

    let users = UserRepository::new(state.db());
    if users.email_taken(&email, None).await? {
        return Err(AppError::conflict("EMAIL_ALREADY_EXISTS", "Email sudah terdaftar").into());
    }

    validate_password(password)?;
    let password_hash = hash_password(password)?;

    let user = match owner_agent_id {
        Some(agent_id) => {
            users
                .create(CreateUserInput {
                    name,
                    email,
                    password_hash,
                    role,
                    agent_profile_id: Some(agent_id),
                })
                .await?
        }
        None => users.register_owner(name, email, password_hash).await?.0,
    };

    info!(user_id = user.id, role = %user.role, "User registered");

    Ok(created("User berhasil didaftarkan", user))
}

/// Resolves the agent a new kasir is attached to.
async fn check_kasir_owner(state: &AppState, owner_id: Option<i64>) -> ApiResult<i64> {
    let Some(owner_id) = owner_id.filter(|id| *id > 0) else {
        return Err(AppError::validation(
            "MISSING_OWNER_ID",
            "Untuk role kasir, owner_id wajib diisi",
        )
        .into());
    };

    let owner = UserRepository::new(state.db()).find_by_id(owner_id).await?;
    if !owner.is_some_and(|o| o.is_owner()) {
        return Err(AppError::validation("INVALID_OWNER", "Owner tidak ditemukan").into());
    }

    AgentRepository::new(state.db())
        .list_for_user(owner_id)
        .await?
        .first()
        .map(|agent| agent.id)
        .ok_or_else(|| {
            AppError::validation("OWNER_NO_AGENT", "Owner belum memiliki agent profile").into()
        })
}

/// POST /auth/login - Authenticate a user and return a token.
async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Response> {
    let email = payload.email.as_deref().map(normalize_email).unwrap_or_default();
    let password = payload.password.as_deref().unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        return Err(
            AppError::validation("MISSING_FIELDS", "Email dan password wajib diisi").into(),
        );
    }

    let invalid_credentials =
        || ApiError(AppError::unauthorized("INVALID_CREDENTIALS", "Email atau password salah"));

    let Some(user) = UserRepository::new(state.db()).find_by_email(&email).await? else {
        info!(email = %email, "Login attempt for non-existent user");
        return Err(invalid_credentials());
    };

    if !verify_password(password, &user.password)? {
        info!(user_id = user.id, "Failed login attempt - invalid password");
        return Err(invalid_credentials());
    }

    if !user.is_active() {
        return Err(AppError::forbidden_with("USER_INACTIVE", "User tidak aktif").into());
    }

    let token = state.jwt_service.generate_token(user.id, &user.email)?;

    info!(user_id = user.id, "User logged in successfully");

    Ok(ok("Login berhasil", json!({ "user": user, "token": token })))
}

/// POST /auth/logout - Revoke the presented token.
///
/// Skips the revocation check so a repeated logout is reported as such.
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let token = bearer_token(&headers)?;
    let claims = state.jwt_service.validate_token(token)?;

    let user = UserRepository::new(state.db())
        .find_by_id(claims.user_id)
        .await?
        .ok_or_else(|| {
            ApiError(AppError::NotFound {
                code: "USER_NOT_FOUND",
                message: "User tidak ditemukan".to_string(),
            })
        })?;

    let outcome = TokenBlacklistRepository::new(state.db())
        .revoke(token, user.id, claims.expires_at())
        .await?;
    if outcome == RevokeOutcome::AlreadyRevoked {
        return Err(AppError::conflict(
            "TOKEN_ALREADY_BLACKLISTED",
            "Token sudah logout sebelumnya",
        )
        .into());
    }

    info!(user_id = user.id, "User logged out");

    Ok(ok(
        "Logout berhasil",
        LogoutResponse {
            user_id: user.id,
            email: user.email,
            logout_time: Utc::now(),
        },
    ))
}

/// GET /auth/users - List users with their agents.
async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ListUsersQuery>,
) -> ApiResult<Response> {
    current_user(&state, &auth).await?;

    let page = PageRequest::new(
        query.page,
        query.per_page,
        DEFAULT_USERS_PER_PAGE,
        MAX_USERS_PER_PAGE,
    );
    let filter = UserFilter {
        role: query.role.map(|r| r.trim().to_lowercase()).filter(|r| !r.is_empty()),
        status: query.status.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty()),
    };

    let (rows, total) = UserRepository::new(state.db()).list(&filter, &page).await?;
    let users: Vec<UserListItem> = rows
        .into_iter()
        .map(|row| UserListItem {
            agent_profile: row.agent.as_ref().map(AgentSummary::from),
            user: row.user,
        })
        .collect();

    Ok(ok(
        "Data users berhasil diambil",
        json!({
            "users": users,
            "pagination": Pagination::new(page, total),
        }),
    ))
}

/// PUT /auth/users/{id} - Update a user (owner only).
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> ApiResult<Response> {
    require_owner(&state, &auth, "Hanya owner yang dapat mengubah user").await?;

    let users = UserRepository::new(state.db());
    if users.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found("User tidak ditemukan").into());
    }

    let mut input = UpdateUserInput::default();

    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::invalid_input("Name tidak boleh kosong").into());
        }
        input.name = Some(validate_name(&name)?);
    }

    if let Some(email) = payload.email {
        if email.trim().is_empty() {
            return Err(AppError::invalid_input("Email tidak boleh kosong").into());
        }
        let email = validate_email(&email)?;
        if users.email_taken(&email, Some(id)).await? {
            return Err(AppError::conflict("EMAIL_ALREADY_EXISTS", "Email sudah digunakan").into());
        }
        input.email = Some(email);
    }

    // An empty password leaves the current one in place.
    if let Some(password) = payload.password.filter(|p| !p.is_empty()) {
        validate_password(&password)?;
        input.password_hash = Some(hash_password(&password)?);
    }

    if let Some(role) = payload.role {
        input.role = Some(role.parse::<UserRole>()?);
    }

    if let Some(status) = payload.status {
        input.status = Some(status.parse::<AccountStatus>()?);
    }

    let user = users.update(id, input).await?;

    info!(user_id = user.id, updated_by = auth.user_id(), "User updated");

    Ok(ok("User berhasil diubah", user))
}

/// DELETE /auth/users/{id} - Delete another user (owner only).
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    require_owner(&state, &auth, "Hanya owner yang dapat menghapus user").await?;

    let users = UserRepository::new(state.db());
    if users.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found("User tidak ditemukan").into());
    }

    if id == auth.user_id() {
        return Err(AppError::validation(
            "SELF_DELETE_FORBIDDEN",
            "Tidak dapat menghapus akun sendiri",
        )
        .into());
    }

    users.delete(id).await?;

    info!(user_id = id, deleted_by = auth.user_id(), "User deleted");

    Ok(ok("User berhasil dihapus", serde_json::Value::Null))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{
        TestApp, agent_model, authed, body_json, count_row, mock, owner_model,
    };
    use axum::http::StatusCode;
    use brilink_db::entities::{agent_profiles, token_blacklist, users};
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn test_register_requires_fields() {
        let app = TestApp::new(mock());
        let res = app.post_json("/api/auth/register", None, json!({"name": "Budi"})).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], "MISSING_FIELDS");
    }

    #[tokio::test]
    async fn test_register_rejects_unknown_role() {
        let app = TestApp::new(mock());
        let res = app
            .post_json(
                "/api/auth/register",
                None,
                json!({"name": "Budi", "email": "budi@example.com", "password": "rahasia123", "role": "admin"}),
            )
            .await;
        assert_eq!(body_json(res).await["error"], "INVALID_ROLE");
    }

    #[tokio::test]
    async fn test_register_kasir_needs_owner_id() {
        let app = TestApp::new(mock());
        let res = app
            .post_json(
                "/api/auth/register",
                None,
                json!({"name": "Sari", "email": "sari@example.com", "password": "rahasia123", "role": "kasir"}),
            )
            .await;
        assert_eq!(body_json(res).await["error"], "MISSING_OWNER_ID");
    }

    #[tokio::test]
    async fn test_register_kasir_unknown_owner() {
        let app = TestApp::new(mock().append_query_results([Vec::<users::Model>::new()]));
        let res = app
            .post_json(
                "/api/auth/register",
                None,
                json!({"name": "Sari", "email": "sari@example.com", "password": "rahasia123", "role": "kasir", "owner_id": 999}),
            )
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res).await;
        assert_eq!(body["error"], "INVALID_OWNER");
        assert_eq!(body["message"], "Owner tidak ditemukan");
        assert!(!app.executed_sql().iter().any(|sql| sql.contains("INSERT")));
    }

    #[tokio::test]
    async fn test_register_kasir_owner_without_agent() {
        let app = TestApp::new(
            mock()
                .append_query_results([vec![owner_model(1)]])
                .append_query_results([Vec::<agent_profiles::Model>::new()]),
        );
        let res = app
            .post_json(
                "/api/auth/register",
                None,
                json!({"name": "Sari", "email": "sari@example.com", "password": "rahasia123", "role": "kasir", "owner_id": 1}),
            )
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], "OWNER_NO_AGENT");
        assert!(!app.executed_sql().iter().any(|sql| sql.contains("INSERT")));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let app = TestApp::new(mock().append_query_results([vec![count_row(1)]]));
        let res = app
            .post_json(
                "/api/auth/register",
                None,
                json!({"name": "Budi", "email": "Owner1@Example.com", "password": "rahasia123"}),
            )
            .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(res).await["error"], "EMAIL_ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn test_register_weak_password() {
        let app = TestApp::new(mock().append_query_results([vec![count_row(0)]]));
        let res = app
            .post_json(
                "/api/auth/register",
                None,
                json!({"name": "Budi", "email": "budi@example.com", "password": "short"}),
            )
            .await;
        assert_eq!(body_json(res).await["error"], "WEAK_PASSWORD");
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_request() {
        let app = TestApp::new(mock());
        let res = app.post_raw("/api/auth/login", "{not json").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let app = TestApp::new(mock().append_query_results([Vec::<users::Model>::new()]));
        let res = app
            .post_json(
                "/api/auth/login",
                None,
                json!({"email": "nobody@example.com", "password": "rahasia123"}),
            )
            .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(res).await["error"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn test_login_success_returns_token() {
        let hash = brilink_core::auth::hash_password("rahasia123").unwrap();
        let user = users::Model {
            password: hash,
            ..owner_model(1)
        };
        let app = TestApp::new(mock().append_query_results([vec![user]]));
        let res = app
            .post_json(
                "/api/auth/login",
                None,
                json!({"email": "OWNER1@example.com", "password": "rahasia123"}),
            )
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["message"], "Login berhasil");
        assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(body["data"]["user"].get("password").is_none());
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected() {
        let app = TestApp::new(mock());
        let res = app.get("/api/auth/users", None).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(res).await["error"], "MISSING_TOKEN");
    }

    #[tokio::test]
    async fn test_revoked_token_is_rejected() {
        let revoked = token_blacklist::Model {
            id: 1,
            token: "digest".into(),
            user_id: 1,
            blacklisted_at: Utc::now().into(),
            expires_at: Utc::now().into(),
        };
        let app = TestApp::new(mock().append_query_results([vec![revoked]]));
        let token = app.token(1);
        let res = app.get("/api/auth/users", Some(&token)).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(res).await;
        assert_eq!(body["error"], "INVALID_TOKEN");
        assert_eq!(body["message"], "Token sudah logout");
    }

    #[tokio::test]
    async fn test_logout_twice_conflicts() {
        let revoked = token_blacklist::Model {
            id: 1,
            token: "digest".into(),
            user_id: 1,
            blacklisted_at: Utc::now().into(),
            expires_at: Utc::now().into(),
        };
        let app = TestApp::new(
            mock()
                .append_query_results([vec![owner_model(1)]])
                .append_query_results([vec![revoked]]),
        );
        let token = app.token(1);
        let res = app.post_json("/api/auth/logout", Some(&token), json!({})).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(res).await["error"], "TOKEN_ALREADY_BLACKLISTED");
    }

    #[tokio::test]
    async fn test_delete_self_is_forbidden() {
        let app = TestApp::new(
            authed()
                .append_query_results([vec![owner_model(1)]])
                .append_query_results([vec![owner_model(1)]]),
        );
        let token = app.token(1);
        let res = app.delete("/api/auth/users/1", &token).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], "SELF_DELETE_FORBIDDEN");
    }

    #[tokio::test]
    async fn test_kasir_cannot_update_users() {
        let app = TestApp::new(
            authed().append_query_results([vec![crate::routes::test_support::kasir_model(2, 10)]]),
        );
        let token = app.token(2);
        let res = app
            .put_json("/api/auth/users/1", Some(&token), json!({"name": "Baru"}))
            .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(res).await["message"], "Hanya owner yang dapat mengubah user");
    }

    #[tokio::test]
    async fn test_users_list_attaches_agent() {
        let listed = users::Model {
            agent_profile_id: Some(10),
            ..owner_model(1)
        };
        let app = TestApp::new(
            authed()
                .append_query_results([vec![owner_model(1)]])
                .append_query_results([vec![count_row(1)]])
                .append_query_results([vec![listed]])
                .append_query_results([vec![agent_model(10, 1)]]),
        );
        let token = app.token(1);
        let res = app.get("/api/auth/users?per_page=10", Some(&token)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["data"]["users"][0]["agent_profile"]["id"], 10);
        assert!(body["data"]["users"][0].get("password").is_none());
        assert_eq!(body["data"]["pagination"]["total_items"], 1);
        assert_eq!(body["data"]["pagination"]["per_page"], 10);
    }
}
