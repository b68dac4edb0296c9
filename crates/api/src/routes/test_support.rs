//! Router test harness over SeaORM's mock database.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use brilink_db::entities::{
    agent_profiles, edc_machines, services, token_blacklist, transactions, users,
};
use brilink_shared::{JwtService, jwt::JwtConfig};
use chrono::{DateTime, FixedOffset};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sea_orm::{
    DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult,
    prelude::DateTimeWithTimeZone,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::{AppState, Settings, create_router};

/// A router wired to a mock database.
pub struct TestApp {
    router: Router,
    jwt: Arc<JwtService>,
    db: DatabaseConnection,
}

impl TestApp {
    pub fn new(db: MockDatabase) -> Self {
        Self::with_settings(db, Settings::default())
    }

    pub fn with_settings(db: MockDatabase, settings: Settings) -> Self {
        let jwt = Arc::new(JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            token_expiry_hours: 1,
        }));
        let db = db.into_connection();
        let state = AppState {
            db: Arc::new(db.clone()),
            jwt_service: jwt.clone(),
            settings: Arc::new(settings),
        };
        Self {
            router: create_router(state),
            jwt,
            db,
        }
    }

    /// Debug text of every statement the handlers ran so far.
    pub fn executed_sql(&self) -> Vec<String> {
        self.db
            .clone()
            .into_transaction_log()
            .iter()
            .map(|t| format!("{t:?}"))
            .collect()
    }

    pub fn token(&self, user_id: i64) -> String {
        self.jwt
            .generate_token(user_id, &format!("user{user_id}@example.com"))
            .unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.send(request("GET", uri, token, Body::empty())).await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> Response<Body> {
        self.send(request("POST", uri, token, Body::from(body.to_string())))
            .await
    }

    pub async fn put_json(&self, uri: &str, token: Option<&str>, body: Value) -> Response<Body> {
        self.send(request("PUT", uri, token, Body::from(body.to_string())))
            .await
    }

    pub async fn post_raw(&self, uri: &str, body: &'static str) -> Response<Body> {
        self.send(request("POST", uri, None, Body::from(body))).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(request("DELETE", uri, Some(token), Body::empty()))
            .await
    }
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(body).unwrap()
}

pub async fn body_json(res: Response<Body>) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(res: Response<Body>) -> Vec<u8> {
    res.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub fn mock() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

/// Mock database whose first query answers the revocation check.
pub fn authed() -> MockDatabase {
    mock().append_query_results([Vec::<token_blacklist::Model>::new()])
}

/// Row answering a `count()` query.
pub fn count_row(n: i64) -> BTreeMap<&'static str, sea_orm::Value> {
    BTreeMap::from([("num_items", sea_orm::Value::from(n))])
}

pub fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

pub fn ts() -> DateTimeWithTimeZone {
    DateTime::<FixedOffset>::parse_from_rfc3339("2026-01-05T09:30:00+07:00").unwrap()
}

pub fn owner_model(id: i64) -> users::Model {
    users::Model {
        id,
        name: format!("Owner {id}"),
        email: format!("owner{id}@example.com"),
        password: "$argon2id$placeholder".to_string(),
        role: "owner".to_string(),
        status: "active".to_string(),
        agent_profile_id: None,
        created_at: ts(),
        updated_at: ts(),
    }
}

pub fn kasir_model(id: i64, agent_id: i64) -> users::Model {
    users::Model {
        name: format!("Kasir {id}"),
        email: format!("kasir{id}@example.com"),
        role: "kasir".to_string(),
        agent_profile_id: Some(agent_id),
        ..owner_model(id)
    }
}

pub fn agent_model(id: i64, user_id: i64) -> agent_profiles::Model {
    agent_profiles::Model {
        id,
        user_id,
        owner_id: Some(user_id),
        agent_name: format!("Agent {id}"),
        address: None,
        phone: None,
        total_balance: Decimal::ZERO,
        logo: None,
        created_at: ts(),
        updated_at: ts(),
    }
}

pub fn edc_model(id: i64, saldo: Decimal) -> edc_machines::Model {
    edc_machines::Model {
        id,
        agent_profile_id: None,
        name: format!("EDC {id}"),
        bank_name: "BRI".to_string(),
        account_number: None,
        saldo,
        status: "active".to_string(),
        created_at: ts(),
        updated_at: ts(),
    }
}

pub fn service_model(id: i64, category: Option<&str>) -> services::Model {
    services::Model {
        id,
        name: format!("Service {id}"),
        requires_target: false,
        category: category.map(ToString::to_string),
        description: None,
        created_at: ts(),
        updated_at: ts(),
    }
}

pub fn transaction_model(id: i64, agent_id: Option<i64>, amount: Decimal) -> transactions::Model {
    transactions::Model {
        id,
        transaction_number: format!("TRX-{id:012}"),
        edc_machine_id: 1,
        service_id: 1,
        agent_profile_id: agent_id,
        user_id: 1,
        cashier_name: Some("Owner 1".to_string()),
        customer_name: None,
        target_number: None,
        reference_number: None,
        amount,
        service_fee: Decimal::from(2500),
        bank_fee: Decimal::from(1000),
        extra_fee: Decimal::ZERO,
        net_profit: amount,
        created_at: ts(),
        updated_at: ts(),
    }
}
