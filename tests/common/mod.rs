//! Common test utilities

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Offset, Utc};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::util::ServiceExt;
use uuid::Uuid;

use stavid_bot::api::{self, middleware::hash_api_key, AppState};
use stavid_bot::config::RentConfig;
use stavid_bot::ledger::InMemoryLedgerStore;
use stavid_bot::reminders::InMemoryReminderStore;
use stavid_bot::{db, BotConfig, Cents, PartyId, ScopeId};

pub const API_KEY: &str = "test_key_123";
pub const ALICE: PartyId = PartyId(1001);
pub const BOB: PartyId = PartyId(1002);
pub const OUTSIDER: PartyId = PartyId(9999);
pub const SERVER: ScopeId = ScopeId(42);

/// Bot settings with two partners and a $2,000.00 rent paid by Alice
pub fn test_bot_config() -> BotConfig {
    BotConfig {
        wifi_name: Some("HomeNet".to_string()),
        wifi_password: Some("hunter22".to_string()),
        partner_ids: BTreeSet::from([ALICE, BOB]),
        rent: Some(RentConfig {
            monthly_rent: Cents::new(200_000).expect("valid rent"),
            payer_id: ALICE,
            split_percent: 50,
        }),
        reminder_offset: Utc.fix(),
    }
}

/// Full application router backed by in-memory stores
pub fn test_app() -> Router {
    let state = AppState::new(
        test_bot_config(),
        hash_api_key(API_KEY),
        Arc::new(InMemoryLedgerStore::new()),
        Arc::new(InMemoryReminderStore::new()),
    );
    api::build_router(state)
}

/// Send a JSON request with the test API key
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-API-Key", API_KEY);

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

/// Random scope so concurrent tests never share ledger rows
pub fn random_scope() -> ScopeId {
    ScopeId((Uuid::new_v4().as_u128() as i64).wrapping_abs().max(1))
}

/// Connect to DATABASE_URL and ensure the schema; None when unset
pub async fn setup_test_db() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => {
            eprintln!("DATABASE_URL not set, skipping database test");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    // Parallel tests may race on CREATE TABLE; the schema check decides
    if let Err(e) = db::init_schema(&pool).await {
        eprintln!("init_schema raced: {e}");
    }
    assert!(
        db::check_schema(&pool).await.expect("Failed to check schema"),
        "schema incomplete"
    );

    Some(pool)
}
