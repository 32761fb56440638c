//! API integration tests over in-memory stores

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

mod common;

use common::{send, test_app, ALICE, BOB, OUTSIDER, SERVER};

fn command(user: i64, body: Value) -> Value {
    json!({ "scope_id": SERVER.0, "user_id": user, "command": body })
}

#[tokio::test]
async fn test_health_needs_no_key() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_and_invalid_api_key() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/scopes/42/balance?me_id=1001&partner_id=1002")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/scopes/42/balance?me_id=1001&partner_id=1002")
                .header("X-API-Key", "wrong_key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_record_and_balance_e2e() {
    let app = test_app();

    // Alice paid $5.00 that Bob owes
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/scopes/42/entries",
        Some(json!({ "creditor_id": ALICE.0, "debtor_id": BOB.0, "amount": "5.00", "note": "lunch" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["entry"]["amount_cents"], 500);
    assert_eq!(body["entry"]["settled"], false);
    assert_eq!(body["net_cents"], 500);

    // Bob paid $2.00 back
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/scopes/42/entries",
        Some(json!({ "creditor_id": BOB.0, "debtor_id": ALICE.0, "amount": 2.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    // Read back from Bob's side as creditor
    assert_eq!(body["net_cents"], -300);

    let (status, body) = send(&app, "GET", "/api/v1/scopes/42/balance?me_id=1001&partner_id=1002", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["net_cents"], 300);
    assert_eq!(body["summary"], "💰 You're owed **$3.00**");

    let (_, body) = send(&app, "GET", "/api/v1/scopes/42/balance?me_id=1002&partner_id=1001", None).await;
    assert_eq!(body["net_cents"], -300);

    // Another scope is untouched
    let (_, body) = send(&app, "GET", "/api/v1/scopes/7/balance?me_id=1001&partner_id=1002", None).await;
    assert_eq!(body["net_cents"], 0);
}

#[tokio::test]
async fn test_record_rounds_half_up_once() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/scopes/42/entries",
        Some(json!({ "creditor_id": ALICE.0, "debtor_id": BOB.0, "amount": "10.005" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["entry"]["amount_cents"], 1001);
}

#[tokio::test]
async fn test_record_rejects_sub_cent_amount() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/scopes/42/entries",
        Some(json!({ "creditor_id": ALICE.0, "debtor_id": BOB.0, "amount": "0.001" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_amount");

    // Nothing persisted
    let (_, body) = send(&app, "GET", "/api/v1/scopes/42/entries?party_a=1001&party_b=1002", None).await;
    assert_eq!(body["entries"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_record_rejects_same_party() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/scopes/42/entries",
        Some(json!({ "creditor_id": ALICE.0, "debtor_id": ALICE.0, "amount": "1.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "same_party");
}

#[tokio::test]
async fn test_settle_clears_balance_and_keeps_history() {
    let app = test_app();

    send(
        &app,
        "POST",
        "/api/v1/scopes/42/entries",
        Some(json!({ "creditor_id": ALICE.0, "debtor_id": BOB.0, "amount": "12.34" })),
    )
    .await;

    let (status, body) = send(&app, "POST", "/api/v1/scopes/42/settle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows_settled"], 1);

    // Idempotent
    let (_, body) = send(&app, "POST", "/api/v1/scopes/42/settle", None).await;
    assert_eq!(body["rows_settled"], 0);

    let (_, body) = send(&app, "GET", "/api/v1/scopes/42/balance?me_id=1001&partner_id=1002", None).await;
    assert_eq!(body["net_cents"], 0);
    assert_eq!(body["summary"], "✅ All square");

    // Settled entries stay listed with their flag
    let (_, body) = send(&app, "GET", "/api/v1/scopes/42/entries?party_a=1002&party_b=1001", None).await;
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["settled"], true);

    // New entries count again
    send(
        &app,
        "POST",
        "/api/v1/scopes/42/entries",
        Some(json!({ "creditor_id": BOB.0, "debtor_id": ALICE.0, "amount": "1" })),
    )
    .await;
    let (_, body) = send(&app, "GET", "/api/v1/scopes/42/balance?me_id=1001&partner_id=1002", None).await;
    assert_eq!(body["net_cents"], -100);
}

#[tokio::test]
async fn test_list_entries_window() {
    let app = test_app();

    send(
        &app,
        "POST",
        "/api/v1/scopes/42/entries",
        Some(json!({ "creditor_id": ALICE.0, "debtor_id": BOB.0, "amount": "1.00", "note": "first" })),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/v1/scopes/42/entries",
        Some(json!({ "creditor_id": BOB.0, "debtor_id": ALICE.0, "amount": "2.00", "note": "second" })),
    )
    .await;

    // Default window is the current month, ascending order
    let (status, body) = send(&app, "GET", "/api/v1/scopes/42/entries?party_a=1001&party_b=1002", None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["note"], "first");
    assert_eq!(entries[1]["note"], "second");

    // A past window excludes everything
    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/scopes/42/entries?party_a=1001&party_b=1002&since=2020-01-01T00:00:00Z&until=2020-02-01T00:00:00Z",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["entries"].as_array().unwrap().is_empty());

    // Inverted window is rejected
    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/scopes/42/entries?party_a=1001&party_b=1002&since=2020-02-01T00:00:00Z&until=2020-01-01T00:00:00Z",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_request");
}

#[tokio::test]
async fn test_commands_venmo_then_balance() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/commands",
        Some(command(ALICE.0, json!({ "name": "venmo", "amount": "25.50", "note": "groceries" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ephemeral"], false);
    assert!(body["content"].as_str().unwrap().contains("$25.50"));

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/commands",
        Some(command(BOB.0, json!({ "name": "balance" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ephemeral"], true);
    assert!(body["content"].as_str().unwrap().contains("You owe **$25.50**"));
}

#[tokio::test]
async fn test_commands_rent_uses_configured_split() {
    let app = test_app();

    let (status, _) = send(&app, "POST", "/api/v1/commands", Some(command(BOB.0, json!({ "name": "rent" })))).await;
    assert_eq!(status, StatusCode::OK);

    // Alice pays the landlord, Bob owes half of $2,000.00
    let (_, body) = send(&app, "GET", "/api/v1/scopes/42/balance?me_id=1001&partner_id=1002", None).await;
    assert_eq!(body["net_cents"], 100_000);
}

#[tokio::test]
async fn test_commands_error_codes() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/commands",
        Some(command(OUTSIDER.0, json!({ "name": "balance" }))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "partner_unresolved");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/commands",
        Some(command(ALICE.0, json!({ "name": "pay", "amount": "-3" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_amount");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/commands",
        Some(command(ALICE.0, json!({ "name": "remind", "date": "tomorrow", "note": "trash" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_schedule");
}

#[tokio::test]
async fn test_commands_reminder_lifecycle() {
    let app = test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/commands",
        Some(command(
            ALICE.0,
            json!({ "name": "remind", "date": "2030-05-01", "time": "18:30", "note": "dinner", "location": "Luigi's" }),
        )),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "POST", "/api/v1/commands", Some(command(BOB.0, json!({ "name": "reminders" })))).await;
    let description = body["embeds"][0]["description"].as_str().unwrap();
    assert!(description.contains("dinner"));

    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/commands",
        Some(command(BOB.0, json!({ "name": "reset_reminders" }))),
    )
    .await;
    assert!(body["content"].as_str().unwrap().contains("Marked 1 reminder"));
}

#[tokio::test]
async fn test_wifi_is_private() {
    let app = test_app();

    let (status, body) = send(&app, "POST", "/api/v1/commands", Some(command(OUTSIDER.0, json!({ "name": "wifi" })))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ephemeral"], true);
    assert!(body["content"].as_str().unwrap().contains("HomeNet"));
}
