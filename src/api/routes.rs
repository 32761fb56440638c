//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{PartyId, ScopeId};
use crate::error::AppError;
use crate::handlers::{net_message, AmountInput, CommandInvocation, CommandResponse};
use crate::ledger::{LedgerEntry, NewLedgerEntry, Window};

use super::middleware::RequestContext;
use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordEntryRequest {
    pub creditor_id: PartyId,
    pub debtor_id: PartyId,
    pub amount: AmountInput,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordEntryResponse {
    pub entry: LedgerEntry,
    /// Creditor's net against the debtor after this entry
    pub net_cents: i64,
}

#[derive(Debug, Deserialize)]
pub struct EntriesQuery {
    pub party_a: PartyId,
    pub party_b: PartyId,
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntriesResponse {
    pub scope_id: ScopeId,
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
    pub entries: Vec<LedgerEntry>,
}

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub me_id: PartyId,
    pub partner_id: PartyId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub scope_id: ScopeId,
    pub me_id: PartyId,
    pub partner_id: PartyId,
    pub net_cents: i64,
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SettleResponse {
    pub scope_id: ScopeId,
    pub rows_settled: u64,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        // Slash commands from the chat gateway
        .route("/commands", post(run_command))
        // Ledger operations
        .route("/scopes/:scope_id/entries", post(record_entry).get(list_entries))
        .route("/scopes/:scope_id/balance", get(get_balance))
        .route("/scopes/:scope_id/settle", post(settle))
}

// =========================================================================
// POST /commands
// =========================================================================

/// Run one slash command
async fn run_command(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Json(invocation): Json<CommandInvocation>,
) -> Result<Json<CommandResponse>, AppError> {
    let command = invocation.command.name();
    let response = state.dispatcher.dispatch(invocation).await;

    if let Err(e) = &response {
        tracing::warn!(
            command = command,
            correlation_id = %context.correlation_id,
            error = %e,
            "Command failed"
        );
    }

    Ok(Json(response?))
}

// =========================================================================
// POST /scopes/:scope_id/entries
// =========================================================================

/// Record a transaction; the amount is rounded half-up to cents here
async fn record_entry(
    State(state): State<AppState>,
    Path(scope_id): Path<ScopeId>,
    Json(request): Json<RecordEntryRequest>,
) -> Result<(StatusCode, Json<RecordEntryResponse>), AppError> {
    let amount = request.amount.to_cents()?;
    let entry = NewLedgerEntry::new(
        scope_id,
        request.creditor_id,
        request.debtor_id,
        amount.value(),
        request.note,
    )?;

    let (entry, net_cents) = state.ledger.append_with_balance(entry).await?;

    Ok((
        StatusCode::CREATED,
        Json(RecordEntryResponse { entry, net_cents }),
    ))
}

// =========================================================================
// GET /scopes/:scope_id/entries
// =========================================================================

/// Entries between two parties; defaults to the current month
async fn list_entries(
    State(state): State<AppState>,
    Path(scope_id): Path<ScopeId>,
    Query(query): Query<EntriesQuery>,
) -> Result<Json<EntriesResponse>, AppError> {
    let month = Window::current_month(Utc::now());
    let window = Window::new(
        query.since.unwrap_or(month.since),
        query.until.unwrap_or(month.until),
    );

    if window.since >= window.until {
        return Err(AppError::InvalidRequest(
            "since must be earlier than until".to_string(),
        ));
    }

    let entries = state
        .ledger
        .list_between(scope_id, query.party_a, query.party_b, window)
        .await?;

    Ok(Json(EntriesResponse {
        scope_id,
        since: window.since,
        until: window.until,
        entries,
    }))
}

// =========================================================================
// GET /scopes/:scope_id/balance
// =========================================================================

/// Net balance of `me_id` against `partner_id`
async fn get_balance(
    State(state): State<AppState>,
    Path(scope_id): Path<ScopeId>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceResponse>, AppError> {
    let net_cents = state
        .engine
        .net_balance(scope_id, query.me_id, query.partner_id)
        .await?;

    Ok(Json(BalanceResponse {
        scope_id,
        me_id: query.me_id,
        partner_id: query.partner_id,
        net_cents,
        summary: net_message(net_cents),
    }))
}

// =========================================================================
// POST /scopes/:scope_id/settle
// =========================================================================

/// Close the accounting period for a scope
async fn settle(
    State(state): State<AppState>,
    Path(scope_id): Path<ScopeId>,
) -> Result<Json<SettleResponse>, AppError> {
    let rows_settled = state.ledger.settle_all(scope_id).await?;

    Ok(Json(SettleResponse {
        scope_id,
        rows_settled,
    }))
}
