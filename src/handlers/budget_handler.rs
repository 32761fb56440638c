//! Budget Handler
//!
//! Shared expense ledger commands. Amounts are rounded to cents here,
//! before anything reaches the ledger store.

use std::sync::Arc;

use chrono::Utc;

use crate::config::RentConfig;
use crate::domain::{format_money, Cents, DomainError};
use crate::error::AppResult;
use crate::ledger::{BalanceEngine, LedgerEntry, LedgerStore, NetPosition, NewLedgerEntry, Window};

use super::partner::PartyContext;
use super::response::{capped_description, Choice, CommandResponse, Embed, COLOR_BLURPLE};
use super::AmountInput;

const RENT_NOTE: &str = "rent";

/// Handler for ledger commands
pub struct BudgetHandler {
    ledger: Arc<dyn LedgerStore>,
    engine: BalanceEngine,
    rent: Option<RentConfig>,
}

impl BudgetHandler {
    pub fn new(ledger: Arc<dyn LedgerStore>, rent: Option<RentConfig>) -> Self {
        Self {
            engine: BalanceEngine::new(ledger.clone()),
            ledger,
            rent,
        }
    }

    /// `/venmo`: log an expense the partner owes the invoker
    pub async fn venmo(
        &self,
        ctx: PartyContext,
        amount: &AmountInput,
        note: &str,
    ) -> AppResult<CommandResponse> {
        let (amount, net) = self.record_owed_to_me(ctx, amount, note).await?;

        Ok(CommandResponse::public(format!(
            "🧾 **Ledger Entry Created**\n**From:** {}\n**Amount:** {}\n**Note:** {}\n\n{}",
            ctx.partner.mention(),
            amount,
            note,
            net_message(net)
        )))
    }

    /// `/pay`: record a payment the invoker made to the partner
    pub async fn pay(
        &self,
        ctx: PartyContext,
        amount: &AmountInput,
        note: &str,
    ) -> AppResult<CommandResponse> {
        let (amount, net) = self.record_owed_to_me(ctx, amount, note).await?;

        Ok(CommandResponse::public(format!(
            "💵 **Payment Recorded**\n**Payer:** {}\n**Amount:** {}\n**Note:** {}\n\n{}",
            ctx.me.mention(),
            amount,
            note,
            net_message(net)
        )))
    }

    /// `/balance`
    pub async fn balance(&self, ctx: PartyContext) -> AppResult<CommandResponse> {
        let net = self
            .engine
            .net_balance(ctx.scope_id, ctx.me, ctx.partner)
            .await?;

        Ok(CommandResponse::private(format!(
            "📊 **Current Balance with {}:**\n{}",
            ctx.partner.mention(),
            net_message(net)
        )))
    }

    /// `/ledger`: itemized entries for the current month
    pub async fn ledger(&self, ctx: PartyContext) -> AppResult<CommandResponse> {
        let window = Window::current_month(Utc::now());
        let statement = self
            .engine
            .statement(ctx.scope_id, ctx.me, ctx.partner, window)
            .await?;

        let description = if statement.entries.is_empty() {
            format!("With {}\n\nNo entries this month.", ctx.partner.mention())
        } else {
            let mut lines = vec![format!("With {}", ctx.partner.mention()), String::new()];
            lines.extend(statement.entries.iter().map(|e| entry_line(e, ctx)));
            capped_description(&lines)
        };

        let embed = Embed::new("📒 Ledger (this month)", COLOR_BLURPLE)
            .description(description)
            .field("Net", net_message(statement.net_cents));

        Ok(CommandResponse::default().with_embed(embed).ephemeral())
    }

    /// `/rent`: log the non-payer's share of the monthly rent
    pub async fn rent(&self, ctx: PartyContext) -> AppResult<CommandResponse> {
        let rent = self
            .rent
            .ok_or_else(|| DomainError::not_configured("MONTHLY_RENT_CENTS / RENT_PAYER_ID"))?;

        let debtor = if rent.payer_id == ctx.me {
            ctx.partner
        } else if rent.payer_id == ctx.partner {
            ctx.me
        } else {
            return Err(DomainError::not_configured("RENT_PAYER_ID must be one of PARTNER_IDS").into());
        };

        let share = rent
            .monthly_rent
            .percent(rent.split_percent)
            .map_err(DomainError::from)?;
        let entry = NewLedgerEntry::new(ctx.scope_id, rent.payer_id, debtor, share.value(), RENT_NOTE)?;
        let (_, payer_net) = self.ledger.append_with_balance(entry).await?;

        // Read back from the payer's side; flip for the invoker
        let net = if rent.payer_id == ctx.me { payer_net } else { -payer_net };

        tracing::info!(
            scope_id = %ctx.scope_id,
            payer_id = %rent.payer_id,
            amount_cents = share.value(),
            "Rent logged"
        );

        Ok(CommandResponse::private(format!(
            "🏠 **Rent Logged**\n**Owed by:** {}\n**Amount:** {}\n\n{}",
            debtor.mention(),
            share,
            net_message(net)
        )))
    }

    /// `/settle`: close the accounting period for the whole scope
    pub async fn settle(&self, ctx: PartyContext) -> AppResult<CommandResponse> {
        let rows_settled = self.ledger.settle_all(ctx.scope_id).await?;

        Ok(CommandResponse::public(format!(
            "🧮 **Ledger Settled** by {}\nClosed {} {}. {}",
            ctx.me.mention(),
            rows_settled,
            if rows_settled == 1 { "entry" } else { "entries" },
            net_message(0)
        )))
    }

    /// Suggest paying off the current balance
    pub async fn suggest_payment(&self, ctx: PartyContext) -> AppResult<CommandResponse> {
        let net = self
            .engine
            .net_balance(ctx.scope_id, ctx.me, ctx.partner)
            .await?;

        let label = match NetPosition::from_cents(net) {
            NetPosition::Owed(_) => "they owe you",
            NetPosition::Owes(_) => "you owe them",
            NetPosition::Square => "all square",
        };
        let magnitude = net.saturating_abs();

        Ok(CommandResponse::default()
            .with_choices(vec![Choice {
                name: format!("{} ({})", format_money(magnitude), label),
                value: magnitude as f64 / 100.0,
            }])
            .ephemeral())
    }

    /// Append `me -> partner` and read back my net in one transaction
    async fn record_owed_to_me(
        &self,
        ctx: PartyContext,
        amount: &AmountInput,
        note: &str,
    ) -> AppResult<(Cents, i64)> {
        let amount = amount.to_cents()?;
        let entry = NewLedgerEntry::new(ctx.scope_id, ctx.me, ctx.partner, amount.value(), note)?;
        let (stored, net) = self.ledger.append_with_balance(entry).await?;

        tracing::info!(
            entry_id = stored.id,
            scope_id = %ctx.scope_id,
            creditor_id = %ctx.me,
            debtor_id = %ctx.partner,
            amount_cents = stored.amount_cents,
            "Ledger entry created"
        );

        Ok((amount, net))
    }
}

/// Human-readable net balance from the invoker's side
pub fn net_message(net_cents: i64) -> String {
    match NetPosition::from_cents(net_cents) {
        NetPosition::Owed(cents) => format!("💰 You're owed **{}**", format_money(cents)),
        NetPosition::Owes(cents) => format!("💸 You owe **{}**", format_money(cents)),
        NetPosition::Square => "✅ All square".to_string(),
    }
}

fn entry_line(entry: &LedgerEntry, ctx: PartyContext) -> String {
    let direction = if entry.creditor_id == ctx.me { "←" } else { "→" };
    let line = format!(
        "{} • {} {} {} | {} - {}",
        entry.created_at.format("%m/%d"),
        ctx.me.mention(),
        direction,
        ctx.partner.mention(),
        format_money(entry.amount_cents),
        entry.note
    );
    if entry.settled {
        format!("~~{line}~~")
    } else {
        line
    }
}
