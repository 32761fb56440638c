//! Amount type
//!
//! Domain primitive for monetary amounts in minor currency units (cents).
//! Decimal input is rounded half-up to the nearest cent exactly once, here at
//! the boundary; the ledger only ever sees whole positive cents.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum single amount ($1,000,000.00)
const MAX_CENTS: i64 = 100_000_000;

/// Cents represents a validated, positive monetary value.
///
/// # Invariants
/// - Value is always positive (> 0)
/// - Maximum value is $1,000,000.00
///
/// # Example
/// ```
/// use stavid_bot::domain::Cents;
///
/// let amount: Cents = "23.505".parse().unwrap();
/// assert_eq!(amount.value(), 2351);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Cents(i64);

/// Errors that can occur when creating an amount
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must be at least one cent after rounding (got {0} cents)")]
    NotPositive(i64),

    #[error("Amount exceeds maximum allowed value ({})", format_money(MAX_CENTS))]
    Overflow,

    #[error("Invalid amount format: {0}")]
    ParseError(String),
}

impl Cents {
    /// Create a new amount from whole cents.
    ///
    /// # Errors
    /// - `AmountError::NotPositive` if value <= 0
    /// - `AmountError::Overflow` if value exceeds the maximum
    pub fn new(cents: i64) -> Result<Self, AmountError> {
        if cents <= 0 {
            return Err(AmountError::NotPositive(cents));
        }
        if cents > MAX_CENTS {
            return Err(AmountError::Overflow);
        }
        Ok(Self(cents))
    }

    /// Round a decimal currency value half-up to the nearest cent.
    pub fn from_decimal(value: Decimal) -> Result<Self, AmountError> {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let cents = rounded
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|c| c.to_i64())
            .ok_or(AmountError::Overflow)?;
        Self::new(cents)
    }

    /// Round a float currency value half-up to the nearest cent.
    ///
    /// The float goes through its shortest decimal representation first, so
    /// `23.5` is treated as exactly `23.50` rather than its binary expansion.
    pub fn from_f64(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::ParseError(value.to_string()));
        }
        let decimal = Decimal::from_str(&value.to_string())
            .map_err(|e| AmountError::ParseError(e.to_string()))?;
        Self::from_decimal(decimal)
    }

    /// Get the underlying number of cents.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Share of this amount in percent, rounded half-up to the nearest cent.
    pub fn percent(&self, percent: u32) -> Result<Cents, AmountError> {
        let share = Decimal::from(self.0) * Decimal::from(percent) / Decimal::ONE_HUNDRED;
        let cents = share
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or(AmountError::Overflow)?;
        Cents::new(cents)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_money(self.0))
    }
}

impl FromStr for Cents {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s
            .trim()
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',')
            .collect();
        let decimal = Decimal::from_str(&cleaned)
            .map_err(|e| AmountError::ParseError(format!("{s:?}: {e}")))?;
        Cents::from_decimal(decimal)
    }
}

impl TryFrom<i64> for Cents {
    type Error = AmountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Cents::new(value)
    }
}

impl From<Cents> for i64 {
    fn from(amount: Cents) -> Self {
        amount.0
    }
}

/// Format a signed number of cents as `$1,234.56` (`-$1,234.56` when negative).
pub fn format_money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = (abs / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{:02}", abs % 100)
}
