//! Configuration module
//!
//! Loads configuration from environment variables. Everything the command
//! handlers need is collected into [`BotConfig`] and passed in explicitly.

use std::collections::BTreeSet;
use std::env;

use chrono::{FixedOffset, Offset, Utc};

use crate::domain::{Cents, PartyId};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Seconds to wait when acquiring a database connection
    pub database_connect_timeout_secs: u64,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Hex SHA-256 of the key the chat gateway sends in `X-API-Key`
    pub api_key_hash: String,

    /// Bot command settings
    pub bot: BotConfig,
}

/// Settings consumed by the command handlers
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    pub wifi_name: Option<String>,
    pub wifi_password: Option<String>,

    /// The two ledger partners
    pub partner_ids: BTreeSet<PartyId>,

    pub rent: Option<RentConfig>,

    /// Offset used to interpret reminder dates and times
    pub reminder_offset: FixedOffset,
}

/// Monthly rent split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentConfig {
    pub monthly_rent: Cents,
    /// Partner who pays the landlord and is owed the other share
    pub payer_id: PartyId,
    /// Percentage of the rent owed by the non-payer
    pub split_percent: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?;
        let database_connect_timeout_secs = parse_or(&lookup, "DATABASE_CONNECT_TIMEOUT_SECS", 10)?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or(&lookup, "PORT", 3000)?;
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let api_key_hash = lookup("COMMAND_API_KEY_HASH")
            .ok_or(ConfigError::MissingEnv("COMMAND_API_KEY_HASH"))?
            .trim()
            .to_lowercase();
        if api_key_hash.len() != 64 || !api_key_hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::InvalidValue("COMMAND_API_KEY_HASH"));
        }

        Ok(Self {
            database_url,
            database_max_connections,
            database_connect_timeout_secs,
            host,
            port,
            environment,
            api_key_hash,
            bot: BotConfig::from_lookup(lookup)?,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl BotConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        // Entries that are not plain numbers are skipped
        let partner_ids: BTreeSet<PartyId> = lookup("PARTNER_IDS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|part| part.trim().parse::<i64>().ok())
            .map(PartyId)
            .collect();

        // The ledger is two-party: either no partners or exactly two
        if !partner_ids.is_empty() && partner_ids.len() != 2 {
            return Err(ConfigError::InvalidValue("PARTNER_IDS"));
        }

        let rent = match (non_blank("MONTHLY_RENT_CENTS"), non_blank("RENT_PAYER_ID")) {
            (Some(rent), Some(payer)) => {
                let cents = rent
                    .parse::<i64>()
                    .map_err(|_| ConfigError::InvalidValue("MONTHLY_RENT_CENTS"))?;
                let monthly_rent =
                    Cents::new(cents).map_err(|_| ConfigError::InvalidValue("MONTHLY_RENT_CENTS"))?;
                let payer_id = payer
                    .parse::<i64>()
                    .map(PartyId)
                    .map_err(|_| ConfigError::InvalidValue("RENT_PAYER_ID"))?;
                let split_percent: u32 = parse_or(&lookup, "RENT_SPLIT_PERCENT", 50)?;
                if split_percent == 0 || split_percent > 100 {
                    return Err(ConfigError::InvalidValue("RENT_SPLIT_PERCENT"));
                }
                Some(RentConfig {
                    monthly_rent,
                    payer_id,
                    split_percent,
                })
            }
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingEnv("RENT_PAYER_ID")),
            (None, Some(_)) => return Err(ConfigError::MissingEnv("MONTHLY_RENT_CENTS")),
        };

        let offset_minutes: i32 = parse_or(&lookup, "REMINDER_UTC_OFFSET_MINUTES", 0)?;
        let reminder_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidValue("REMINDER_UTC_OFFSET_MINUTES"))?;

        Ok(Self {
            wifi_name: non_blank("WIFI_NAME"),
            wifi_password: non_blank("WIFI_PASSWORD"),
            partner_ids,
            rent,
            reminder_offset,
        })
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            wifi_name: None,
            wifi_password: None,
            partner_ids: BTreeSet::new(),
            rent: None,
            reminder_offset: Utc.fix(),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key)),
        None => Ok(default),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
