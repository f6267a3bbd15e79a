//! Player account record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Starting balance granted on registration.
pub const REGISTRATION_BONUS: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Amount credited by a single tap.
pub const TAP_QUANTUM: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

const STARTING_LEVEL: u32 = 1;
const STARTING_RANK: &str = "Newcomer";

/// A registered player.
///
/// Field names match the persisted `data.json` layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub completed: u32,
    pub member_since: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default = "default_rank")]
    pub rank: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_earned: Decimal,
    pub success_rate: u32,
    pub current_streak: u32,
    pub referrals: u32,
    pub is_guest: bool,
}

fn default_level() -> u32 {
    STARTING_LEVEL
}

fn default_rank() -> String {
    STARTING_RANK.to_string()
}

impl User {
    /// Build a freshly registered user holding the registration bonus.
    pub fn register(username: impl Into<String>, now: DateTime<Utc>) -> DomainResult<Self> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(DomainError::validation("username must not be empty"));
        }

        Ok(Self {
            username,
            balance: REGISTRATION_BONUS,
            completed: 0,
            member_since: now.format("%d %B %Y").to_string(),
            level: STARTING_LEVEL,
            rank: STARTING_RANK.to_string(),
            total_earned: REGISTRATION_BONUS,
            success_rate: 0,
            current_streak: 0,
            referrals: 0,
            is_guest: false,
        })
    }

    /// Record one tap in the user's lifetime earnings.
    pub fn credit_tap(&mut self) {
        self.total_earned += TAP_QUANTUM;
    }
}
