use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;

use cryptotasks_core::User;
use cryptotasks_infra::VisitorSnapshot;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `password` and `email` are accepted but not stored.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    pub password: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageErrorQuery {
    pub error: Option<String>,
}

// -------------------------
// JSON mapping
// -------------------------

/// Amounts are shown with two decimals.
pub fn amount(value: Decimal) -> f64 {
    value.round_dp(2).to_f64().unwrap_or_default()
}

pub fn user_to_json(u: &User) -> serde_json::Value {
    serde_json::json!({
        "username": u.username,
        "balance": amount(u.balance),
        "completed": u.completed,
        "member_since": u.member_since,
        "level": u.level,
        "rank": u.rank,
        "total_earned": amount(u.total_earned),
        "success_rate": u.success_rate,
        "current_streak": u.current_streak,
        "referrals": u.referrals,
        "is_guest": u.is_guest,
    })
}

pub fn visitor_stats_to_json(s: VisitorSnapshot) -> serde_json::Value {
    serde_json::json!({
        "total_visitors": s.total_visits,
        "unique_visitors": s.unique_visitors,
        "online_now": s.online_now,
        "active_sessions": s.live_sessions,
    })
}

pub fn tap_success(balance: Decimal) -> serde_json::Value {
    serde_json::json!({ "success": true, "balance": amount(balance) })
}

pub fn tap_failure(message: impl Into<String>) -> serde_json::Value {
    serde_json::json!({ "success": false, "message": message.into() })
}
