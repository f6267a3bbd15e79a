//! Page models for the HTML pages.
//!
//! Templates are rendered elsewhere; these handlers return the data each page
//! is rendered from.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    response::IntoResponse,
};

use cryptotasks_core::task::TaskStatus;
use cryptotasks_core::sample_tasks;
use cryptotasks_infra::AccountView;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SessionContext;

fn account_view(services: &AppServices, session: &SessionContext) -> Option<AccountView> {
    session.token().and_then(|t| services.ledger().account(t).ok())
}

pub async fn home(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> impl IntoResponse {
    let view = account_view(&services, &session);
    let tasks = sample_tasks();
    let active_tasks = tasks.iter().filter(|t| t.status == TaskStatus::Available).count();
    let tap_balance = services.ledger().current_balance();

    let (user, total_balance) = match &view {
        Some(v) => (Some(dto::user_to_json(&v.user)), v.user.balance + v.pool_balance),
        None => (None, rust_decimal::Decimal::ZERO),
    };

    Json(serde_json::json!({
        "title": "CryptoTasks - Earn Easy Coin",
        "logged_in": view.is_some(),
        "is_guest": view.is_none(),
        "user": user,
        "tasks": tasks,
        "stats": {
            "total_users": services.ledger().user_count(),
            "active_tasks": active_tasks,
            "online_now": services.visitors().snapshot().online_now,
        },
        "tap_balance": dto::amount(tap_balance),
        "total_balance": dto::amount(total_balance),
    }))
}

pub async fn account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let Some(view) = account_view(&services, &session) else {
        return errors::redirect("/login");
    };
    let user = &view.user;

    Json(serde_json::json!({
        "title": "My account - CryptoTasks",
        "user": dto::user_to_json(user),
        "stats": {
            "total_earned": dto::amount(user.total_earned),
            "tasks_completed": user.completed,
            "success_rate": user.success_rate,
            "current_streak": user.current_streak,
            "referrals": user.referrals,
        },
        "is_guest": false,
    }))
    .into_response()
}

pub async fn tap(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let Some(view) = account_view(&services, &session) else {
        return errors::redirect("/login");
    };

    Json(serde_json::json!({
        "title": "Easy Coin tapper - CryptoTasks",
        "balance": dto::amount(view.pool_balance),
        "user": dto::user_to_json(&view.user),
    }))
    .into_response()
}

pub async fn contacts(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let cfg = services.config();
    Json(serde_json::json!({
        "title": "Contacts - CryptoTasks",
        "email": cfg.support_email,
        "telegram": cfg.support_telegram,
    }))
}

pub async fn login(Query(query): Query<dto::PageErrorQuery>) -> impl IntoResponse {
    Json(serde_json::json!({
        "title": "Log in - CryptoTasks",
        "has_error": query.error.as_deref() == Some("1"),
    }))
}

pub async fn register(Query(query): Query<dto::PageErrorQuery>) -> impl IntoResponse {
    Json(serde_json::json!({
        "title": "Sign up - CryptoTasks",
        "has_error": query.error.is_some(),
        "error": query.error,
    }))
}

pub async fn info() -> impl IntoResponse {
    Json(serde_json::json!({ "title": "Easy Coin - About" }))
}
