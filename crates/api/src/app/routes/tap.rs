use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};

use cryptotasks_core::DomainError;

use crate::app::dto;
use crate::app::services::AppServices;
use crate::context::SessionContext;

/// Tap once. Failures are reported in the body with status 200 so the game
/// client can show the message inline.
pub async fn tap_action(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let outcome = match session.token() {
        Some(token) => services.ledger().tap(token),
        None => Err(DomainError::Unauthenticated),
    };

    match outcome {
        Ok(balance) => Json(dto::tap_success(balance)).into_response(),
        Err(e) => Json(dto::tap_failure(e.to_string())).into_response(),
    }
}

pub async fn get_balance(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(serde_json::json!({ "balance": dto::amount(services.ledger().current_balance()) }))
}

pub async fn reset_balance(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let admin = match crate::authz::require_admin(&services, &session) {
        Ok(name) => name,
        Err(resp) => return resp,
    };

    services.ledger().reset_pool();
    tracing::info!(admin = %admin, "tap pool reset via api");

    Json(serde_json::json!({ "success": true })).into_response()
}
