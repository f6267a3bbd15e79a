use std::sync::Arc;

use axum::{Form, extract::Extension};

use cryptotasks_core::DomainError;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SessionContext;

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Form(form): Form<dto::LoginForm>,
) -> axum::response::Response {
    match services.ledger().authenticate(&form.username, &form.password) {
        Ok(token) => errors::redirect_with_session("/account", token),
        Err(_) => errors::redirect("/login?error=1"),
    }
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Form(form): Form<dto::RegisterForm>,
) -> axum::response::Response {
    match services.ledger().register(&form.username) {
        Ok(token) => errors::redirect_with_session("/account", token),
        Err(DomainError::DuplicateUser(_)) => errors::redirect("/register?error=exists"),
        Err(DomainError::Validation(_)) => errors::redirect("/register?error=invalid"),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    if let Some(token) = session.token() {
        services.ledger().logout(token);
    }
    errors::redirect("/")
}
