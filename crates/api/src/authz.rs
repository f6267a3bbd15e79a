//! Authorization guard for privileged endpoints.
//!
//! The ledger itself performs no authorization; this is enforced at the HTTP
//! boundary before the operation runs.

use axum::http::StatusCode;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::SessionContext;

/// Resolve the session to a configured admin, or produce the error response.
///
/// - no session / unknown session: 401
/// - logged in but not an admin: 403
pub fn require_admin(
    services: &AppServices,
    session: &SessionContext,
) -> Result<String, axum::response::Response> {
    let username = session
        .token()
        .and_then(|t| services.ledger().identity(t))
        .ok_or_else(|| {
            errors::json_error(
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "authentication required",
            )
        })?;

    if !services.config().is_admin(&username) {
        return Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "admin privileges required",
        ));
    }

    Ok(username)
}
