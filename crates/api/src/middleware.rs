use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use cryptotasks_core::{SessionKey, SessionToken};

use crate::app::services::AppServices;
use crate::context::SessionContext;

/// Page routes that count as a visit. API endpoints are not tracked.
pub const TRACKED_PAGES: &[&str] = &[
    "/",
    "/account",
    "/tap",
    "/contacts",
    "/login",
    "/register",
    "/info",
];

/// Attach a `SessionContext` built from the `Authorization: Bearer` header.
///
/// A missing or malformed token yields an anonymous context; handlers decide
/// whether that is acceptable.
pub async fn session_middleware(mut req: Request, next: Next) -> Response {
    let token = extract_bearer(req.headers()).and_then(|t| t.parse::<SessionToken>().ok());
    req.extensions_mut().insert(SessionContext::new(token));
    next.run(req).await
}

/// Count the visit in the registry when the path is a tracked page.
pub async fn track_visits(
    State(services): State<Arc<AppServices>>,
    req: Request,
    next: Next,
) -> Response {
    if TRACKED_PAGES.contains(&req.uri().path()) {
        services.visitors().track_visit(visitor_key(&req));
    }
    next.run(req).await
}

/// Visitor identity is the peer IP. Requests served without connect info
/// (e.g. in-process test calls) share one key.
fn visitor_key(req: &Request) -> SessionKey {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| SessionKey::from(addr.ip()))
        .unwrap_or_else(|| SessionKey::new("unknown"))
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
