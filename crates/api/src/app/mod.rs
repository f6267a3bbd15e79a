//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: owned state (ledger, visitor registry, sweeper)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            // Outermost first: session context, visit accounting, then state.
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::session_middleware))
                .layer(axum::middleware::from_fn_with_state(
                    services.clone(),
                    middleware::track_visits,
                ))
                .layer(Extension(services)),
        )
}
