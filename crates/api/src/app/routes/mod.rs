use axum::{
    Router,
    routing::{any, get, post},
};

pub mod pages;
pub mod session;
pub mod stats;
pub mod system;
pub mod tap;

/// Router for every page and API endpoint except `/health`.
pub fn router() -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/account", get(pages::account))
        .route("/tap", get(pages::tap))
        .route("/contacts", get(pages::contacts))
        .route("/login", get(pages::login))
        .route("/register", get(pages::register))
        .route("/info", get(pages::info))
        .route("/api/login", post(session::login))
        .route("/api/register", post(session::register))
        .route("/api/logout", any(session::logout))
        .route("/api/tap-action", post(tap::tap_action))
        .route("/api/get-balance", get(tap::get_balance))
        .route("/api/reset-balance", post(tap::reset_balance))
        .route("/api/stats", get(stats::visitor_stats))
}
