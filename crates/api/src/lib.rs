//! HTTP surface of the tap game: page models, session endpoints, tap API.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
