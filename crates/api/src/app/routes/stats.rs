use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};

use crate::app::dto;
use crate::app::services::AppServices;

/// Read-only snapshot of the visitor registry.
pub async fn visitor_stats(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(dto::visitor_stats_to_json(services.visitors().snapshot()))
}
