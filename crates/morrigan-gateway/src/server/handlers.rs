//! HTTP handlers for the gateway server

use std::sync::Arc;

use axum::{extract::State, response::Json};
use morrigan_core::OpenApiFragment;
use serde::Serialize;
use tracing::debug;

use crate::core_api::CoreApi;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub name: String,
    pub version: String,
    pub instance: String,
    pub uptime_secs: i64,
}

/// Health check endpoint (public)
pub async fn health(State(core): State<Arc<CoreApi>>) -> Json<HealthResponse> {
    debug!("[Gateway] Health check");
    let info = &core.env().server_info;
    Json(HealthResponse {
        status: "ok".to_string(),
        name: info.name.clone(),
        version: info.version.clone(),
        instance: info.id.to_string(),
        uptime_secs: info.uptime_secs(),
    })
}

/// Collected provider documentation fragments, unmerged, in registry order (public)
pub async fn openapi_fragments(State(core): State<Arc<CoreApi>>) -> Json<Vec<OpenApiFragment>> {
    Json(core.openapi().to_vec())
}
