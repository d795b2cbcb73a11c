//! Built-in status provider
//!
//! Reports server metadata and the loaded providers at `GET /<name>/status`,
//! and records start/stop events in its `provider_data` namespace.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::{response::Json, routing::get};
use morrigan_core::{OpenApiFragment, ProviderDeclaration};
use morrigan_storage::Database;
use serde::Serialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::info;

use super::{Provider, ProviderFactory, ProviderRouter, ShutdownHook};
use crate::environment::CoreEnvironment;
use crate::security::Core;

/// Module name the status factory is registered under.
pub const MODULE: &str = "status";

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub name: String,
    pub version: String,
    pub instance: String,
    pub uptime_secs: i64,
    pub providers: Vec<String>,
}

async fn status(Core(core): Core) -> Json<StatusResponse> {
    let providers = core
        .providers()
        .map(|registry| registry.names().into_iter().map(String::from).collect())
        .unwrap_or_default();

    Json(StatusResponse {
        name: core.server_info.name.clone(),
        version: core.server_info.version.clone(),
        instance: core.server_info.id.to_string(),
        uptime_secs: core.server_info.uptime_secs(),
        providers,
    })
}

pub struct StatusProvider {
    name: String,
    db: Arc<Mutex<Database>>,
    openapi: OpenApiFragment,
}

impl StatusProvider {
    fn fragment(name: &str) -> OpenApiFragment {
        let mut paths = serde_json::Map::new();
        paths.insert(
            format!("/{}/status", name),
            json!({
                "get": {
                    "summary": "Server status",
                    "responses": { "200": { "description": "Server metadata and loaded providers" } }
                }
            }),
        );
        OpenApiFragment::new(json!({ "paths": paths }))
    }
}

impl Provider for StatusProvider {
    fn openapi(&self) -> Option<&OpenApiFragment> {
        Some(&self.openapi)
    }

    fn shutdown_hook(&self) -> Option<&dyn ShutdownHook> {
        Some(self)
    }
}

#[async_trait]
impl ShutdownHook for StatusProvider {
    async fn on_shutdown(&self, reason: &str) -> anyhow::Result<()> {
        let db = self.db.lock().await;
        db.put_provider_value(
            &self.name,
            "last_shutdown",
            &json!({ "reason": reason, "at": chrono::Utc::now().to_rfc3339() }),
        )
        .context("failed to record shutdown")?;
        Ok(())
    }
}

/// Factory for [`StatusProvider`].
pub struct StatusFactory;

#[async_trait]
impl ProviderFactory for StatusFactory {
    async fn setup(
        &self,
        declaration: &ProviderDeclaration,
        router: &mut ProviderRouter,
        env: Arc<CoreEnvironment>,
    ) -> anyhow::Result<Arc<dyn Provider>> {
        {
            let db = env.db.lock().await;
            db.put_provider_value(
                &declaration.name,
                "last_start",
                &json!({
                    "instance": env.server_info.id.to_string(),
                    "at": env.server_info.started_at.to_rfc3339(),
                }),
            )
            .context("failed to record start")?;
        }

        router.route("/status", get(status));
        info!("[Providers] Status available at /{}/status", declaration.name);

        Ok(Arc::new(StatusProvider {
            name: declaration.name.clone(),
            openapi: StatusProvider::fragment(&declaration.name),
            db: env.db.clone(),
        }))
    }
}
