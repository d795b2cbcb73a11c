//! Core API
//!
//! Builds the shared [`CoreEnvironment`], loads the declared providers against
//! it, collects their OpenAPI fragments and puts the security gate in front of
//! every provider route.

use std::sync::Arc;

use axum::{http::StatusCode, middleware, Router};
use morrigan_core::{ComponentDefinition, CoreError, CoreResult, OpenApiFragment};
use tracing::{debug, info};

use crate::environment::{CoreEnvironment, ServerEnvironment};
use crate::openapi::collect_fragments;
use crate::providers::{ProviderLoader, ProviderRegistry, ProviderRouter};
use crate::security::security_middleware;
use crate::server::PUBLIC_ROUTE_SEGMENTS;
use crate::shutdown::notify_providers;

/// A fully set-up core: environment, providers, documentation and gated routes.
pub struct CoreApi {
    name: String,
    env: Arc<CoreEnvironment>,
    providers: Arc<ProviderRegistry>,
    openapi: Vec<OpenApiFragment>,
    routes: Router,
    mount_path: String,
}

impl CoreApi {
    /// Set up the core.
    ///
    /// `router` is consumed. On failure it is dropped with every route the
    /// loader managed to register, so nothing from a failed setup is served.
    ///
    /// When mounted at `/`, provider names may not shadow the server's public
    /// route segments (`health`, `openapi`).
    pub async fn setup(
        name: impl Into<String>,
        definition: &ComponentDefinition,
        mut router: ProviderRouter,
        server_env: ServerEnvironment,
        loader: &dyn ProviderLoader,
    ) -> CoreResult<Self> {
        let name = name.into();
        debug!(
            "[Core] Setting up '{}' with {} declared provider(s)",
            name,
            definition.providers.len()
        );

        let mount_path = definition.mount_path();
        if mount_path == "/" {
            if let Some(declaration) = definition
                .providers
                .iter()
                .find(|d| PUBLIC_ROUTE_SEGMENTS.contains(&d.name.as_str()))
            {
                return Err(CoreError::InvalidProviderName(declaration.name.clone()));
            }
        }

        let env = Arc::new(CoreEnvironment::new(
            server_env,
            definition.endpoint_url.clone(),
        ));

        let registry = loader
            .load(&mut router, &definition.providers, env.clone())
            .await?;
        let openapi = collect_fragments(&registry);
        let providers = env.install_providers(Arc::new(registry));

        // Explicit fallback so unmatched paths under the mount stay behind the gate
        // once nested.
        let routes = router
            .into_router()
            .fallback(|| async { StatusCode::NOT_FOUND })
            .layer(middleware::from_fn_with_state(env.clone(), security_middleware));

        info!(
            "[Core] '{}' ready: {} provider(s), {} OpenAPI fragment(s)",
            name,
            providers.len(),
            openapi.len()
        );

        Ok(Self {
            name,
            env,
            providers,
            openapi,
            routes,
            mount_path,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn env(&self) -> &Arc<CoreEnvironment> {
        &self.env
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    /// Collected documentation fragments, in registry order.
    pub fn openapi(&self) -> &[OpenApiFragment] {
        &self.openapi
    }

    /// Provider routes with the security gate applied.
    pub fn routes(&self) -> Router {
        self.routes.clone()
    }

    /// Normalized path the routes are meant to be mounted under.
    pub fn mount_path(&self) -> &str {
        &self.mount_path
    }

    /// Broadcast `reason` to every provider shutdown hook and wait for all of
    /// them. See [`notify_providers`] for failure semantics.
    pub async fn on_shutdown(&self, reason: &str) -> CoreResult<Vec<String>> {
        notify_providers(&self.providers, reason).await
    }
}
