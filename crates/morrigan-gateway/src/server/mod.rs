//! Gateway Server
//!
//! HTTP server hosting the core: public health and documentation endpoints, the
//! gated provider routes, and the shutdown sequence that notifies providers.

mod handlers;
pub mod logging_middleware;
mod signal;

pub use handlers::HealthResponse;
pub use signal::shutdown_signal;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{middleware, routing::get, Router};
use morrigan_core::{branding, HttpSettings};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::{identity_middleware, IdentityVerifier};
use crate::core_api::CoreApi;

/// First path segments of the public routes. Reserved as provider names when
/// the core is mounted at the root.
pub const PUBLIC_ROUTE_SEGMENTS: &[&str] = &["health", "openapi"];

/// Gateway server configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS for browser access
    pub enable_cors: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: branding::DEFAULT_GATEWAY_PORT,
            enable_cors: false,
        }
    }
}

impl GatewayConfig {
    pub fn from_settings(http: &HttpSettings) -> Self {
        Self {
            host: http.host.clone(),
            port: http.port,
            enable_cors: http.enable_cors,
        }
    }

    /// Get the socket address
    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

/// Gateway server owning a set-up [`CoreApi`].
pub struct GatewayServer {
    config: GatewayConfig,
    core: Arc<CoreApi>,
    identity: Arc<IdentityVerifier>,
}

impl GatewayServer {
    pub fn new(config: GatewayConfig, core: CoreApi, identity: IdentityVerifier) -> Self {
        Self {
            config,
            core: Arc::new(core),
            identity: Arc::new(identity),
        }
    }

    pub fn core(&self) -> &Arc<CoreApi> {
        &self.core
    }

    /// Build the Axum router
    ///
    /// Layers run outside-in: CORS, identity attachment, request logging, then
    /// the security gate in front of provider routes.
    pub fn build_router(&self) -> Router {
        let public = Router::new()
            .route("/health", get(handlers::health))
            .route("/openapi/fragments", get(handlers::openapi_fragments))
            .with_state(self.core.clone());

        let mount_path = self.core.mount_path();
        let gated = self.core.routes();
        // axum cannot nest at the root
        let router = if mount_path == "/" {
            public.merge(gated)
        } else {
            public.nest(mount_path, gated)
        };

        let mut router = router
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn(
                logging_middleware::http_logging_middleware,
            ))
            .layer(middleware::from_fn_with_state(
                self.identity.clone(),
                identity_middleware,
            ));

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router = router.layer(cors);
        }

        router
    }

    /// Bind the configured address and serve until SIGINT/SIGTERM.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        self.serve(listener, async { shutdown_signal().await.to_string() })
            .await
    }

    /// Serve on `listener` until `shutdown` resolves, then notify providers
    /// with the reason it resolved to.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = String> + Send + 'static,
    {
        let local_addr = listener.local_addr()?;
        info!("[Gateway] Listening on {}", local_addr);
        info!(
            "[Gateway] Provider routes mounted at {}",
            self.core.mount_path()
        );
        info!(
            "[Gateway] CORS: {}",
            if self.config.enable_cors {
                "enabled"
            } else {
                "disabled"
            }
        );
        if !self.identity.is_enabled() {
            warn!("[Gateway] Identity tokens: disabled (no secret configured)");
        }

        let router = self.build_router();
        let (reason_tx, reason_rx) = oneshot::channel();

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            let reason = shutdown.await;
            let _ = reason_tx.send(reason);
        })
        .await
        .context("Gateway server error")?;

        let reason = reason_rx.await.unwrap_or_else(|_| "shutdown".to_string());
        info!("[Gateway] Server stopped ({}), notifying providers", reason);

        let notified = self.core.on_shutdown(&reason).await?;
        info!(
            "[Gateway] Shutdown complete ({} provider hook(s) ran)",
            notified.len()
        );
        Ok(())
    }
}
