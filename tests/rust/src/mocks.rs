//! Mock providers for testing
//!
//! Providers with configurable capabilities, hooks that record what they were
//! called with, and factories serving them to a `FactoryLoader`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::ws::WebSocketUpgrade;
use axum::routing::get;
use morrigan_core::{OpenApiFragment, ProviderDeclaration};
use morrigan_gateway::{CoreEnvironment, Provider, ProviderFactory, ProviderRouter, ShutdownHook};
use serde_json::Value;

// ============================================================================
// RecordingHook
// ============================================================================

/// Shutdown hook recording every reason; clones share their records.
#[derive(Clone, Default)]
pub struct RecordingHook {
    calls: Arc<Mutex<Vec<String>>>,
    completed: Arc<AtomicUsize>,
    delay: Option<Duration>,
    failure: Option<String>,
}

impl RecordingHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before settling.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Settle with this error.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of invocations that ran to the end.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ShutdownHook for RecordingHook {
    async fn on_shutdown(&self, reason: &str) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(reason.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);

        match &self.failure {
            Some(message) => Err(anyhow::anyhow!("{}", message)),
            None => Ok(()),
        }
    }
}

// ============================================================================
// MockProvider
// ============================================================================

#[derive(Clone, Default)]
pub struct MockProvider {
    openapi: Option<OpenApiFragment>,
    hook: Option<RecordingHook>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_openapi(mut self, fragment: Value) -> Self {
        self.openapi = Some(OpenApiFragment::new(fragment));
        self
    }

    pub fn with_hook(mut self, hook: RecordingHook) -> Self {
        self.hook = Some(hook);
        self
    }
}

impl Provider for MockProvider {
    fn openapi(&self) -> Option<&OpenApiFragment> {
        self.openapi.as_ref()
    }

    fn shutdown_hook(&self) -> Option<&dyn ShutdownHook> {
        self.hook.as_ref().map(|hook| hook as &dyn ShutdownHook)
    }
}

// ============================================================================
// Factories
// ============================================================================

/// Factory serving one [`MockProvider`], optionally with a `GET /ping` route
/// and a `GET /socket` WebSocket endpoint.
///
/// Records whether the registry was visible while it ran.
#[derive(Clone, Default)]
pub struct MockFactory {
    provider: MockProvider,
    with_route: bool,
    with_websocket: bool,
    saw_registry: Arc<Mutex<Vec<bool>>>,
}

impl MockFactory {
    pub fn new(provider: MockProvider) -> Self {
        Self {
            provider,
            ..Self::default()
        }
    }

    /// Register `GET /ping` answering with the provider's name.
    pub fn with_route(mut self) -> Self {
        self.with_route = true;
        self
    }

    /// Register `GET /socket`, accepting WebSocket upgrades and closing right away.
    pub fn with_websocket(mut self) -> Self {
        self.with_websocket = true;
        self
    }

    /// For every setup call, whether `env.providers()` was populated.
    pub fn saw_registry(&self) -> Vec<bool> {
        self.saw_registry.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderFactory for MockFactory {
    async fn setup(
        &self,
        declaration: &ProviderDeclaration,
        router: &mut ProviderRouter,
        env: Arc<CoreEnvironment>,
    ) -> anyhow::Result<Arc<dyn Provider>> {
        self.saw_registry
            .lock()
            .unwrap()
            .push(env.providers().is_some());

        if self.with_route {
            let name = declaration.name.clone();
            router.route("/ping", get(move || async move { name }));
        }
        if self.with_websocket {
            router.route(
                "/socket",
                get(|ws: WebSocketUpgrade| async move { ws.on_upgrade(|_socket| async {}) }),
            );
        }
        Ok(Arc::new(self.provider.clone()))
    }
}

/// Factory that registers a route and then fails.
#[derive(Clone)]
pub struct FailingFactory {
    message: String,
}

impl FailingFactory {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ProviderFactory for FailingFactory {
    async fn setup(
        &self,
        _declaration: &ProviderDeclaration,
        router: &mut ProviderRouter,
        _env: Arc<CoreEnvironment>,
    ) -> anyhow::Result<Arc<dyn Provider>> {
        router.route("/half", get(|| async { "half set up" }));
        anyhow::bail!("{}", self.message)
    }
}
