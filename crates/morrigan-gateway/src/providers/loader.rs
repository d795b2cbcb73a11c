//! Provider loading
//!
//! [`FactoryLoader`] resolves declarations through an explicit table of
//! [`ProviderFactory`] implementations. Each provider registers its routes on a
//! private [`ProviderRouter`] which is then nested at `/<provider name>`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::MethodRouter, Router};
use morrigan_core::{CoreError, CoreResult, ProviderDeclaration};
use tracing::{debug, info};

use super::{Provider, ProviderRegistry};
use crate::environment::CoreEnvironment;

/// Router shared with the provider loader.
///
/// Thin wrapper over an axum [`Router`] that remembers whether anything was
/// registered, so untouched sub-routers are never nested.
#[derive(Default)]
pub struct ProviderRouter {
    router: Router,
    touched: bool,
}

impl ProviderRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route.
    pub fn route(&mut self, path: &str, method_router: MethodRouter) -> &mut Self {
        self.router = std::mem::take(&mut self.router).route(path, method_router);
        self.touched = true;
        self
    }

    /// Nest `router` under `path`.
    pub fn mount(&mut self, path: &str, router: Router) -> &mut Self {
        self.router = std::mem::take(&mut self.router).nest(path, router);
        self.touched = true;
        self
    }

    /// Whether any route was registered.
    pub fn has_routes(&self) -> bool {
        self.touched
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Populates the registry from the component definition.
#[async_trait]
pub trait ProviderLoader: Send + Sync {
    /// Load every declaration. Any error is fatal to setup.
    ///
    /// `env.providers()` is still `None` while this runs.
    async fn load(
        &self,
        router: &mut ProviderRouter,
        declarations: &[ProviderDeclaration],
        env: Arc<CoreEnvironment>,
    ) -> CoreResult<ProviderRegistry>;
}

/// Builds one provider from its declaration.
#[async_trait]
pub trait ProviderFactory: Send + Sync {
    /// `router` is the provider's own sub-router, mounted at `/<name>` afterwards.
    async fn setup(
        &self,
        declaration: &ProviderDeclaration,
        router: &mut ProviderRouter,
        env: Arc<CoreEnvironment>,
    ) -> anyhow::Result<Arc<dyn Provider>>;
}

/// Registration table of provider factories keyed by module name.
#[derive(Default, Clone)]
pub struct FactoryLoader {
    factories: HashMap<String, Arc<dyn ProviderFactory>>,
}

impl FactoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `module`. A later registration replaces an earlier one.
    pub fn register(mut self, module: impl Into<String>, factory: impl ProviderFactory + 'static) -> Self {
        self.factories.insert(module.into(), Arc::new(factory));
        self
    }

    pub fn modules(&self) -> Vec<&str> {
        let mut modules: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        modules.sort_unstable();
        modules
    }

    fn factory_for(&self, declaration: &ProviderDeclaration) -> CoreResult<&Arc<dyn ProviderFactory>> {
        let module = declaration.module_key();
        self.factories
            .get(module)
            .ok_or_else(|| CoreError::UnknownProvider {
                provider: declaration.name.clone(),
                module: module.to_string(),
            })
    }
}

/// Provider names double as route segments.
fn is_valid_provider_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[async_trait]
impl ProviderLoader for FactoryLoader {
    async fn load(
        &self,
        router: &mut ProviderRouter,
        declarations: &[ProviderDeclaration],
        env: Arc<CoreEnvironment>,
    ) -> CoreResult<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();

        for declaration in declarations {
            let name = declaration.name.as_str();
            if !is_valid_provider_name(name) {
                return Err(CoreError::InvalidProviderName(name.to_string()));
            }
            if registry.contains(name) {
                return Err(CoreError::DuplicateProvider(name.to_string()));
            }

            let factory = self.factory_for(declaration)?;
            debug!(
                "[Providers] Setting up '{}' (module '{}')",
                name,
                declaration.module_key()
            );

            let mut sub_router = ProviderRouter::new();
            let provider = factory
                .setup(declaration, &mut sub_router, env.clone())
                .await
                .map_err(|source| CoreError::ProviderSetup {
                    provider: name.to_string(),
                    source,
                })?;

            if sub_router.has_routes() {
                router.mount(&format!("/{}", name), sub_router.into_router());
            }
            registry.insert(name, provider)?;
        }

        info!("[Providers] Loaded {} provider(s): {:?}", registry.len(), registry.names());
        Ok(registry)
    }
}
