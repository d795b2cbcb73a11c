//! Providers
//!
//! Independently developed feature modules loaded against the shared router and
//! core environment. A provider optionally publishes an OpenAPI fragment and
//! optionally reacts to shutdown.
//!
//! Providers are resolved through an explicit registration table of
//! [`ProviderFactory`] implementations (see [`FactoryLoader`]); nothing is looked
//! up dynamically at runtime.

mod loader;
mod registry;
pub mod status;

pub use loader::{FactoryLoader, ProviderFactory, ProviderLoader, ProviderRouter};
pub use registry::ProviderRegistry;

use async_trait::async_trait;
use morrigan_core::OpenApiFragment;

/// Capability object a loaded provider exposes to the core.
pub trait Provider: Send + Sync {
    /// Documentation fragment collected once after loading.
    fn openapi(&self) -> Option<&OpenApiFragment> {
        None
    }

    /// Hook invoked when the server shuts down.
    fn shutdown_hook(&self) -> Option<&dyn ShutdownHook> {
        None
    }
}

/// Reaction to a shutdown notification.
#[async_trait]
pub trait ShutdownHook: Send + Sync {
    /// `reason` is usually the signal name (`SIGINT`, `SIGTERM`).
    async fn on_shutdown(&self, reason: &str) -> anyhow::Result<()>;
}
