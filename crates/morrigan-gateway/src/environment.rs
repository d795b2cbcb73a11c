//! Core environment
//!
//! The bundle of shared dependencies every provider receives. Constructed once
//! per setup, shared as `Arc<CoreEnvironment>`, read-only afterwards.

use std::sync::{Arc, OnceLock};

use morrigan_core::{ServerInfo, Settings};
use morrigan_storage::Database;
use tokio::sync::Mutex;
use tracing::info;

use crate::providers::ProviderRegistry;
use crate::security::SecurityGate;

/// Single-argument logging function shared by the core and its providers.
pub type LogFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Log function forwarding to `tracing` at INFO under `morrigan::core`.
pub fn tracing_log() -> LogFn {
    Arc::new(|message: &str| info!(target: "morrigan::core", "{}", message))
}

/// What the hosting server hands to the core during setup.
#[derive(Clone)]
pub struct ServerEnvironment {
    pub settings: Arc<Settings>,
    pub db: Arc<Mutex<Database>>,
    pub log: LogFn,
    pub info: ServerInfo,
}

impl ServerEnvironment {
    /// Server environment logging through `tracing`.
    pub fn new(settings: Arc<Settings>, db: Arc<Mutex<Database>>, info: ServerInfo) -> Self {
        Self {
            settings,
            db,
            log: tracing_log(),
            info,
        }
    }

    pub fn with_log(mut self, log: LogFn) -> Self {
        self.log = log;
        self
    }
}

/// Shared, read-only-after-init dependencies passed to every provider.
///
/// `providers` is a write-once cell: providers constructed while the registry
/// is being loaded see every other field but observe `providers()` as `None`.
pub struct CoreEnvironment {
    pub settings: Arc<Settings>,
    pub db: Arc<Mutex<Database>>,
    pub log: LogFn,
    pub server_info: ServerInfo,
    pub endpoint_url: Option<String>,
    pub security: SecurityGate,
    providers: OnceLock<Arc<ProviderRegistry>>,
}

impl CoreEnvironment {
    pub(crate) fn new(server_env: ServerEnvironment, endpoint_url: Option<String>) -> Self {
        let security = SecurityGate::new(server_env.log.clone());
        Self {
            settings: server_env.settings,
            db: server_env.db,
            log: server_env.log,
            server_info: server_env.info,
            endpoint_url,
            security,
            providers: OnceLock::new(),
        }
    }

    /// The loaded registry; `None` while providers are still being set up.
    pub fn providers(&self) -> Option<&Arc<ProviderRegistry>> {
        self.providers.get()
    }

    /// Install the registry. The first installation wins; later calls return
    /// the registry already in place.
    pub(crate) fn install_providers(&self, registry: Arc<ProviderRegistry>) -> Arc<ProviderRegistry> {
        self.providers.get_or_init(|| registry).clone()
    }

    /// Write one line through the injected log function.
    pub fn log(&self, message: &str) {
        (self.log)(message)
    }
}
