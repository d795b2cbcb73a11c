//! Morrigan API server
//!
//! Environment:
//! - `MORRIGAN_SETTINGS`: settings JSON (optional; defaults plus `MORRIGAN_*` overrides)
//! - `MORRIGAN_DEFINITION`: component definition JSON (optional; status provider only)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use morrigan_core::{branding, ComponentDefinition, ProviderDeclaration, ServerInfo, Settings};
use morrigan_gateway::{
    logging::init_tracing, providers::status, CoreApi, FactoryLoader, GatewayConfig,
    GatewayServer, IdentityVerifier, ProviderRouter, ServerEnvironment,
};
use morrigan_storage::{default_database_path, Database};
use tokio::sync::Mutex;
use tracing::info;

fn env_path(suffix: &str) -> Option<PathBuf> {
    std::env::var_os(branding::env_key(suffix)).map(PathBuf::from)
}

fn load_settings() -> anyhow::Result<Settings> {
    let settings = match env_path("SETTINGS") {
        Some(path) => Settings::load(&path)?,
        None => {
            let mut settings = Settings::default();
            settings.apply_env_overrides();
            settings
        }
    };
    Ok(settings)
}

fn load_definition() -> anyhow::Result<ComponentDefinition> {
    let definition = match env_path("DEFINITION") {
        Some(path) => ComponentDefinition::load(&path)?,
        None => ComponentDefinition::new()
            .with_provider(ProviderDeclaration::new(status::MODULE)),
    };
    Ok(definition)
}

/// Every provider module this binary can load.
fn provider_table() -> FactoryLoader {
    FactoryLoader::new().register(status::MODULE, status::StatusFactory)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (for development)
    dotenvy::dotenv().ok();

    let settings = load_settings()?;
    let _log_guard = init_tracing(settings.logging.directory.as_deref())?;

    let info = ServerInfo::current();
    info!("[Core] {} v{} starting (instance {})", info.name, info.version, info.id);

    let db_path = match settings.database.path.clone() {
        Some(path) => path,
        None => default_database_path().context("No data directory available for the database")?,
    };
    let db = Database::open(&db_path)?;
    info!("[Core] Database ready at {:?}", db_path);

    let definition = load_definition()?;
    let identity = IdentityVerifier::from_settings(&settings.auth);
    let config = GatewayConfig::from_settings(&settings.http);
    let server_env = ServerEnvironment::new(
        Arc::new(settings),
        Arc::new(Mutex::new(db)),
        info,
    );

    let core = CoreApi::setup(
        branding::COMPONENT_NAME,
        &definition,
        ProviderRouter::new(),
        server_env,
        &provider_table(),
    )
    .await
    .context("Core setup failed")?;

    GatewayServer::new(config, core, identity).run().await
}
