//! Server settings
//!
//! Loaded once from a JSON file, then overridden from `MORRIGAN_*` environment
//! variables. Providers receive the result read-only through the core environment
//! and read their own section with [`Settings::provider_section`].

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::branding;
use crate::error::{CoreError, CoreResult};

/// Environment override keys (without the `MORRIGAN_` prefix).
pub mod keys {
    /// Listener host
    pub const HTTP_HOST: &str = "HTTP_HOST";
    /// Listener port (u16)
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Enable permissive CORS (bool)
    pub const HTTP_CORS: &str = "HTTP_CORS";
    /// Identity token signing secret
    pub const TOKEN_SECRET: &str = "TOKEN_SECRET";
    /// SQLite database file
    pub const DATABASE_PATH: &str = "DATABASE_PATH";
    /// Directory for rotated log files
    pub const LOG_DIR: &str = "LOG_DIR";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub http: HttpSettings,
    pub auth: AuthSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
    /// Per-provider sections keyed by provider name
    pub providers: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: branding::DEFAULT_GATEWAY_PORT,
            enable_cors: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HMAC secret for identity tokens. Without it no identity is ever attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_secret: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Settings {
    /// Parse settings from JSON text. Missing sections take their defaults.
    pub fn from_json_str(text: &str) -> CoreResult<Self> {
        serde_json::from_str(text).map_err(|e| CoreError::Settings(e.to_string()))
    }

    /// Read settings from a JSON file and apply environment overrides.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Settings(format!("failed to read settings {:?}: {}", path, e))
        })?;
        let mut settings = Self::from_json_str(&text)?;
        settings.apply_env_overrides();
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Apply `MORRIGAN_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|suffix| std::env::var(branding::env_key(suffix)).ok());
    }

    /// Apply overrides from an arbitrary lookup (suffix -> value).
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(keys::HTTP_HOST) {
            self.http.host = host;
        }
        if let Some(port) = lookup(keys::HTTP_PORT) {
            match port.parse::<u16>() {
                Ok(port) => self.http.port = port,
                Err(e) => warn!("Ignoring {}={:?}: {}", branding::env_key(keys::HTTP_PORT), port, e),
            }
        }
        if let Some(cors) = lookup(keys::HTTP_CORS) {
            match cors.parse::<bool>() {
                Ok(enabled) => self.http.enable_cors = enabled,
                Err(e) => warn!("Ignoring {}={:?}: {}", branding::env_key(keys::HTTP_CORS), cors, e),
            }
        }
        if let Some(secret) = lookup(keys::TOKEN_SECRET) {
            self.auth.token_secret = Some(secret);
        }
        if let Some(path) = lookup(keys::DATABASE_PATH) {
            self.database.path = Some(PathBuf::from(path));
        }
        if let Some(dir) = lookup(keys::LOG_DIR) {
            self.logging.directory = Some(PathBuf::from(dir));
        }
    }

    /// Typed access to a provider's own settings section.
    ///
    /// Returns `Ok(None)` when the provider has no section.
    pub fn provider_section<T: DeserializeOwned>(&self, provider: &str) -> CoreResult<Option<T>> {
        self.providers
            .get(provider)
            .map(|value| {
                serde_json::from_value(value.clone()).map_err(|e| {
                    CoreError::Settings(format!("section for provider '{}': {}", provider, e))
                })
            })
            .transpose()
    }
}
