//! Error taxonomy for the core API
//!
//! Setup failures are fatal and returned to the caller. Authorization denials are
//! not errors (the gate answers them in-band). Shutdown failures are collected
//! from every hook and reported together.

use thiserror::Error;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// A single provider's failure during a fan-out operation.
#[derive(Debug)]
pub struct ProviderFailure {
    /// Registry name of the provider
    pub provider: String,
    /// What the provider reported
    pub error: anyhow::Error,
}

impl std::fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:#}", self.provider, self.error)
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    /// No factory is registered for a declared provider module.
    #[error("no provider factory registered for module '{module}' (provider '{provider}')")]
    UnknownProvider { provider: String, module: String },

    /// Two declarations share one registry name.
    #[error("provider '{0}' is declared more than once")]
    DuplicateProvider(String),

    /// A provider name that cannot be used as a route segment.
    #[error("invalid provider name '{0}'")]
    InvalidProviderName(String),

    /// A provider factory rejected during loading.
    #[error("failed to set up provider '{provider}': {source:#}")]
    ProviderSetup {
        provider: String,
        #[source]
        source: anyhow::Error,
    },

    /// One or more shutdown hooks rejected. Every hook still ran to completion.
    #[error("{} provider shutdown hook(s) failed", .0.len())]
    Shutdown(Vec<ProviderFailure>),

    /// Settings or definition files could not be read or parsed.
    #[error("invalid settings: {0}")]
    Settings(String),
}

impl CoreError {
    /// Name of the provider responsible, when the error concerns exactly one.
    pub fn provider(&self) -> Option<&str> {
        match self {
            CoreError::UnknownProvider { provider, .. }
            | CoreError::ProviderSetup { provider, .. } => Some(provider),
            CoreError::DuplicateProvider(name) | CoreError::InvalidProviderName(name) => {
                Some(name)
            }
            CoreError::Shutdown(_) | CoreError::Settings(_) => None,
        }
    }
}

impl CoreError {
    /// Per-provider failures carried by a shutdown error.
    pub fn failures(&self) -> &[ProviderFailure] {
        match self {
            CoreError::Shutdown(failures) => failures,
            _ => &[],
        }
    }
}
