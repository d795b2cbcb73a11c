//! # Morrigan Core Library
//!
//! Domain types shared by the gateway, storage and providers.
//!
//! ## Modules
//!
//! - `branding` - Centralized product constants
//! - `domain` - Settings, component definitions, identities, server metadata
//! - `error` - Error taxonomy for setup and shutdown

pub mod branding;
pub mod domain;
pub mod error;

// Re-export commonly used types
pub use domain::*;
pub use error::{CoreError, CoreResult, ProviderFailure};
