//! Domain types
//!
//! - Settings (server configuration, read-only to providers)
//! - Component definitions (which providers to load, where to mount them)
//! - Authenticated identities attached to requests
//! - Server instance metadata
//! - OpenAPI documentation fragments

mod definition;
mod identity;
mod openapi;
mod server_info;
pub mod settings;

pub use definition::{ComponentDefinition, ProviderDeclaration};
pub use identity::{AuthenticatedIdentity, API_FUNCTION};
pub use openapi::OpenApiFragment;
pub use server_info::ServerInfo;
pub use settings::{AuthSettings, DatabaseSettings, HttpSettings, LoggingSettings, Settings};
