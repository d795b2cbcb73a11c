//! Morrigan Gateway
//!
//! Extensibility core of the gateway:
//! - Shared core environment handed to every provider
//! - Security gate in front of all provider routes
//! - Provider loading through an explicit factory table
//! - OpenAPI fragment collection
//! - Shutdown fan-out to provider hooks
//! - HTTP server hosting it all

pub mod auth;
pub mod core_api;
pub mod environment;
pub mod logging;
pub mod openapi;
pub mod providers;
pub mod security;
pub mod server;
pub mod shutdown;

pub use auth::{create_identity_token, identity_middleware, IdentityClaims, IdentityVerifier};
pub use core_api::CoreApi;
pub use environment::{tracing_log, CoreEnvironment, LogFn, ServerEnvironment};
pub use providers::{
    FactoryLoader, Provider, ProviderFactory, ProviderLoader, ProviderRegistry, ProviderRouter,
    ShutdownHook,
};
pub use security::{security_middleware, verify_req_authentication, Core, SecurityGate};
pub use server::{shutdown_signal, GatewayConfig, GatewayServer};
