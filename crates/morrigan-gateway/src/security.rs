//! Security gate
//!
//! Decides, per inbound request, whether it may reach provider routes, and
//! enforces that decision as axum middleware in front of every provider.
//!
//! The predicate is pure: it only reads the `Upgrade` header and the
//! [`AuthenticatedIdentity`] extension attached upstream. Logging of denials is
//! done by the middleware through the injected log function.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use morrigan_core::{AuthenticatedIdentity, API_FUNCTION};

use crate::environment::{CoreEnvironment, LogFn};

/// `Upgrade` header value admitted without authentication.
pub const WEBSOCKET_UPGRADE: &str = "websocket";

/// Returns `true` if the request may proceed to provider routes.
///
/// 1. WebSocket upgrade requests are always allowed.
/// 2. Requests without an attached identity are denied.
/// 3. Identities whose function list is missing or lacks `"api"` are denied.
/// 4. Everything else is allowed.
pub fn verify_req_authentication<B>(request: &Request<B>) -> bool {
    // Unconditional carve-out: upgrade negotiation happens before credentials
    // are attached, and streamed channels authorize inside their own protocol.
    // Anyone can open an upgrade through this gate.
    let is_websocket_upgrade = request
        .headers()
        .get(header::UPGRADE)
        .is_some_and(|value| value.as_bytes() == WEBSOCKET_UPGRADE.as_bytes());
    if is_websocket_upgrade {
        return true;
    }

    let Some(identity) = request.extensions().get::<AuthenticatedIdentity>() else {
        return false;
    };

    identity.has_function(API_FUNCTION)
}

/// Authorization predicate plus the rejection it answers with.
#[derive(Clone)]
pub struct SecurityGate {
    log: LogFn,
}

impl SecurityGate {
    pub fn new(log: LogFn) -> Self {
        Self { log }
    }

    pub fn verify<B>(&self, request: &Request<B>) -> bool {
        verify_req_authentication(request)
    }

    /// Log the rejected peer and build the 403 response.
    ///
    /// Empty body, `Connection: close`.
    pub fn reject(&self, remote_addr: Option<SocketAddr>) -> Response {
        let remote = remote_addr
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        (self.log)(&format!("Unauthenticated connection attempt from {}.", remote));

        (StatusCode::FORBIDDEN, [(header::CONNECTION, "close")]).into_response()
    }
}

/// Middleware enforcing the security gate.
///
/// On allow the core environment is attached to the request (see [`Core`]) and
/// the request continues. On deny nothing downstream runs.
pub async fn security_middleware(
    State(env): State<Arc<CoreEnvironment>>,
    mut request: Request,
    next: Next,
) -> Response {
    if !env.security.verify(&request) {
        let remote_addr = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        return env.security.reject(remote_addr);
    }

    request.extensions_mut().insert(Core(env));
    next.run(request).await
}

/// Core environment attached to an authorized request.
///
/// Usage in provider handlers: `Core(core): Core`
#[derive(Clone)]
pub struct Core(pub Arc<CoreEnvironment>);

impl<S> FromRequestParts<S> for Core
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Core>()
            .cloned()
            .ok_or((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Core environment not attached to request",
            ))
    }
}
