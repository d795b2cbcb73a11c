//! HTTP Request/Response Logging Middleware
//!
//! One entry and one exit line per request, correlated by trace ID. Bodies are
//! never buffered: provider routes may stream or upgrade.

use axum::{extract::Request, http::header, middleware::Next, response::Response};
use morrigan_core::AuthenticatedIdentity;
use tracing::{debug, Instrument};

use crate::logging::{RequestSpan, TraceContext};

/// Headers that should be redacted
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie", "x-api-key"];

/// Headers worth showing at DEBUG
const LOGGED_HEADERS: &[&str] = &[
    "content-type",
    "accept",
    "user-agent",
    "upgrade",
    "authorization",
];

/// Redact sensitive headers (compact format for DEBUG)
pub fn redact_headers_compact(headers: &axum::http::HeaderMap) -> String {
    headers
        .iter()
        .filter(|(name, _)| LOGGED_HEADERS.contains(&name.as_str()))
        .map(|(name, value)| {
            if SENSITIVE_HEADERS.contains(&name.as_str()) {
                format!("{}=[REDACTED]", name)
            } else {
                format!("{}={:?}", name, value)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Logging middleware for requests and responses
pub async fn http_logging_middleware(mut request: Request, next: Next) -> Response {
    let subject = request
        .extensions()
        .get::<AuthenticatedIdentity>()
        .map(|identity| identity.subject.clone());
    let ctx = TraceContext::new(request.method().as_str(), request.uri().path())
        .with_subject(subject)
        .with_upgrade(request.headers().contains_key(header::UPGRADE));
    let span = RequestSpan::enter(&ctx);

    request.extensions_mut().insert(ctx.clone());

    async move {
        RequestSpan::log_entry(&ctx);
        debug!(
            trace_id = %ctx.trace_id,
            headers = %redact_headers_compact(request.headers()),
            "Request headers"
        );

        let response = next.run(request).await;

        RequestSpan::log_exit(&ctx, response.status().as_u16(), None);
        response
    }
    .instrument(span)
    .await
}
