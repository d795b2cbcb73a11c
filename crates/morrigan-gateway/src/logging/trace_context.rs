//! Trace Context - Request correlation and structured logging
//!
//! Generates unique trace IDs and provides structured spans for request tracing.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, info_span, Span};

/// Global request counter for trace ID generation
static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a short, unique trace ID for this request
/// Format: 6 hex characters (e.g., "a1b2c3")
pub fn generate_trace_id() -> String {
    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0);

    let mixed = counter.wrapping_add(timestamp);
    format!("{:06x}", mixed & 0xFFFFFF)
}

/// Correlation data for one request.
#[derive(Debug, Clone)]
pub struct TraceContext {
    /// Unique trace ID (6 hex chars)
    pub trace_id: String,
    pub method: String,
    pub path: String,
    /// Subject of the attached identity, if any
    pub subject: Option<String>,
    /// Whether the request asks for a protocol upgrade
    pub upgrade: bool,
    pub started_at: std::time::Instant,
}

impl TraceContext {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            trace_id: generate_trace_id(),
            method: method.to_string(),
            path: path.to_string(),
            subject: None,
            upgrade: false,
            started_at: std::time::Instant::now(),
        }
    }

    pub fn with_subject(mut self, subject: Option<String>) -> Self {
        self.subject = subject;
        self
    }

    pub fn with_upgrade(mut self, upgrade: bool) -> Self {
        self.upgrade = upgrade;
        self
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    /// Short subject for logging (first 12 chars or "anon")
    pub fn short_subject(&self) -> &str {
        self.subject
            .as_deref()
            .map(|s| match s.char_indices().nth(12) {
                Some((end, _)) => &s[..end],
                None => s,
            })
            .unwrap_or("anon")
    }
}

/// Request span builder for structured logging
pub struct RequestSpan;

impl RequestSpan {
    /// Span carrying the trace ID into every child log.
    pub fn enter(ctx: &TraceContext) -> Span {
        info_span!(
            "request",
            trace_id = %ctx.trace_id,
            method = %ctx.method,
            path = %ctx.path,
        )
    }

    /// Log request entry (single consolidated line)
    pub fn log_entry(ctx: &TraceContext) {
        if ctx.upgrade {
            info!(
                trace_id = %ctx.trace_id,
                "→ {} {} upgrade subject={}",
                ctx.method,
                ctx.path,
                ctx.short_subject()
            );
        } else {
            info!(
                trace_id = %ctx.trace_id,
                "→ {} {} subject={}",
                ctx.method,
                ctx.path,
                ctx.short_subject()
            );
        }
    }

    /// Log request completion (single consolidated line)
    pub fn log_exit(ctx: &TraceContext, status: u16, detail: Option<&str>) {
        let elapsed = ctx.elapsed_ms();

        match detail {
            Some(d) => info!(
                trace_id = %ctx.trace_id,
                "← {} {} ({}ms)",
                status,
                d,
                elapsed
            ),
            None => info!(
                trace_id = %ctx.trace_id,
                "← {} ({}ms)",
                status,
                elapsed
            ),
        }
    }
}
