//! Centralized branding constants
//!
//! All product naming and well-known defaults come from this module.

/// User-facing display name
pub const DISPLAY_NAME: &str = "Morrigan";

/// Name the core API component registers under
pub const COMPONENT_NAME: &str = "core";

/// Log file prefix
pub const LOG_PREFIX: &str = "morrigan";

/// Prefix for environment variable overrides (e.g. `MORRIGAN_HTTP_PORT`)
pub const ENV_PREFIX: &str = "MORRIGAN_";

/// Default port for the HTTP listener.
pub const DEFAULT_GATEWAY_PORT: u16 = 45820;

/// Default base path under which provider routes are mounted.
pub const DEFAULT_ENDPOINT_URL: &str = "/api";

/// Build the full name of an environment override from its suffix.
///
/// # Example
/// ```
/// use morrigan_core::branding;
///
/// assert_eq!(branding::env_key("HTTP_PORT"), "MORRIGAN_HTTP_PORT");
/// ```
pub fn env_key(suffix: &str) -> String {
    format!("{}{}", ENV_PREFIX, suffix)
}

/// Normalize a mount path: leading slash, no trailing slash.
///
/// Returns `"/"` for an empty path or the root itself.
pub fn normalize_endpoint(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}
