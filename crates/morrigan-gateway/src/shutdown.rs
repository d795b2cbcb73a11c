//! Shutdown fan-out
//!
//! Every provider hook is started concurrently and awaited to completion. A
//! failing hook never cancels its siblings; failures are collected and reported
//! together. There is no timeout: a hook that never resolves stalls shutdown, so
//! callers wanting a deadline wrap the call in `tokio::time::timeout`.

use futures::future::join_all;
use morrigan_core::{CoreError, CoreResult, ProviderFailure};
use tracing::{debug, info, warn};

use crate::providers::ProviderRegistry;

/// Notify every provider with a shutdown hook.
///
/// Returns the names of the providers whose hooks ran, in registry order.
pub async fn notify_providers(registry: &ProviderRegistry, reason: &str) -> CoreResult<Vec<String>> {
    let hooks: Vec<_> = registry
        .iter()
        .filter_map(|(name, provider)| provider.shutdown_hook().map(|hook| (name, hook)))
        .collect();

    info!(
        "[Shutdown] Notifying {} of {} provider(s) ({})",
        hooks.len(),
        registry.len(),
        reason
    );

    let results = join_all(hooks.iter().map(|(name, hook)| async move {
        debug!("[Shutdown] Calling hook for '{}'", name);
        (*name, hook.on_shutdown(reason).await)
    }))
    .await;

    let mut notified = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (name, result) in results {
        notified.push(name.to_string());
        if let Err(error) = result {
            warn!("[Shutdown] Provider '{}' failed to shut down: {:#}", name, error);
            failures.push(ProviderFailure {
                provider: name.to_string(),
                error,
            });
        }
    }

    if failures.is_empty() {
        Ok(notified)
    } else {
        Err(CoreError::Shutdown(failures))
    }
}
