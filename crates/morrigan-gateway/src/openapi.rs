//! OpenAPI fragment aggregation

use morrigan_core::OpenApiFragment;
use tracing::debug;

use crate::providers::ProviderRegistry;

/// Collect the fragment of every provider that publishes one, in registry order.
///
/// Fragments are cloned as-is; merging them is left to the consumer.
pub fn collect_fragments(registry: &ProviderRegistry) -> Vec<OpenApiFragment> {
    registry
        .iter()
        .filter_map(|(name, provider)| {
            let fragment = provider.openapi()?;
            debug!("[Core] Collected OpenAPI fragment from '{}'", name);
            Some(fragment.clone())
        })
        .collect()
}
