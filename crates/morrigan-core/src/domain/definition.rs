use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::branding;
use crate::error::{CoreError, CoreResult};

/// Definition of the core API component.
///
/// `providers` is required: a definition without it is rejected at parse time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    pub providers: Vec<ProviderDeclaration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
}

impl ComponentDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, declaration: ProviderDeclaration) -> Self {
        self.providers.push(declaration);
        self
    }

    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Mount path for the core's routes, normalized, falling back to the default.
    pub fn mount_path(&self) -> String {
        branding::normalize_endpoint(
            self.endpoint_url
                .as_deref()
                .unwrap_or(branding::DEFAULT_ENDPOINT_URL),
        )
    }

    pub fn from_json_str(text: &str) -> CoreResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| CoreError::Settings(format!("component definition: {}", e)))
    }

    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Settings(format!("failed to read definition {:?}: {}", path, e))
        })?;
        Self::from_json_str(&text)
    }
}

/// One entry of the `providers` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDeclaration {
    /// Registry name; also the route segment the provider is mounted under
    pub name: String,
    /// Factory to build it with; defaults to `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Provider-specific configuration, passed through untouched
    #[serde(default)]
    pub config: Value,
}

impl ProviderDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: None,
            config: Value::Null,
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    /// Key used to look up the provider's factory.
    pub fn module_key(&self) -> &str {
        self.module.as_deref().unwrap_or(&self.name)
    }
}
