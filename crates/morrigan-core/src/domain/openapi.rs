use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A documentation snippet published by a provider.
///
/// Opaque to the core: usually a partial OpenAPI document (paths, components),
/// but any JSON value is accepted and passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpenApiFragment(Value);

impl OpenApiFragment {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for OpenApiFragment {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
