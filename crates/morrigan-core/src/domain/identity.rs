use serde::{Deserialize, Serialize};

/// Capability an identity needs to reach provider routes.
pub const API_FUNCTION: &str = "api";

/// Authentication result attached to a request by the surrounding server.
///
/// `functions` is the list of capabilities granted to the identity. It may be
/// absent entirely, which is not the same as an empty list but is treated the
/// same way by the security gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<String>>,
}

impl AuthenticatedIdentity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            functions: None,
        }
    }

    pub fn with_functions<I, S>(mut self, functions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.functions = Some(functions.into_iter().map(Into::into).collect());
        self
    }

    /// Exact, case-sensitive membership test on the function list.
    pub fn has_function(&self, name: &str) -> bool {
        self.functions
            .as_ref()
            .is_some_and(|functions| functions.iter().any(|f| f == name))
    }
}
