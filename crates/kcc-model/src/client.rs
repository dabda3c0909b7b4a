//! Client representation.

use serde::{Deserialize, Serialize};

/// A registered client. Only read, to qualify client-scoped roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRepresentation {
    /// Remote identifier.
    pub id: String,
    /// OAuth client identifier (the human-readable name).
    pub client_id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ClientRepresentation {
    /// Creates a client representation.
    #[must_use]
    pub fn new(id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            client_id: client_id.into(),
            name: None,
        }
    }
}
