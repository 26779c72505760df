use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn of the conversation. Inbound requests carry an ordered JSON
/// array of these; the order is chronological and preserved end to end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One nearest-neighbor hit from the vector index. The identifier is the
/// instructor name; metadata is an open mapping with a known subset.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievedMatch {
    pub id: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl RetrievedMatch {
    pub fn subject(&self) -> &str {
        self.metadata
            .get("subject")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
    }

    /// The review rating. The populated index stores it under the legacy
    /// `stars` key; newer records may use `rating`.
    pub fn rating(&self) -> f64 {
        self.metadata
            .get("stars")
            .or_else(|| self.metadata.get("rating"))
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }
}
