//! Identity of IO contexts on a terminal's routing stack.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an IO context.
///
/// Two handles refer to the same context exactly when their ids are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ContextId(Uuid);

impl ContextId {
    /// Create a new random context ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ContextId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_id_unique() {
        let id1 = ContextId::new();
        let id2 = ContextId::new();
        assert_ne!(id1, id2);
        assert_eq!(id1, id1);
    }

    #[test]
    fn test_context_id_display() {
        let id = ContextId::new();
        assert_eq!(format!("{id}").len(), 36);
    }

    #[test]
    fn test_context_id_serialization() {
        let id = ContextId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: ContextId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
