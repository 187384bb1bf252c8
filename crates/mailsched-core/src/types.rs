use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier the trigger platform assigns to a registration.
///
/// The row store keeps it in the uid column; every fire is correlated back to
/// its row through this value, never through a held reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerUid(pub String);

impl TriggerUid {
    /// Fresh random id, used by registries that mint their own uids.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TriggerUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TriggerUid {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TriggerUid {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
