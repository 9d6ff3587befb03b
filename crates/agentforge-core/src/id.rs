//! System-assigned, kind-prefixed resource identifiers.

use crate::kind::ResourceKind;
use std::fmt;
use ulid::Ulid;

/// A `{kind-prefix}-{ULID}` identifier, e.g. `skl-01ARZ3NDEKTSV4RRFFQ69G5FAV`.
/// Immutable once assigned at create time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Generates a fresh id for `kind`.
    pub fn generate(kind: ResourceKind) -> Self {
        ResourceId(format!("{}-{}", kind.id_prefix(), Ulid::new()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The kind-prefix portion of this id, if it parses as `prefix-rest`.
    pub fn prefix(&self) -> Option<&str> {
        self.0.split('-').next()
    }

    /// Returns the kind this id was minted for, by matching its prefix
    /// against the registry. `None` if the prefix is unrecognized.
    pub fn kind(&self) -> Option<ResourceKind> {
        let prefix = self.prefix()?;
        ResourceKind::ALL.into_iter().find(|k| k.id_prefix() == prefix)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        ResourceId(s)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        ResourceId(s.to_string())
    }
}
