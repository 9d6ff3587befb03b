//! Canonical resource metadata shared by every resource kind.

use crate::id::ResourceId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Visibility domain of a resource. Ignored semantically by the local core
/// (see spec Non-goals: multi-tenant authorization is out of scope) but
/// persisted so a future cloud tier can act on it without a migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OwnerScope {
    Unspecified,
    Platform,
    Organization,
    IdentityAccount,
}

impl Default for OwnerScope {
    fn default() -> Self {
        OwnerScope::Unspecified
    }
}

/// Monotonic version bookkeeping, bumped by `BuildUpdateStateStep`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct VersionInfo {
    pub generation: u64,
}

impl VersionInfo {
    pub fn next(&self) -> Self {
        VersionInfo {
            generation: self.generation + 1,
        }
    }
}

/// The metadata block present on every resource, regardless of kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ResourceMetadata {
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub owner_scope: OwnerScope,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub version: VersionInfo,
}

impl ResourceMetadata {
    /// `org` defaults to `"local"` when the caller leaves it empty, matching
    /// the local-mode default described in spec §3.1.
    pub fn org_or_local(&self) -> &str {
        if self.org.is_empty() {
            "local"
        } else {
            &self.org
        }
    }
}
