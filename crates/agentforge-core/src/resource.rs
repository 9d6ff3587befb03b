//! The generic resource envelope shared by all ten kinds (spec §3.1).
//!
//! Every resource is `{api_version, kind, metadata, spec, status}`. Kinds
//! differ only in their `Spec`/`Status` payloads, so the envelope itself is
//! one generic struct rather than ten hand-written structs duplicating the
//! envelope fields — the kind-specific types live in `agentforge-resources`.

use crate::audit::HasAuditBlock;
use crate::metadata::ResourceMetadata;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Implemented by every kind's `Spec` type. Most kinds only need the
/// default no-op; kinds with extra schema-level invariants (e.g. Skill's
/// `version_hash` format) override `validate`. The `Serialize`/
/// `DeserializeOwned` bound lets the step library round-trip a resource
/// through the store and through `RequestContext` metadata without every
/// kind restating it.
pub trait ResourceSpec: Clone + Send + Sync + Serialize + DeserializeOwned {
    fn validate(&self) -> Result<(), agentforge_errors::ForgeError> {
        Ok(())
    }

    /// The spec-level tag a version-aware reference can resolve against
    /// (spec §6.1: only Skill specs carry one). `None` for every other
    /// kind, so tag-based reference resolution simply never matches them.
    fn version_tag(&self) -> Option<&str> {
        None
    }
}

/// Implemented by every kind's `Status` type. `Default` lets
/// `BuildNewStateStep` construct a fresh status with nothing but an audit
/// block; the audit block itself is threaded through `HasAuditBlock`.
pub trait ResourceStatus: Clone + Default + Send + Sync + HasAuditBlock + Serialize + DeserializeOwned {
    /// The content hash a version-aware reference can resolve against
    /// (spec §6.1: only Skill statuses carry one).
    fn content_hash(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Resource<Spec, Status> {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: ResourceMetadata,
    pub spec: Spec,
    pub status: Status,
}

impl<Spec, Status> Resource<Spec, Status>
where
    Status: ResourceStatus,
{
    /// Builds the skeleton used as pipeline input before a create/update
    /// call: no id/slug yet, status defaulted.
    pub fn new_input(spec: Spec, metadata: ResourceMetadata) -> Self {
        Resource {
            api_version: String::new(),
            kind: String::new(),
            metadata,
            spec,
            status: Status::default(),
        }
    }
}
