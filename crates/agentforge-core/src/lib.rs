//! `agentforge-core`
//!
//! Resource identity, metadata, audit, slug, and kind-registry types shared
//! by the pipeline, step library, and resource controllers.

pub mod audit;
pub mod id;
pub mod id_request;
pub mod kind;
pub mod metadata;
pub mod reference;
pub mod resource;
pub mod slug;

pub mod prelude {
    pub use super::audit::{AuditBlock, AuditEntry, HasAuditBlock, SYSTEM_PRINCIPAL};
    pub use super::id::ResourceId;
    pub use super::id_request::IdRequest;
    pub use super::kind::ResourceKind;
    pub use super::metadata::{OwnerScope, ResourceMetadata, VersionInfo};
    pub use super::reference::ResourceReference;
    pub use super::resource::{Resource, ResourceSpec, ResourceStatus};
    pub use super::slug::{is_valid_reference_version, is_valid_slug, slugify};
}
