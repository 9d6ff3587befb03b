//! Well-known `RequestContext` metadata keys, gathered in one place so a
//! typo in a key string is caught by sharing the constant rather than by
//! hoping two steps agree (spec §4.1: "typos are a compile-time concern of
//! the host language").

pub const RESOLVED_SLUG: &str = "resolvedSlug";
pub const RESOURCE_ID: &str = "resourceId";
pub const DELETED_RESOURCE_SNAPSHOT: &str = "deletedResourceSnapshot";
pub const EXISTING_RESOURCE: &str = "existingResource";
pub const ARTIFACT_HASH: &str = "artifactHash";
pub const ARTIFACT_WAS_NEW: &str = "artifactWasNew";
