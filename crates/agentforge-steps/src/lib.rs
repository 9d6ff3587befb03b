//! `agentforge-steps`
//!
//! The standard step library (spec module C4): reusable `Step`
//! implementations that resource controllers compose into pipelines.

pub mod archive;
pub mod build_state;
pub mod delete;
pub mod duplicate;
pub mod keys;
pub mod load;
pub mod persist;
pub mod slug;
pub mod validate;

#[cfg(test)]
mod test_support;

pub use archive::ArchiveStep;
pub use build_state::{BuildNewStateStep, BuildUpdateStateStep};
pub use delete::{DeleteResourceStep, ExtractResourceIdStep, LoadExistingForDeleteStep};
pub use duplicate::CheckDuplicateStep;
pub use load::{LoadByReferenceStep, LoadForApplyStep, LoadTargetStep};
pub use slug::ResolveSlugStep;
pub use validate::{ValidateProtoStep, ValidateRequestStep, ValidatableRequest};
