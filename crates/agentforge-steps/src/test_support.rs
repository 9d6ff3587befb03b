//! Shared fixtures for step unit tests: a minimal `Spec`/`Status` pair
//! satisfying the bounds every step requires.

use agentforge_core::audit::{AuditBlock, HasAuditBlock};
use agentforge_core::resource::{ResourceSpec, ResourceStatus};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct DummySpec {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub tag: Option<String>,
}
impl ResourceSpec for DummySpec {
    fn version_tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct DummyStatus {
    pub audit: AuditBlock,
    #[serde(default)]
    pub hash: String,
}

impl Default for DummyStatus {
    fn default() -> Self {
        DummyStatus {
            audit: AuditBlock::new_at(Utc::now(), "system"),
            hash: String::new(),
        }
    }
}

impl HasAuditBlock for DummyStatus {
    fn audit_block(&self) -> &AuditBlock {
        &self.audit
    }
    fn audit_block_mut(&mut self) -> &mut AuditBlock {
        &mut self.audit
    }
}

impl ResourceStatus for DummyStatus {
    fn content_hash(&self) -> Option<&str> {
        if self.hash.is_empty() {
            None
        } else {
            Some(&self.hash)
        }
    }
}

pub type DummyResource = agentforge_core::resource::Resource<DummySpec, DummyStatus>;
