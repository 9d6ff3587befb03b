//! `ArchiveStep`: archives the current live record independent of `Persist`.
//!
//! Used by Skill push so version history stays queryable even when the
//! live slug is updated in place rather than replaced wholesale.

use agentforge_core::kind::ResourceKind;
use agentforge_core::resource::{Resource, ResourceSpec, ResourceStatus};
use agentforge_errors::ForgeError;
use agentforge_pipeline::{RequestContext, Step};
use agentforge_store::{keys, KvStore};
use async_trait::async_trait;
use chrono::Utc;

pub struct ArchiveStep {
    pub kind: ResourceKind,
    pub store: KvStore,
}

impl ArchiveStep {
    pub fn new(kind: ResourceKind, store: KvStore) -> Self {
        Self { kind, store }
    }
}

#[async_trait]
impl<In, Spec, Status> Step<In, Resource<Spec, Status>> for ArchiveStep
where
    In: Send + Sync,
    Spec: ResourceSpec + Send + Sync,
    Status: ResourceStatus + Send + Sync,
{
    fn name(&self) -> &'static str {
        "archive"
    }

    async fn execute(&self, ctx: &mut RequestContext<In, Resource<Spec, Status>>) -> Result<(), ForgeError> {
        let id = match ctx.new_state_ref().and_then(|r| r.metadata.id.clone()) {
            Some(id) => id,
            // Nothing live yet to archive (first push of a brand-new skill).
            None => return Ok(()),
        };

        let raw = self.store.get(keys::live(self.kind.as_str(), id.as_str())).await?;
        let Some(raw) = raw else {
            return Ok(());
        };

        let now = Utc::now();
        let updated_at_nanos = now.timestamp_nanos_opt().unwrap_or_default();
        self.store
            .put(keys::audit(self.kind.as_str(), id.as_str(), updated_at_nanos), raw)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{DummyResource, DummySpec};
    use agentforge_core::id::ResourceId;
    use agentforge_core::metadata::ResourceMetadata;
    use agentforge_pipeline::RequestContext;

    #[tokio::test]
    async fn archives_the_current_live_record_before_overwrite() {
        let store = KvStore::in_memory();
        let mut resource = DummyResource::new_input(DummySpec::default(), ResourceMetadata::default());
        let id = ResourceId::generate(ResourceKind::Skill);
        resource.metadata.id = Some(id.clone());
        store
            .put(keys::live("skill", id.as_str()), serde_json::to_vec(&resource).unwrap())
            .await
            .unwrap();

        let mut ctx: RequestContext<(), DummyResource> = RequestContext::new((), "sys");
        ctx.set_new_state(resource);

        ArchiveStep::new(ResourceKind::Skill, store.clone())
            .execute(&mut ctx)
            .await
            .unwrap();

        let archived = store.scan_prefix(keys::audit_prefix("skill", id.as_str())).await.unwrap();
        assert_eq!(archived.len(), 1);
    }

    #[tokio::test]
    async fn no_op_when_nothing_live_yet() {
        let store = KvStore::in_memory();
        let resource = DummyResource::new_input(DummySpec::default(), ResourceMetadata::default());
        let mut ctx: RequestContext<(), DummyResource> = RequestContext::new((), "sys");
        ctx.set_new_state(resource);

        ArchiveStep::new(ResourceKind::Skill, store).execute(&mut ctx).await.unwrap();
    }
}
