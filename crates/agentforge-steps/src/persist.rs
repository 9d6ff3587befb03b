//! `PersistStep`: atomically writes the live record and its audit snapshot.

use agentforge_core::audit::HasAuditBlock;
use agentforge_core::kind::ResourceKind;
use agentforge_core::resource::{Resource, ResourceSpec, ResourceStatus};
use agentforge_errors::ForgeError;
use agentforge_pipeline::{RequestContext, Step};
use agentforge_store::engine::WriteOp;
use agentforge_store::{keys, KvStore};
use async_trait::async_trait;

pub struct PersistStep {
    pub kind: ResourceKind,
    pub store: KvStore,
}

impl PersistStep {
    pub fn new(kind: ResourceKind, store: KvStore) -> Self {
        Self { kind, store }
    }
}

#[async_trait]
impl<In, Spec, Status> Step<In, Resource<Spec, Status>> for PersistStep
where
    In: Send + Sync,
    Spec: ResourceSpec + Send + Sync,
    Status: ResourceStatus + Send + Sync,
{
    fn name(&self) -> &'static str {
        "persist"
    }

    async fn execute(&self, ctx: &mut RequestContext<In, Resource<Spec, Status>>) -> Result<(), ForgeError> {
        let resource = ctx
            .new_state_ref()
            .ok_or_else(|| ForgeError::internal("persist: new_state missing"))?;

        let id = resource
            .metadata
            .id
            .clone()
            .ok_or_else(|| ForgeError::internal("persist: resource has no id"))?;
        let org = resource.metadata.org_or_local().to_string();
        let slug = resource.metadata.slug.clone();
        let updated_at_nanos = resource
            .status
            .audit_block()
            .status_audit
            .updated_at
            .timestamp_nanos_opt()
            .unwrap_or_default();

        let encoded = serde_json::to_vec(resource).map_err(ForgeError::from)?;

        let ops = vec![
            WriteOp::Put {
                key: keys::live(self.kind.as_str(), id.as_str()),
                value: encoded.clone(),
            },
            WriteOp::Put {
                key: keys::slug_index(self.kind.as_str(), &org, &slug),
                value: id.as_str().as_bytes().to_vec(),
            },
            WriteOp::Put {
                key: keys::audit(self.kind.as_str(), id.as_str(), updated_at_nanos),
                value: encoded,
            },
        ];

        self.store
            .apply_batch(ops)
            .await
            .map_err(|e| ForgeError::internal(format!("persist failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{DummyResource, DummySpec};
    use agentforge_core::id::ResourceId;
    use agentforge_core::metadata::ResourceMetadata;

    #[tokio::test]
    async fn persist_writes_live_index_and_audit_keys() {
        let store = KvStore::in_memory();
        let mut resource = DummyResource::new_input(
            DummySpec::default(),
            ResourceMetadata {
                slug: "my-skill".to_string(),
                ..Default::default()
            },
        );
        resource.metadata.id = Some(ResourceId::generate(ResourceKind::Skill));
        let id = resource.metadata.id.clone().unwrap();

        let mut ctx: RequestContext<(), DummyResource> = RequestContext::new((), "sys");
        ctx.set_new_state(resource);

        PersistStep::new(ResourceKind::Skill, store.clone())
            .execute(&mut ctx)
            .await
            .unwrap();

        assert!(store.get(keys::live("skill", id.as_str())).await.unwrap().is_some());
        assert!(store
            .get(keys::slug_index("skill", "local", "my-skill"))
            .await
            .unwrap()
            .is_some());
        let audit_entries = store.scan_prefix(keys::audit_prefix("skill", id.as_str())).await.unwrap();
        assert_eq!(audit_entries.len(), 1);
    }
}
