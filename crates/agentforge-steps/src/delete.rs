//! `ExtractResourceIdStep`, `LoadExistingForDeleteStep`, `DeleteResourceStep`.

use crate::keys::RESOURCE_ID;
use agentforge_core::audit::HasAuditBlock;
use agentforge_core::id::ResourceId;
use agentforge_core::id_request::IdRequest;
use agentforge_core::kind::ResourceKind;
use agentforge_core::resource::{Resource, ResourceSpec, ResourceStatus};
use agentforge_errors::ForgeError;
use agentforge_pipeline::{RequestContext, Step};
use agentforge_store::engine::WriteOp;
use agentforge_store::{keys, KvStore};
use async_trait::async_trait;
use chrono::Utc;

pub struct ExtractResourceIdStep;

#[async_trait]
impl<New> Step<IdRequest, New> for ExtractResourceIdStep
where
    New: Send + Sync,
{
    fn name(&self) -> &'static str {
        "extract_resource_id"
    }

    async fn execute(&self, ctx: &mut RequestContext<IdRequest, New>) -> Result<(), ForgeError> {
        ctx.input.validate_non_empty()?;
        ctx.put_metadata(RESOURCE_ID, ctx.input.value.clone());
        Ok(())
    }
}

pub struct LoadExistingForDeleteStep {
    pub kind: ResourceKind,
    pub store: KvStore,
}

impl LoadExistingForDeleteStep {
    pub fn new(kind: ResourceKind, store: KvStore) -> Self {
        Self { kind, store }
    }
}

#[async_trait]
impl<Spec, Status> Step<IdRequest, Resource<Spec, Status>> for LoadExistingForDeleteStep
where
    Spec: ResourceSpec + Send + Sync,
    Status: ResourceStatus + Send + Sync,
{
    fn name(&self) -> &'static str {
        "load_existing_for_delete"
    }

    async fn execute(&self, ctx: &mut RequestContext<IdRequest, Resource<Spec, Status>>) -> Result<(), ForgeError> {
        let id: String = ctx
            .get_metadata(RESOURCE_ID)
            .ok_or_else(|| ForgeError::internal("load_existing_for_delete: resourceId missing"))?;

        let raw = self
            .store
            .get(keys::live(self.kind.as_str(), &id))
            .await?
            .ok_or_else(|| ForgeError::not_found(format!("{} '{}' not found", self.kind, id)))?;
        let resource: Resource<Spec, Status> = serde_json::from_slice(&raw).map_err(ForgeError::from)?;
        ctx.set_new_state(resource);
        Ok(())
    }
}

pub struct DeleteResourceStep {
    pub kind: ResourceKind,
    pub store: KvStore,
}

impl DeleteResourceStep {
    pub fn new(kind: ResourceKind, store: KvStore) -> Self {
        Self { kind, store }
    }
}

#[async_trait]
impl<Spec, Status> Step<IdRequest, Resource<Spec, Status>> for DeleteResourceStep
where
    Spec: ResourceSpec + Send + Sync,
    Status: ResourceStatus + Send + Sync,
{
    fn name(&self) -> &'static str {
        "delete_resource"
    }

    async fn execute(&self, ctx: &mut RequestContext<IdRequest, Resource<Spec, Status>>) -> Result<(), ForgeError> {
        let now = Utc::now();
        let fallback_id = ctx.input.value.clone();
        let resource = ctx
            .new_state_mut()
            .ok_or_else(|| ForgeError::internal("delete_resource: new_state missing"))?;

        let id = resource
            .metadata
            .id
            .clone()
            .unwrap_or_else(|| ResourceId::from(fallback_id));

        let advanced = resource.status.audit_block().advance(now, "system", "delete");
        *resource.status.audit_block_mut() = advanced;
        let encoded = serde_json::to_vec(resource).map_err(ForgeError::from)?;
        let updated_at_nanos = now.timestamp_nanos_opt().unwrap_or_default();

        let ops = vec![
            WriteOp::Delete {
                key: keys::live(self.kind.as_str(), id.as_str()),
            },
            WriteOp::Put {
                key: keys::audit(self.kind.as_str(), id.as_str(), updated_at_nanos),
                value: encoded,
            },
        ];

        self.store
            .apply_batch(ops)
            .await
            .map_err(|e| ForgeError::internal(format!("delete failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{DummyResource, DummySpec};
    use agentforge_core::metadata::ResourceMetadata;
    use agentforge_store::engine::WriteOp as Op;

    #[tokio::test]
    async fn full_delete_sequence_removes_live_and_archives() {
        let store = KvStore::in_memory();
        let mut resource = DummyResource::new_input(DummySpec::default(), ResourceMetadata::default());
        let id = ResourceId::generate(ResourceKind::Skill);
        resource.metadata.id = Some(id.clone());
        store
            .apply_batch(vec![Op::Put {
                key: keys::live("skill", id.as_str()),
                value: serde_json::to_vec(&resource).unwrap(),
            }])
            .await
            .unwrap();

        let mut ctx: RequestContext<IdRequest, DummyResource> =
            RequestContext::new(IdRequest { value: id.as_str().to_string() }, "sys");

        ExtractResourceIdStep.execute(&mut ctx).await.unwrap();
        LoadExistingForDeleteStep::new(ResourceKind::Skill, store.clone())
            .execute(&mut ctx)
            .await
            .unwrap();
        DeleteResourceStep::new(ResourceKind::Skill, store.clone())
            .execute(&mut ctx)
            .await
            .unwrap();

        assert!(store.get(keys::live("skill", id.as_str())).await.unwrap().is_none());
        let archived = store.scan_prefix(keys::audit_prefix("skill", id.as_str())).await.unwrap();
        assert_eq!(archived.len(), 1);
    }

    #[tokio::test]
    async fn extract_resource_id_rejects_empty_value() {
        let mut ctx: RequestContext<IdRequest, DummyResource> =
            RequestContext::new(IdRequest { value: String::new() }, "sys");
        let err = ExtractResourceIdStep.execute(&mut ctx).await.unwrap_err();
        assert_eq!(err.code(), agentforge_errors::Code::InvalidArgument);
    }
}
