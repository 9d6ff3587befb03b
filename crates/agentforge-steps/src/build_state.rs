//! `BuildNewStateStep` and `BuildUpdateStateStep`: turn a validated
//! `new_state` into the record that will actually be persisted.

use crate::keys::EXISTING_RESOURCE;
use agentforge_core::audit::{AuditBlock, SYSTEM_PRINCIPAL};
use agentforge_core::id::ResourceId;
use agentforge_core::kind::ResourceKind;
use agentforge_core::resource::{Resource, ResourceSpec, ResourceStatus};
use agentforge_errors::ForgeError;
use agentforge_pipeline::{RequestContext, Step};
use async_trait::async_trait;
use chrono::Utc;

pub struct BuildNewStateStep {
    pub kind: ResourceKind,
}

impl BuildNewStateStep {
    pub fn new(kind: ResourceKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl<In, Spec, Status> Step<In, Resource<Spec, Status>> for BuildNewStateStep
where
    In: Send + Sync,
    Spec: ResourceSpec + Send + Sync,
    Status: ResourceStatus + Send + Sync,
{
    fn name(&self) -> &'static str {
        "build_new_state"
    }

    async fn execute(&self, ctx: &mut RequestContext<In, Resource<Spec, Status>>) -> Result<(), ForgeError> {
        let now = Utc::now();
        let resource = ctx
            .new_state_mut()
            .ok_or_else(|| ForgeError::internal("build_new_state: new_state missing"))?;

        resource.metadata.id = Some(ResourceId::generate(self.kind));
        if resource.metadata.org.is_empty() {
            resource.metadata.org = "local".to_string();
        }
        if resource.api_version.is_empty() {
            resource.api_version = self.kind.default_api_version().to_string();
        }
        if resource.kind.is_empty() {
            resource.kind = self.kind.as_str().to_string();
        }
        *resource.status.audit_block_mut() = AuditBlock::new_at(now, SYSTEM_PRINCIPAL);
        Ok(())
    }
}

pub struct BuildUpdateStateStep;

#[async_trait]
impl<In, Spec, Status> Step<In, Resource<Spec, Status>> for BuildUpdateStateStep
where
    In: Send + Sync,
    Spec: ResourceSpec + Send + Sync,
    Status: ResourceStatus + Send + Sync,
{
    fn name(&self) -> &'static str {
        "build_update_state"
    }

    async fn execute(&self, ctx: &mut RequestContext<In, Resource<Spec, Status>>) -> Result<(), ForgeError> {
        let existing: Resource<Spec, Status> = ctx
            .get_metadata(EXISTING_RESOURCE)
            .ok_or_else(|| ForgeError::internal("build_update_state: existing resource missing"))?;

        let now = Utc::now();
        let mut next = ctx
            .take_new_state()
            .ok_or_else(|| ForgeError::internal("build_update_state: new_state missing"))?;

        // spec §4.2: preserve id/slug/org and created_* audit from existing;
        // copy name/spec/labels/tags/status non-audit fields from the caller.
        next.metadata.id = existing.metadata.id.clone();
        next.metadata.slug = existing.metadata.slug.clone();
        next.metadata.org = existing.metadata.org.clone();
        next.api_version = existing.api_version.clone();
        next.kind = existing.kind.clone();

        let advanced = existing.status.audit_block().advance(now, SYSTEM_PRINCIPAL, "update");
        *next.status.audit_block_mut() = advanced;

        ctx.set_new_state(next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::EXISTING_RESOURCE;
    use crate::test_support::{DummyResource, DummySpec};
    use agentforge_core::audit::HasAuditBlock;
    use agentforge_core::metadata::ResourceMetadata;

    #[tokio::test]
    async fn build_new_state_assigns_id_and_fresh_audit() {
        let resource = DummyResource::new_input(DummySpec::default(), ResourceMetadata::default());
        let mut ctx: RequestContext<(), DummyResource> = RequestContext::new((), "sys");
        ctx.set_new_state(resource);

        BuildNewStateStep::new(ResourceKind::Skill).execute(&mut ctx).await.unwrap();

        let built = ctx.new_state_ref().unwrap();
        assert!(built.metadata.id.as_ref().unwrap().as_str().starts_with("skl-"));
        assert_eq!(built.metadata.org, "local");
        assert_eq!(built.status.audit_block().spec_audit.event, "create");
    }

    #[tokio::test]
    async fn build_update_state_preserves_identity_and_advances_audit() {
        let mut existing = DummyResource::new_input(
            DummySpec::default(),
            ResourceMetadata {
                slug: "my-skill".to_string(),
                org: "acme".to_string(),
                ..Default::default()
            },
        );
        existing.metadata.id = Some(agentforge_core::id::ResourceId::generate(ResourceKind::Skill));
        let original_created_at = existing.status.audit_block().spec_audit.created_at;

        let incoming = DummyResource::new_input(
            DummySpec { value: "v2".to_string(), tag: None },
            ResourceMetadata {
                name: "renamed".to_string(),
                ..Default::default()
            },
        );

        let mut ctx: RequestContext<(), DummyResource> = RequestContext::new((), "sys");
        ctx.put_metadata(EXISTING_RESOURCE, existing.clone());
        ctx.set_new_state(incoming);

        BuildUpdateStateStep.execute(&mut ctx).await.unwrap();

        let updated = ctx.new_state_ref().unwrap();
        assert_eq!(updated.metadata.id, existing.metadata.id);
        assert_eq!(updated.metadata.slug, "my-skill");
        assert_eq!(updated.metadata.org, "acme");
        assert_eq!(updated.metadata.name, "renamed");
        assert_eq!(updated.spec.value, "v2");
        assert_eq!(updated.status.audit_block().spec_audit.created_at, original_created_at);
        assert_eq!(updated.status.audit_block().spec_audit.event, "update");
    }
}
