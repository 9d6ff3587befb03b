//! Generic per-kind resource controller (spec module C5): composes the
//! standard step library into the five shared pipelines every kind gets
//! for free. Kind-specific post-steps (Agent/Workflow create) wrap this
//! controller rather than subclassing it — see `agent.rs`/`workflow.rs`.

use agentforge_core::id_request::IdRequest;
use agentforge_core::kind::ResourceKind;
use agentforge_core::reference::ResourceReference;
use agentforge_core::resource::{Resource, ResourceSpec, ResourceStatus};
use agentforge_errors::ForgeError;
use agentforge_pipeline::{Pipeline, RequestContext};
use agentforge_steps::keys::EXISTING_RESOURCE;
use agentforge_steps::{
    BuildNewStateStep, BuildUpdateStateStep, CheckDuplicateStep, DeleteResourceStep, ExtractResourceIdStep,
    LoadByReferenceStep, LoadExistingForDeleteStep, LoadForApplyStep, LoadTargetStep, ResolveSlugStep,
    ValidateProtoStep, ValidateRequestStep,
};
use agentforge_store::KvStore;

pub struct ResourceController<Spec, Status> {
    pub kind: ResourceKind,
    pub store: KvStore,
    _marker: std::marker::PhantomData<fn() -> (Spec, Status)>,
}

impl<Spec, Status> Clone for ResourceController<Spec, Status> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            store: self.store.clone(),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<Spec, Status> ResourceController<Spec, Status>
where
    Spec: ResourceSpec + Send + Sync + 'static,
    Status: ResourceStatus + Send + Sync + 'static,
{
    pub fn new(kind: ResourceKind, store: KvStore) -> Self {
        Self {
            kind,
            store,
            _marker: std::marker::PhantomData,
        }
    }

    /// `ResolveSlug → ValidateProto → CheckDuplicate → BuildNewState → Persist`
    /// (spec §4.3). The kind-specific post-step, if any, runs after this
    /// returns successfully.
    pub async fn create(&self, input: Resource<Spec, Status>, principal: &str) -> Result<Resource<Spec, Status>, ForgeError> {
        let pipeline = Pipeline::new("create")
            .step(ResolveSlugStep)
            .step(ValidateProtoStep)
            .step(CheckDuplicateStep::new(self.kind, self.store.clone()))
            .step(BuildNewStateStep::new(self.kind))
            .step(agentforge_steps::persist::PersistStep::new(self.kind, self.store.clone()));

        let mut ctx = RequestContext::new_with_input(input, principal);
        pipeline.run(&mut ctx).await?;
        ctx.take_new_state()
            .ok_or_else(|| ForgeError::internal("create: pipeline produced no resource"))
    }

    /// `ResolveSlug → ValidateProto → LoadExisting → BuildUpdateState → Persist`.
    /// "LoadExisting" is `LoadByReferenceStep` keyed on the input's slug.
    pub async fn update(&self, input: Resource<Spec, Status>, principal: &str) -> Result<Resource<Spec, Status>, ForgeError> {
        let pipeline = Pipeline::new("update")
            .step(ResolveSlugStep)
            .step(ValidateProtoStep)
            .step(LoadByReferenceStep::new(self.kind, self.store.clone()))
            .step(BuildUpdateStateStep)
            .step(agentforge_steps::persist::PersistStep::new(self.kind, self.store.clone()));

        let mut ctx = RequestContext::new_with_input(input, principal);
        pipeline.run(&mut ctx).await?;
        ctx.take_new_state()
            .ok_or_else(|| ForgeError::internal("update: pipeline produced no resource"))
    }

    /// `ValidateProto → ExtractResourceId → LoadExistingForDelete → DeleteResource`.
    pub async fn delete(&self, id: IdRequest, principal: &str) -> Result<Resource<Spec, Status>, ForgeError> {
        let pipeline = Pipeline::new("delete")
            .step(ValidateRequestStep)
            .step(ExtractResourceIdStep)
            .step(LoadExistingForDeleteStep::new(self.kind, self.store.clone()))
            .step(DeleteResourceStep::new(self.kind, self.store.clone()));

        let mut ctx: RequestContext<IdRequest, Resource<Spec, Status>> = RequestContext::new(id, principal);
        pipeline.run(&mut ctx).await?;
        ctx.take_new_state()
            .ok_or_else(|| ForgeError::internal("delete: pipeline produced no resource"))
    }

    /// `ValidateProto → LoadTarget`.
    pub async fn get(&self, id: IdRequest, principal: &str) -> Result<Resource<Spec, Status>, ForgeError> {
        let pipeline = Pipeline::new("get")
            .step(ValidateRequestStep)
            .step(LoadTargetStep::new(self.kind, self.store.clone()));

        let mut ctx: RequestContext<IdRequest, Resource<Spec, Status>> = RequestContext::new(id, principal);
        pipeline.run(&mut ctx).await?;
        ctx.get_metadata(EXISTING_RESOURCE)
            .ok_or_else(|| ForgeError::internal("get: pipeline produced no resource"))
    }

    /// `ValidateProto → LoadByReference`.
    pub async fn get_by_reference(
        &self,
        reference: ResourceReference,
        principal: &str,
    ) -> Result<Resource<Spec, Status>, ForgeError> {
        let pipeline = Pipeline::new("get_by_reference")
            .step(ValidateRequestStep)
            .step(LoadByReferenceStep::new(self.kind, self.store.clone()));

        let mut ctx: RequestContext<ResourceReference, Resource<Spec, Status>> =
            RequestContext::new(reference, principal);
        pipeline.run(&mut ctx).await?;
        ctx.get_metadata(EXISTING_RESOURCE)
            .ok_or_else(|| ForgeError::internal("get_by_reference: pipeline produced no resource"))
    }

    /// `ResolveSlug → ValidateProto → LoadForApply → (dispatch create/update)`.
    /// Apply is a branch, not a new load: if nothing exists at the input's
    /// slug, run the create pipeline on the input; otherwise run update with
    /// the loaded `existing` already populated.
    pub async fn apply(&self, input: Resource<Spec, Status>, principal: &str) -> Result<Resource<Spec, Status>, ForgeError> {
        let prelude = Pipeline::new("apply_prelude")
            .step(ResolveSlugStep)
            .step(ValidateProtoStep)
            .step(LoadForApplyStep::new(self.kind, self.store.clone()));

        let mut ctx: RequestContext<Resource<Spec, Status>, Resource<Spec, Status>> =
            RequestContext::new_with_input(input, principal);
        prelude.run(&mut ctx).await?;

        if ctx.has_metadata(EXISTING_RESOURCE) {
            let update_tail = Pipeline::new("apply_update")
                .step(BuildUpdateStateStep)
                .step(agentforge_steps::persist::PersistStep::new(self.kind, self.store.clone()));
            update_tail.run(&mut ctx).await?;
        } else {
            let create_tail = Pipeline::new("apply_create")
                .step(CheckDuplicateStep::new(self.kind, self.store.clone()))
                .step(BuildNewStateStep::new(self.kind))
                .step(agentforge_steps::persist::PersistStep::new(self.kind, self.store.clone()));
            create_tail.run(&mut ctx).await?;
        }

        ctx.take_new_state()
            .ok_or_else(|| ForgeError::internal("apply: pipeline produced no resource"))
    }
}
