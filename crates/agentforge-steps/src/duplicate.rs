//! `CheckDuplicateStep`: rejects a create when `(kind, org, slug)` already
//! has a live record.

use agentforge_core::kind::ResourceKind;
use agentforge_core::resource::{Resource, ResourceSpec, ResourceStatus};
use agentforge_errors::ForgeError;
use agentforge_pipeline::{RequestContext, Step};
use agentforge_store::{keys, KvStore};
use async_trait::async_trait;

pub struct CheckDuplicateStep {
    pub kind: ResourceKind,
    pub store: KvStore,
}

impl CheckDuplicateStep {
    pub fn new(kind: ResourceKind, store: KvStore) -> Self {
        Self { kind, store }
    }
}

#[async_trait]
impl<In, Spec, Status> Step<In, Resource<Spec, Status>> for CheckDuplicateStep
where
    In: Send + Sync,
    Spec: ResourceSpec + Send + Sync,
    Status: ResourceStatus + Send + Sync,
{
    fn name(&self) -> &'static str {
        "check_duplicate"
    }

    async fn execute(&self, ctx: &mut RequestContext<In, Resource<Spec, Status>>) -> Result<(), ForgeError> {
        let resource = ctx
            .new_state_ref()
            .ok_or_else(|| ForgeError::internal("check_duplicate: new_state missing"))?;
        let org = resource.metadata.org_or_local().to_string();
        let slug = resource.metadata.slug.clone();

        let key = keys::slug_index(self.kind.as_str(), &org, &slug);
        if self.store.get(key).await?.is_some() {
            return Err(ForgeError::already_exists(format!(
                "{} with slug '{}' already exists in org '{}'",
                self.kind, slug, org
            )));
        }
        Ok(())
    }
}
