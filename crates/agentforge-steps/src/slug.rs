//! `ResolveSlugStep`: derive or pass through `metadata.slug`.

use crate::keys::RESOLVED_SLUG;
use agentforge_core::resource::{Resource, ResourceSpec, ResourceStatus};
use agentforge_core::slug::slugify;
use agentforge_errors::ForgeError;
use agentforge_pipeline::{RequestContext, Step};
use async_trait::async_trait;

pub struct ResolveSlugStep;

#[async_trait]
impl<In, Spec, Status> Step<In, Resource<Spec, Status>> for ResolveSlugStep
where
    In: Send + Sync,
    Spec: ResourceSpec + Send + Sync,
    Status: ResourceStatus + Send + Sync,
{
    fn name(&self) -> &'static str {
        "resolve_slug"
    }

    async fn execute(&self, ctx: &mut RequestContext<In, Resource<Spec, Status>>) -> Result<(), ForgeError> {
        let resource = ctx
            .new_state_mut()
            .ok_or_else(|| ForgeError::internal("resolve_slug: new_state missing"))?;

        let resolved = if !resource.metadata.slug.is_empty() {
            resource.metadata.slug.clone()
        } else {
            slugify(&resource.metadata.name)
        };

        if resolved.is_empty() {
            return Err(ForgeError::validation_at(
                "metadata.name",
                "name or slug is required",
            ));
        }

        resource.metadata.slug = resolved.clone();
        ctx.put_metadata(RESOLVED_SLUG, resolved);
        Ok(())
    }
}
