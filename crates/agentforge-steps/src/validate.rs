//! `ValidateProtoStep` and `ValidateRequestStep`: schema-level validation.
//!
//! The spec names a single "ValidateProtoStep" but uses it at two different
//! points in the pipeline composition (§4.3): validating the resource being
//! built (create/update/apply, after slug resolution) and validating the
//! bare wrapper request (get-by-id/get-by-reference/delete, which never
//! populate `new_state`). Rust's type system makes that split explicit as
//! two small step types rather than one step doing a runtime type check.

use agentforge_core::id_request::IdRequest;
use agentforge_core::reference::ResourceReference;
use agentforge_core::resource::{Resource, ResourceSpec, ResourceStatus};
use agentforge_core::slug::is_valid_slug;
use agentforge_errors::ForgeError;
use agentforge_pipeline::{RequestContext, Step};
use async_trait::async_trait;

/// Validates the resource under construction. Runs after slug resolution
/// so the slug-format invariant holds (spec §4.2: "Must run after
/// ResolveSlugStep so slug constraints hold").
pub struct ValidateProtoStep;

#[async_trait]
impl<In, Spec, Status> Step<In, Resource<Spec, Status>> for ValidateProtoStep
where
    In: Send + Sync,
    Spec: ResourceSpec + Send + Sync,
    Status: ResourceStatus + Send + Sync,
{
    fn name(&self) -> &'static str {
        "validate_proto"
    }

    async fn execute(&self, ctx: &mut RequestContext<In, Resource<Spec, Status>>) -> Result<(), ForgeError> {
        let resource = ctx
            .new_state_ref()
            .ok_or_else(|| ForgeError::internal("validate_proto: new_state missing"))?;

        if !resource.metadata.slug.is_empty() && !is_valid_slug(&resource.metadata.slug) {
            return Err(ForgeError::validation_at(
                "metadata.slug",
                format!("slug '{}' is not a valid slug", resource.metadata.slug),
            ));
        }

        resource.spec.validate()?;
        Ok(())
    }
}

/// Validates a bare wrapper request (`IdRequest` or `ResourceReference`)
/// before it reaches a load/delete step.
pub trait ValidatableRequest {
    fn validate_request(&self) -> Result<(), ForgeError>;
}

impl ValidatableRequest for IdRequest {
    fn validate_request(&self) -> Result<(), ForgeError> {
        self.validate_non_empty()
    }
}

impl ValidatableRequest for ResourceReference {
    fn validate_request(&self) -> Result<(), ForgeError> {
        self.validate_format()
    }
}

pub struct ValidateRequestStep;

#[async_trait]
impl<In, New> Step<In, New> for ValidateRequestStep
where
    In: ValidatableRequest + Send + Sync,
    New: Send + Sync,
{
    fn name(&self) -> &'static str {
        "validate_request"
    }

    async fn execute(&self, ctx: &mut RequestContext<In, New>) -> Result<(), ForgeError> {
        ctx.input.validate_request()
    }
}
