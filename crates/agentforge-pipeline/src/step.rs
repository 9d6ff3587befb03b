//! The `Step` trait: a single unit of pipeline work.

use crate::context::RequestContext;
use agentforge_errors::ForgeError;
use async_trait::async_trait;

/// One step in a resource request pipeline. Steps run strictly in the
/// order the [`crate::Pipeline`] was built with; the first step to return
/// `Err` stops execution (spec §4.1: "fail-fast, no rollback of prior
/// steps' in-memory effects, since nothing is persisted until `PersistStep`
/// runs").
#[async_trait]
pub trait Step<In, New>: Send + Sync {
    /// Stable, human-readable name used in tracing spans and error context.
    fn name(&self) -> &'static str;

    async fn execute(&self, ctx: &mut RequestContext<In, New>) -> Result<(), ForgeError>;
}
