//! Ordered, fail-fast execution of a step sequence.

use crate::context::RequestContext;
use crate::step::Step;
use agentforge_errors::ForgeError;
use tracing::instrument;

pub struct Pipeline<In, New> {
    name: &'static str,
    steps: Vec<Box<dyn Step<In, New>>>,
}

impl<In, New> Pipeline<In, New> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, step: impl Step<In, New> + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Runs every step in order against `ctx`, stopping at the first error.
    /// Each step executes inside its own tracing span so failures can be
    /// attributed to a specific pipeline stage.
    #[instrument(skip_all, fields(pipeline = self.name))]
    pub async fn run(&self, ctx: &mut RequestContext<In, New>) -> Result<(), ForgeError> {
        for step in &self.steps {
            let span = tracing::info_span!("step", pipeline = self.name, step = step.name());
            let _guard = span.enter();
            step.execute(ctx).await.map_err(|e| {
                tracing::warn!(pipeline = self.name, step = step.name(), error = %e, "pipeline step failed");
                e
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Increment;

    #[async_trait]
    impl Step<(), i32> for Increment {
        fn name(&self) -> &'static str {
            "increment"
        }

        async fn execute(&self, ctx: &mut RequestContext<(), i32>) -> Result<(), ForgeError> {
            let current = ctx.new_state_ref().copied().unwrap_or(0);
            ctx.set_new_state(current + 1);
            Ok(())
        }
    }

    struct AlwaysFails;

    #[async_trait]
    impl Step<(), i32> for AlwaysFails {
        fn name(&self) -> &'static str {
            "always_fails"
        }

        async fn execute(&self, _ctx: &mut RequestContext<(), i32>) -> Result<(), ForgeError> {
            Err(ForgeError::internal("boom"))
        }
    }

    #[tokio::test]
    async fn steps_run_in_order() {
        let pipeline = Pipeline::new("test").step(Increment).step(Increment).step(Increment);
        let mut ctx: RequestContext<(), i32> = RequestContext::new((), "sys");
        pipeline.run(&mut ctx).await.unwrap();
        assert_eq!(ctx.new_state_ref(), Some(&3));
    }

    #[tokio::test]
    async fn pipeline_stops_at_first_failure() {
        let pipeline = Pipeline::new("test").step(Increment).step(AlwaysFails).step(Increment);
        let mut ctx: RequestContext<(), i32> = RequestContext::new((), "sys");
        let result = pipeline.run(&mut ctx).await;
        assert!(result.is_err());
        assert_eq!(ctx.new_state_ref(), Some(&1));
    }
}
