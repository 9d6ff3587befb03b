//! `agentforge-bridge`
//!
//! The execution bridge (spec module C8): hands an `AgentExecution` or
//! `WorkflowExecution` off to a runtime and tracks its phase until it
//! settles. Generalized from the teacher's `kotoba_workflow_core::engine`
//! (`WorkflowEngineInterface`, an `Arc<RwLock<HashMap<..>>>` execution
//! table, and a `tokio::spawn`-simulated run) into a kind-agnostic trait
//! covering both agent and workflow executions, since the control plane's
//! bridge contract is identical for either.

mod controllers;
mod retry;

pub use controllers::{AgentExecutionController, WorkflowExecutionController};
pub use retry::connect_with_retry;

use agentforge_errors::ForgeError;
use agentforge_resources::ExecutionPhase;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;
use ulid::Ulid;

/// What a controller hands the bridge to begin a run. `kind_label` is
/// purely for logging — the bridge does not branch on agent vs. workflow.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub kind_label: &'static str,
    pub target_id: String,
    pub input: serde_json::Value,
}

/// Implemented by whatever actually runs agent/workflow executions.
/// `InProcessExecutionBridge` is the only implementation the local control
/// plane ships; a cloud tier would implement this against a real runtime
/// without the resource controllers needing to change.
#[async_trait]
pub trait ExecutionBridge: Send + Sync {
    async fn start(&self, request: ExecutionRequest) -> Result<String, ForgeError>;

    async fn poll(&self, run_handle: &str) -> Result<ExecutionOutcome, ForgeError>;

    async fn cancel(&self, run_handle: &str) -> Result<(), ForgeError>;
}

#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub phase: ExecutionPhase,
    pub output: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl ExecutionOutcome {
    fn pending() -> Self {
        ExecutionOutcome {
            phase: ExecutionPhase::Pending,
            output: None,
            error: None,
        }
    }
}

/// In-memory simulated bridge: every run "completes" after a short delay on
/// its own `tokio::spawn`ed task, mirroring the teacher's
/// `WorkflowEngine::start_workflow` simulation rather than driving a real
/// sandbox (spec Non-goals: no real agent/workflow runtime in this repo).
#[derive(Clone)]
pub struct InProcessExecutionBridge {
    runs: Arc<RwLock<HashMap<String, ExecutionOutcome>>>,
    simulated_run_time: Duration,
}

impl InProcessExecutionBridge {
    pub fn new() -> Self {
        Self {
            runs: Arc::new(RwLock::new(HashMap::new())),
            simulated_run_time: Duration::from_millis(50),
        }
    }

    pub fn with_simulated_run_time(mut self, duration: Duration) -> Self {
        self.simulated_run_time = duration;
        self
    }
}

impl Default for InProcessExecutionBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionBridge for InProcessExecutionBridge {
    async fn start(&self, request: ExecutionRequest) -> Result<String, ForgeError> {
        let run_handle = format!("run-{}", Ulid::new());
        debug!(kind = request.kind_label, target = %request.target_id, handle = %run_handle, "starting execution");

        self.runs
            .write()
            .await
            .insert(run_handle.clone(), ExecutionOutcome::pending());

        let runs = Arc::clone(&self.runs);
        let handle_for_task = run_handle.clone();
        let delay = self.simulated_run_time;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut runs = runs.write().await;
            // Idempotent: a concurrent cancel may have already settled this
            // run, in which case the simulated completion must not clobber it.
            if let Some(outcome) = runs.get_mut(&handle_for_task) {
                if outcome.phase == ExecutionPhase::Pending || outcome.phase == ExecutionPhase::InProgress {
                    outcome.phase = ExecutionPhase::Completed;
                    outcome.output = Some(serde_json::json!({ "status": "ok" }));
                }
            }
        });

        Ok(run_handle)
    }

    async fn poll(&self, run_handle: &str) -> Result<ExecutionOutcome, ForgeError> {
        self.runs
            .read()
            .await
            .get(run_handle)
            .cloned()
            .ok_or_else(|| ForgeError::not_found(format!("execution run '{run_handle}' not found")))
    }

    async fn cancel(&self, run_handle: &str) -> Result<(), ForgeError> {
        let mut runs = self.runs.write().await;
        let outcome = runs
            .get_mut(run_handle)
            .ok_or_else(|| ForgeError::not_found(format!("execution run '{run_handle}' not found")))?;

        // Cancelling a settled run is a no-op, not an error: the caller
        // racing the simulated completion should not see a spurious failure.
        if matches!(outcome.phase, ExecutionPhase::Completed | ExecutionPhase::Failed | ExecutionPhase::Cancelled) {
            return Ok(());
        }
        outcome.phase = ExecutionPhase::Cancelled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ExecutionRequest {
        ExecutionRequest {
            kind_label: "agent_execution",
            target_id: "ain-test".to_string(),
            input: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn start_then_poll_transitions_to_completed() {
        let bridge = InProcessExecutionBridge::new().with_simulated_run_time(Duration::from_millis(5));
        let handle = bridge.start(request()).await.unwrap();

        assert_eq!(bridge.poll(&handle).await.unwrap().phase, ExecutionPhase::Pending);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(bridge.poll(&handle).await.unwrap().phase, ExecutionPhase::Completed);
    }

    #[tokio::test]
    async fn cancel_before_completion_wins() {
        let bridge = InProcessExecutionBridge::new().with_simulated_run_time(Duration::from_secs(5));
        let handle = bridge.start(request()).await.unwrap();

        bridge.cancel(&handle).await.unwrap();
        assert_eq!(bridge.poll(&handle).await.unwrap().phase, ExecutionPhase::Cancelled);
    }

    #[tokio::test]
    async fn cancel_after_completion_is_a_no_op() {
        let bridge = InProcessExecutionBridge::new().with_simulated_run_time(Duration::from_millis(5));
        let handle = bridge.start(request()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        bridge.cancel(&handle).await.unwrap();
        assert_eq!(bridge.poll(&handle).await.unwrap().phase, ExecutionPhase::Completed);
    }

    #[tokio::test]
    async fn poll_unknown_handle_is_not_found() {
        let bridge = InProcessExecutionBridge::new();
        let err = bridge.poll("run-does-not-exist").await.unwrap_err();
        assert_eq!(err.code(), agentforge_errors::Code::NotFound);
    }
}
