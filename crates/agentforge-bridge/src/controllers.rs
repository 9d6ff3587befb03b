//! `AgentExecutionController`/`WorkflowExecutionController`: the generic
//! controller plus the execution-create post-step (spec §4.6) that submits
//! the new record to the [`crate::ExecutionBridge`] and persists the
//! returned run handle, analogous to `agentforge_resources`'s
//! `AgentController`/`WorkflowController` wrapping pattern.

use crate::{ExecutionBridge, ExecutionRequest};
use agentforge_core::id_request::IdRequest;
use agentforge_core::kind::ResourceKind;
use agentforge_core::reference::ResourceReference;
use agentforge_errors::ForgeError;
use agentforge_resources::{
    AgentExecution, AgentExecutionSpec, AgentExecutionStatus, ExecutionPhase, ResourceController, WorkflowExecution,
    WorkflowExecutionSpec, WorkflowExecutionStatus,
};
use agentforge_store::KvStore;
use std::sync::Arc;

/// Submits `request` to `bridge`, mapping any failure to `FailedPrecondition`
/// per spec §4.6 ("submit is rejected if the bridge is unavailable").
async fn submit(bridge: &Arc<dyn ExecutionBridge>, request: ExecutionRequest) -> Result<String, ForgeError> {
    bridge
        .start(request)
        .await
        .map_err(|err| ForgeError::failed_precondition(format!("execution bridge unavailable: {err}")))
}

#[derive(Clone)]
pub struct AgentExecutionController {
    pub inner: ResourceController<AgentExecutionSpec, AgentExecutionStatus>,
    pub bridge: Arc<dyn ExecutionBridge>,
}

impl AgentExecutionController {
    pub fn new(store: KvStore, bridge: Arc<dyn ExecutionBridge>) -> Self {
        Self {
            inner: ResourceController::new(ResourceKind::AgentExecution, store),
            bridge,
        }
    }

    pub async fn create(&self, input: AgentExecution, principal: &str) -> Result<AgentExecution, ForgeError> {
        let mut execution = self.inner.create(input, principal).await?;

        let target_id = execution.metadata.id.as_ref().map(|id| id.as_str().to_string()).unwrap_or_default();
        let run_handle = submit(
            &self.bridge,
            ExecutionRequest {
                kind_label: "agent_execution",
                target_id,
                input: execution.spec.input.clone(),
            },
        )
        .await?;

        execution.status.phase = ExecutionPhase::InProgress;
        execution.status.run_handle = Some(run_handle);
        self.inner.update(execution, agentforge_core::audit::SYSTEM_PRINCIPAL).await
    }

    pub async fn update(&self, input: AgentExecution, principal: &str) -> Result<AgentExecution, ForgeError> {
        self.inner.update(input, principal).await
    }

    pub async fn delete(&self, id: IdRequest, principal: &str) -> Result<AgentExecution, ForgeError> {
        self.inner.delete(id, principal).await
    }

    pub async fn get(&self, id: IdRequest, principal: &str) -> Result<AgentExecution, ForgeError> {
        self.inner.get(id, principal).await
    }

    pub async fn get_by_reference(&self, reference: ResourceReference, principal: &str) -> Result<AgentExecution, ForgeError> {
        self.inner.get_by_reference(reference, principal).await
    }

    pub async fn apply(&self, input: AgentExecution, principal: &str) -> Result<AgentExecution, ForgeError> {
        self.inner.apply(input, principal).await
    }
}

#[derive(Clone)]
pub struct WorkflowExecutionController {
    pub inner: ResourceController<WorkflowExecutionSpec, WorkflowExecutionStatus>,
    pub bridge: Arc<dyn ExecutionBridge>,
}

impl WorkflowExecutionController {
    pub fn new(store: KvStore, bridge: Arc<dyn ExecutionBridge>) -> Self {
        Self {
            inner: ResourceController::new(ResourceKind::WorkflowExecution, store),
            bridge,
        }
    }

    pub async fn create(&self, input: WorkflowExecution, principal: &str) -> Result<WorkflowExecution, ForgeError> {
        let mut execution = self.inner.create(input, principal).await?;

        let target_id = execution.metadata.id.as_ref().map(|id| id.as_str().to_string()).unwrap_or_default();
        let run_handle = submit(
            &self.bridge,
            ExecutionRequest {
                kind_label: "workflow_execution",
                target_id,
                input: execution.spec.input.clone(),
            },
        )
        .await?;

        execution.status.phase = ExecutionPhase::InProgress;
        execution.status.run_handle = Some(run_handle);
        self.inner.update(execution, agentforge_core::audit::SYSTEM_PRINCIPAL).await
    }

    pub async fn update(&self, input: WorkflowExecution, principal: &str) -> Result<WorkflowExecution, ForgeError> {
        self.inner.update(input, principal).await
    }

    pub async fn delete(&self, id: IdRequest, principal: &str) -> Result<WorkflowExecution, ForgeError> {
        self.inner.delete(id, principal).await
    }

    pub async fn get(&self, id: IdRequest, principal: &str) -> Result<WorkflowExecution, ForgeError> {
        self.inner.get(id, principal).await
    }

    pub async fn get_by_reference(
        &self,
        reference: ResourceReference,
        principal: &str,
    ) -> Result<WorkflowExecution, ForgeError> {
        self.inner.get_by_reference(reference, principal).await
    }

    pub async fn apply(&self, input: WorkflowExecution, principal: &str) -> Result<WorkflowExecution, ForgeError> {
        self.inner.apply(input, principal).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InProcessExecutionBridge;
    use agentforge_core::metadata::ResourceMetadata;
    use agentforge_core::reference::ResourceReference;
    use std::time::Duration;

    fn agent_instance_ref() -> ResourceReference {
        ResourceReference {
            scope: Default::default(),
            org: String::new(),
            kind: "agent_instance".to_string(),
            slug: "my-instance".to_string(),
            version: None,
        }
    }

    #[tokio::test]
    async fn create_submits_to_the_bridge_and_persists_the_run_handle() {
        let bridge: Arc<dyn ExecutionBridge> =
            Arc::new(InProcessExecutionBridge::new().with_simulated_run_time(Duration::from_secs(5)));
        let controller = AgentExecutionController::new(KvStore::in_memory(), bridge);

        let input = AgentExecution::new_input(
            AgentExecutionSpec {
                agent_instance_ref: agent_instance_ref(),
                input: serde_json::json!({"prompt": "hi"}),
            },
            ResourceMetadata {
                name: "run-1".to_string(),
                ..Default::default()
            },
        );

        let execution = controller.create(input, "alice").await.unwrap();

        assert_eq!(execution.status.phase, ExecutionPhase::InProgress);
        assert!(execution.status.run_handle.is_some());
    }

    #[tokio::test]
    async fn create_fails_precondition_when_bridge_start_errors() {
        struct AlwaysDown;

        #[async_trait::async_trait]
        impl ExecutionBridge for AlwaysDown {
            async fn start(&self, _request: ExecutionRequest) -> Result<String, ForgeError> {
                Err(ForgeError::internal("bridge offline"))
            }
            async fn poll(&self, _run_handle: &str) -> Result<crate::ExecutionOutcome, ForgeError> {
                unreachable!()
            }
            async fn cancel(&self, _run_handle: &str) -> Result<(), ForgeError> {
                unreachable!()
            }
        }

        let bridge: Arc<dyn ExecutionBridge> = Arc::new(AlwaysDown);
        let controller = AgentExecutionController::new(KvStore::in_memory(), bridge);

        let input = AgentExecution::new_input(
            AgentExecutionSpec {
                agent_instance_ref: agent_instance_ref(),
                input: serde_json::json!({}),
            },
            ResourceMetadata {
                name: "run-2".to_string(),
                ..Default::default()
            },
        );

        let err = controller.create(input, "alice").await.unwrap_err();
        assert_eq!(err.code(), agentforge_errors::Code::FailedPrecondition);
    }
}
