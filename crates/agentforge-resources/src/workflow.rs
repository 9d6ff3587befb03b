//! `WorkflowController`: the generic controller plus the Workflow-create
//! post-step, analogous to `AgentController`'s default `AgentInstance`.

use crate::clients::CrossResourceClient;
use crate::controller::ResourceController;
use crate::types::{Workflow, WorkflowInstance, WorkflowInstanceSpec};
use agentforge_core::audit::SYSTEM_PRINCIPAL;
use agentforge_core::kind::ResourceKind;
use agentforge_core::metadata::ResourceMetadata;
use agentforge_core::reference::ResourceReference;
use agentforge_errors::ForgeError;
use agentforge_store::KvStore;
use tracing::debug;

#[derive(Clone)]
pub struct WorkflowController {
    pub inner: ResourceController<crate::types::WorkflowSpec, crate::types::WorkflowStatus>,
    pub workflow_instance_client: CrossResourceClient<WorkflowInstanceSpec, crate::types::WorkflowInstanceStatus>,
}

impl WorkflowController {
    pub fn new(
        store: KvStore,
        workflow_instance_client: CrossResourceClient<WorkflowInstanceSpec, crate::types::WorkflowInstanceStatus>,
    ) -> Self {
        Self {
            inner: ResourceController::new(ResourceKind::Workflow, store),
            workflow_instance_client,
        }
    }

    pub async fn create(&self, input: Workflow, principal: &str) -> Result<Workflow, ForgeError> {
        let mut workflow = self.inner.create(input, principal).await?;

        if !self.workflow_instance_client.is_wired() {
            debug!("workflow_instance client not wired, skipping default instance creation");
            return Ok(workflow);
        }

        let instance_input = WorkflowInstance::new_input(
            WorkflowInstanceSpec {
                workflow_ref: ResourceReference {
                    scope: workflow.metadata.owner_scope,
                    org: workflow.metadata.org.clone(),
                    kind: ResourceKind::Workflow.as_str().to_string(),
                    slug: workflow.metadata.slug.clone(),
                    version: None,
                },
                environment_ref: None,
            },
            ResourceMetadata {
                name: format!("workflow-{}-default", workflow.metadata.slug),
                org: workflow.metadata.org.clone(),
                ..Default::default()
            },
        );

        match self.workflow_instance_client.create_as_system(instance_input).await {
            Ok(instance) => {
                workflow.status.default_instance_id = instance.metadata.id.map(|id| id.as_str().to_string());
                workflow = self.inner.update(workflow, SYSTEM_PRINCIPAL).await?;
            }
            Err(err) => return Err(ForgeError::dependency(err)),
        }

        Ok(workflow)
    }

    pub async fn update(&self, input: Workflow, principal: &str) -> Result<Workflow, ForgeError> {
        self.inner.update(input, principal).await
    }

    pub async fn delete(&self, id: agentforge_core::id_request::IdRequest, principal: &str) -> Result<Workflow, ForgeError> {
        self.inner.delete(id, principal).await
    }

    pub async fn get(&self, id: agentforge_core::id_request::IdRequest, principal: &str) -> Result<Workflow, ForgeError> {
        self.inner.get(id, principal).await
    }

    pub async fn get_by_reference(&self, reference: ResourceReference, principal: &str) -> Result<Workflow, ForgeError> {
        self.inner.get_by_reference(reference, principal).await
    }

    pub async fn apply(&self, input: Workflow, principal: &str) -> Result<Workflow, ForgeError> {
        self.inner.apply(input, principal).await
    }
}
