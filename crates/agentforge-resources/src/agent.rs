//! `AgentController`: the generic controller plus the Agent-create
//! post-step (spec §4.3): spawn a default `AgentInstance` and record its
//! id on the agent's status.

use crate::clients::CrossResourceClient;
use crate::controller::ResourceController;
use crate::types::{Agent, AgentInstance, AgentInstanceSpec};
use agentforge_core::audit::SYSTEM_PRINCIPAL;
use agentforge_core::kind::ResourceKind;
use agentforge_core::metadata::ResourceMetadata;
use agentforge_core::reference::ResourceReference;
use agentforge_errors::ForgeError;
use agentforge_store::KvStore;
use tracing::debug;

#[derive(Clone)]
pub struct AgentController {
    pub inner: ResourceController<crate::types::AgentSpec, crate::types::AgentStatus>,
    pub agent_instance_client: CrossResourceClient<AgentInstanceSpec, crate::types::AgentInstanceStatus>,
}

impl AgentController {
    pub fn new(
        store: KvStore,
        agent_instance_client: CrossResourceClient<AgentInstanceSpec, crate::types::AgentInstanceStatus>,
    ) -> Self {
        Self {
            inner: ResourceController::new(ResourceKind::Agent, store),
            agent_instance_client,
        }
    }

    pub async fn create(&self, input: Agent, principal: &str) -> Result<Agent, ForgeError> {
        let mut agent = self.inner.create(input, principal).await?;

        if !self.agent_instance_client.is_wired() {
            debug!("agent_instance client not wired, skipping default instance creation");
            return Ok(agent);
        }

        let instance_input = AgentInstance::new_input(
            AgentInstanceSpec {
                agent_ref: ResourceReference {
                    scope: agent.metadata.owner_scope,
                    org: agent.metadata.org.clone(),
                    kind: ResourceKind::Agent.as_str().to_string(),
                    slug: agent.metadata.slug.clone(),
                    version: None,
                },
                environment_ref: None,
            },
            ResourceMetadata {
                name: format!("agent-{}-default", agent.metadata.slug),
                org: agent.metadata.org.clone(),
                ..Default::default()
            },
        );

        match self.agent_instance_client.create_as_system(instance_input).await {
            Ok(instance) => {
                agent.status.default_instance_id = instance.metadata.id.map(|id| id.as_str().to_string());
                agent = self.inner.update(agent, SYSTEM_PRINCIPAL).await?;
            }
            Err(err) => return Err(ForgeError::dependency(err)),
        }

        Ok(agent)
    }

    pub async fn update(&self, input: Agent, principal: &str) -> Result<Agent, ForgeError> {
        self.inner.update(input, principal).await
    }

    pub async fn delete(&self, id: agentforge_core::id_request::IdRequest, principal: &str) -> Result<Agent, ForgeError> {
        self.inner.delete(id, principal).await
    }

    pub async fn get(&self, id: agentforge_core::id_request::IdRequest, principal: &str) -> Result<Agent, ForgeError> {
        self.inner.get(id, principal).await
    }

    pub async fn get_by_reference(&self, reference: ResourceReference, principal: &str) -> Result<Agent, ForgeError> {
        self.inner.get_by_reference(reference, principal).await
    }

    pub async fn apply(&self, input: Agent, principal: &str) -> Result<Agent, ForgeError> {
        self.inner.apply(input, principal).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentforge_store::KvStore;

    #[tokio::test]
    async fn create_skips_default_instance_when_client_unwired() {
        let controller = AgentController::new(KvStore::in_memory(), CrossResourceClient::unwired("agent_instances"));
        let input = Agent::new_input(
            crate::types::AgentSpec::default(),
            ResourceMetadata {
                name: "Reviewer".to_string(),
                ..Default::default()
            },
        );

        let agent = controller.create(input, "alice").await.unwrap();

        assert_eq!(agent.metadata.slug, "reviewer");
        assert!(agent.status.default_instance_id.is_none());
    }
}
