//! Per-kind `Spec`/`Status` payloads (spec §3.1). The shared envelope
//! fields (`api_version`, `kind`, `metadata`) live in
//! `agentforge_core::resource::Resource`; everything here is
//! kind-specific.

use agentforge_core::audit::{AuditBlock, HasAuditBlock};
use agentforge_core::reference::ResourceReference;
use agentforge_core::resource::{Resource, ResourceSpec, ResourceStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Phase of an execution tracked by the Execution Bridge (spec §4.6):
/// `PENDING → IN_PROGRESS → COMPLETED|FAILED|CANCELLED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionPhase {
    Pending,
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

impl Default for ExecutionPhase {
    fn default() -> Self {
        ExecutionPhase::Pending
    }
}

macro_rules! status_with_audit {
    ($name:ident { $($field:ident: $ty:ty),* $(,)? }) => {
        #[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
        pub struct $name {
            #[serde(default)]
            pub audit: AuditBlock,
            $(#[serde(default)] pub $field: $ty,)*
        }

        impl HasAuditBlock for $name {
            fn audit_block(&self) -> &AuditBlock {
                &self.audit
            }
            fn audit_block_mut(&mut self) -> &mut AuditBlock {
                &mut self.audit
            }
        }

        impl ResourceStatus for $name {}
    };
}

// ---- Agent ----------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AgentSpec {
    #[serde(default)]
    pub skill_refs: Vec<ResourceReference>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub instructions: String,
}
impl ResourceSpec for AgentSpec {}

status_with_audit!(AgentStatus {
    default_instance_id: Option<String>,
    phase: String,
});

pub type Agent = Resource<AgentSpec, AgentStatus>;

// ---- AgentInstance ----------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AgentInstanceSpec {
    pub agent_ref: ResourceReference,
    #[serde(default)]
    pub environment_ref: Option<ResourceReference>,
}
impl ResourceSpec for AgentInstanceSpec {
    fn validate(&self) -> Result<(), agentforge_errors::ForgeError> {
        self.agent_ref.validate_format()
    }
}

status_with_audit!(AgentInstanceStatus { phase: String });

pub type AgentInstance = Resource<AgentInstanceSpec, AgentInstanceStatus>;

// ---- Skill --------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SkillSpec {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tag: Option<String>,
}
impl ResourceSpec for SkillSpec {
    fn version_tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

// Hand-rolled rather than `status_with_audit!`: Skill is the one kind whose
// status needs a non-default `ResourceStatus::content_hash` so version-hash
// reference resolution (`LoadByReferenceStep`) can find it generically.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SkillStatus {
    #[serde(default)]
    pub audit: AuditBlock,
    #[serde(default)]
    pub artifact_storage_key: String,
    #[serde(default)]
    pub version_hash: String,
}

impl HasAuditBlock for SkillStatus {
    fn audit_block(&self) -> &AuditBlock {
        &self.audit
    }
    fn audit_block_mut(&mut self) -> &mut AuditBlock {
        &mut self.audit
    }
}

impl ResourceStatus for SkillStatus {
    fn content_hash(&self) -> Option<&str> {
        if self.version_hash.is_empty() {
            None
        } else {
            Some(&self.version_hash)
        }
    }
}

pub type Skill = Resource<SkillSpec, SkillStatus>;

// ---- Workflow -------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WorkflowSpec {
    #[serde(default)]
    pub definition: serde_json::Value,
}
impl ResourceSpec for WorkflowSpec {}

status_with_audit!(WorkflowStatus {
    default_instance_id: Option<String>,
});

pub type Workflow = Resource<WorkflowSpec, WorkflowStatus>;

// ---- WorkflowInstance -------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WorkflowInstanceSpec {
    pub workflow_ref: ResourceReference,
    #[serde(default)]
    pub environment_ref: Option<ResourceReference>,
}
impl ResourceSpec for WorkflowInstanceSpec {
    fn validate(&self) -> Result<(), agentforge_errors::ForgeError> {
        self.workflow_ref.validate_format()
    }
}

status_with_audit!(WorkflowInstanceStatus { phase: String });

pub type WorkflowInstance = Resource<WorkflowInstanceSpec, WorkflowInstanceStatus>;

// ---- AgentExecution ---------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AgentExecutionSpec {
    pub agent_instance_ref: ResourceReference,
    #[serde(default)]
    pub input: serde_json::Value,
}
impl ResourceSpec for AgentExecutionSpec {
    fn validate(&self) -> Result<(), agentforge_errors::ForgeError> {
        self.agent_instance_ref.validate_format()
    }
}

status_with_audit!(AgentExecutionStatus {
    phase: ExecutionPhase,
    run_handle: Option<String>,
    output: Option<serde_json::Value>,
    error: Option<String>,
});

pub type AgentExecution = Resource<AgentExecutionSpec, AgentExecutionStatus>;

// ---- WorkflowExecution --------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WorkflowExecutionSpec {
    pub workflow_instance_ref: ResourceReference,
    #[serde(default)]
    pub input: serde_json::Value,
}
impl ResourceSpec for WorkflowExecutionSpec {
    fn validate(&self) -> Result<(), agentforge_errors::ForgeError> {
        self.workflow_instance_ref.validate_format()
    }
}

status_with_audit!(WorkflowExecutionStatus {
    phase: ExecutionPhase,
    run_handle: Option<String>,
    output: Option<serde_json::Value>,
    error: Option<String>,
});

pub type WorkflowExecution = Resource<WorkflowExecutionSpec, WorkflowExecutionStatus>;

// ---- Session ----------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SessionSpec {
    #[serde(default)]
    pub agent_instance_ref: Option<ResourceReference>,
}
impl ResourceSpec for SessionSpec {}

status_with_audit!(SessionStatus {
    last_active_at: Option<DateTime<Utc>>,
});

pub type Session = Resource<SessionSpec, SessionStatus>;

// ---- Environment --------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct EnvironmentSpec {
    #[serde(default)]
    pub variables: HashMap<String, String>,
    #[serde(default)]
    pub sandbox_policy: String,
}
impl ResourceSpec for EnvironmentSpec {}

status_with_audit!(EnvironmentStatus {});

pub type Environment = Resource<EnvironmentSpec, EnvironmentStatus>;

// ---- ExecutionContext -----------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ExecutionContextSpec {
    #[serde(default)]
    pub environment_ref: Option<ResourceReference>,
    #[serde(default)]
    pub working_directory: String,
}
impl ResourceSpec for ExecutionContextSpec {}

status_with_audit!(ExecutionContextStatus {});

pub type ExecutionContext = Resource<ExecutionContextSpec, ExecutionContextStatus>;
