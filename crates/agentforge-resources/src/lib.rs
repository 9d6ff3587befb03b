//! `agentforge-resources`
//!
//! Per-kind resource types (spec §3.1), the generic controller that
//! composes the standard step library into create/update/delete/get/apply
//! (spec module C5), cross-resource clients (C7), and the two kind-specific
//! post-steps (Agent→AgentInstance, Workflow→WorkflowInstance) plus Skill's
//! content-addressed push operation.

pub mod agent;
pub mod clients;
pub mod controller;
pub mod skill;
pub mod types;
pub mod workflow;

pub use agent::AgentController;
pub use clients::CrossResourceClient;
pub use controller::ResourceController;
pub use skill::{SkillController, SkillPushRequest};
pub use workflow::WorkflowController;

pub use types::{
    Agent, AgentExecution, AgentExecutionSpec, AgentExecutionStatus, AgentInstance, AgentInstanceSpec,
    AgentInstanceStatus, AgentSpec, AgentStatus, Environment, EnvironmentSpec, EnvironmentStatus, ExecutionContext,
    ExecutionContextSpec, ExecutionContextStatus, ExecutionPhase, Session, SessionSpec, SessionStatus, Skill,
    SkillSpec, SkillStatus, Workflow, WorkflowExecution, WorkflowExecutionSpec, WorkflowExecutionStatus,
    WorkflowInstance, WorkflowInstanceSpec, WorkflowInstanceStatus, WorkflowSpec, WorkflowStatus,
};

/// The 6 kinds with no kind-specific post-steps get a bare
/// [`ResourceController`] instantiation rather than a hand-written wrapper.
/// `AgentExecution`/`WorkflowExecution` need a post-step that submits to the
/// execution bridge, so their controllers live in `agentforge_bridge`
/// instead (that crate already depends on this one for `ExecutionPhase`;
/// defining the wrapper here would require the reverse dependency too).
pub type AgentInstanceController = ResourceController<AgentInstanceSpec, AgentInstanceStatus>;
pub type WorkflowInstanceController = ResourceController<WorkflowInstanceSpec, WorkflowInstanceStatus>;
pub type SessionController = ResourceController<SessionSpec, SessionStatus>;
pub type EnvironmentController = ResourceController<EnvironmentSpec, EnvironmentStatus>;
pub type ExecutionContextController = ResourceController<ExecutionContextSpec, ExecutionContextStatus>;
