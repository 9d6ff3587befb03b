//! Resource kind registry.
//!
//! The mapping from kind to id-prefix is fixed within a build and must be
//! bijective: two kinds never share a prefix, and a prefix round-trips back
//! to exactly one kind.

use std::fmt;

/// Every resource kind the control plane knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Agent,
    AgentInstance,
    Skill,
    Workflow,
    WorkflowInstance,
    AgentExecution,
    WorkflowExecution,
    Session,
    Environment,
    ExecutionContext,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 10] = [
        ResourceKind::Agent,
        ResourceKind::AgentInstance,
        ResourceKind::Skill,
        ResourceKind::Workflow,
        ResourceKind::WorkflowInstance,
        ResourceKind::AgentExecution,
        ResourceKind::WorkflowExecution,
        ResourceKind::Session,
        ResourceKind::Environment,
        ResourceKind::ExecutionContext,
    ];

    /// The `{kind-prefix}` used to build `id`s of this kind, e.g. `skl`.
    pub fn id_prefix(self) -> &'static str {
        match self {
            ResourceKind::Agent => "agt",
            ResourceKind::AgentInstance => "ain",
            ResourceKind::Skill => "skl",
            ResourceKind::Workflow => "wfl",
            ResourceKind::WorkflowInstance => "win",
            ResourceKind::AgentExecution => "axe",
            ResourceKind::WorkflowExecution => "wxe",
            ResourceKind::Session => "ses",
            ResourceKind::Environment => "env",
            ResourceKind::ExecutionContext => "ecx",
        }
    }

    /// The lowercase, URL-segment form of the kind, e.g. `agent`.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Agent => "agent",
            ResourceKind::AgentInstance => "agent_instance",
            ResourceKind::Skill => "skill",
            ResourceKind::Workflow => "workflow",
            ResourceKind::WorkflowInstance => "workflow_instance",
            ResourceKind::AgentExecution => "agent_execution",
            ResourceKind::WorkflowExecution => "workflow_execution",
            ResourceKind::Session => "session",
            ResourceKind::Environment => "environment",
            ResourceKind::ExecutionContext => "execution_context",
        }
    }

    /// The `api_version` stamped onto freshly built resources of this kind
    /// when the caller left it unset.
    pub fn default_api_version(self) -> &'static str {
        "agentforge/v1"
    }

    pub fn from_str_opt(s: &str) -> Option<ResourceKind> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn prefixes_are_bijective() {
        let prefixes: HashSet<_> = ResourceKind::ALL.iter().map(|k| k.id_prefix()).collect();
        assert_eq!(prefixes.len(), ResourceKind::ALL.len());
    }

    #[test]
    fn kind_strings_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_str_opt(kind.as_str()), Some(kind));
        }
    }
}
