//! Audit bookkeeping attached to every resource's `status`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reserved caller identity used when a controller mutates a resource on
/// behalf of another controller (e.g. Agent create spawning its default
/// AgentInstance).
pub const SYSTEM_PRINCIPAL: &str = "system";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AuditEntry {
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
    pub event: String,
}

impl AuditEntry {
    pub fn new_at(now: DateTime<Utc>, actor: &str, event: &str) -> Self {
        AuditEntry {
            created_by: actor.to_string(),
            created_at: now,
            updated_by: actor.to_string(),
            updated_at: now,
            event: event.to_string(),
        }
    }

    /// Advances `updated_*` while preserving `created_*`, matching the
    /// update-path audit rule in spec §3.2.
    pub fn advance(&self, now: DateTime<Utc>, actor: &str, event: &str) -> Self {
        AuditEntry {
            created_by: self.created_by.clone(),
            created_at: self.created_at,
            updated_by: actor.to_string(),
            updated_at: now,
            event: event.to_string(),
        }
    }
}

/// The audit sub-message every resource's `status` carries. `spec_audit`
/// tracks mutations to user intent, `status_audit` tracks system-observed
/// state transitions; the standard step library advances both together
/// except where spec §4.3 (status-phase updates) calls for only one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AuditBlock {
    pub spec_audit: AuditEntry,
    pub status_audit: AuditEntry,
}

impl Default for AuditBlock {
    /// A fresh "create" audit block stamped with [`SYSTEM_PRINCIPAL`] at the
    /// current time. Lets kind `Status` types derive `Default` instead of
    /// hand-writing the audit block every time (`BuildNewStateStep`
    /// overwrites it with the caller's actual principal regardless).
    fn default() -> Self {
        AuditBlock::new_at(Utc::now(), SYSTEM_PRINCIPAL)
    }
}

impl AuditBlock {
    pub fn new_at(now: DateTime<Utc>, actor: &str) -> Self {
        let entry = AuditEntry::new_at(now, actor, "create");
        AuditBlock {
            spec_audit: entry.clone(),
            status_audit: entry,
        }
    }

    pub fn advance(&self, now: DateTime<Utc>, actor: &str, event: &str) -> Self {
        AuditBlock {
            spec_audit: self.spec_audit.advance(now, actor, event),
            status_audit: self.status_audit.advance(now, actor, event),
        }
    }
}

/// Implemented by every resource's `Status` type so the standard step
/// library can set/advance audit fields generically without every kind
/// implementing identical boilerplate accessors. Resources without a
/// `status` field simply have no `Status` type and are skipped by the
/// steps that call `has_status`/`audit_block`-style helpers — see
/// `agentforge_steps::audit_reflection`.
pub trait HasAuditBlock {
    fn audit_block(&self) -> &AuditBlock;
    fn audit_block_mut(&mut self) -> &mut AuditBlock;
}
