//! Resource references: naming another resource by slug rather than id.

use crate::kind::ResourceKind;
use crate::metadata::OwnerScope;
use crate::slug::{is_valid_reference_version, is_valid_slug};
use agentforge_errors::ForgeError;
use serde::{Deserialize, Serialize};

/// `{scope, org, kind, slug, version?}` — used in specs to name other
/// resources. `version` may be empty, `"latest"`, a tag name, or a 64-hex
/// content hash (Skill only).
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ResourceReference {
    #[serde(default)]
    pub scope: OwnerScope,
    #[serde(default)]
    pub org: String,
    pub kind: String,
    pub slug: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl ResourceReference {
    /// Format-only pre-validation (spec §9 Open Questions: semantic
    /// resolution of `version` is deferred to the load step).
    pub fn validate_format(&self) -> Result<(), ForgeError> {
        if self.slug.is_empty() || !is_valid_slug(&self.slug) {
            return Err(ForgeError::validation_at(
                "slug",
                format!("invalid reference slug '{}'", self.slug),
            ));
        }
        if ResourceKind::from_str_opt(&self.kind).is_none() {
            return Err(ForgeError::validation_at(
                "kind",
                format!("unknown resource kind '{}'", self.kind),
            ));
        }
        if let Some(version) = &self.version {
            if !is_valid_reference_version(version) {
                return Err(ForgeError::validation_at(
                    "version",
                    format!("invalid reference version '{}'", version),
                ));
            }
        }
        Ok(())
    }

    pub fn kind(&self) -> Option<ResourceKind> {
        ResourceKind::from_str_opt(&self.kind)
    }

    pub fn org_or_local(&self) -> &str {
        if self.org.is_empty() {
            "local"
        } else {
            &self.org
        }
    }
}
