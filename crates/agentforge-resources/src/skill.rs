//! `SkillController`: the generic controller plus the Skill `push`
//! operation (spec §4.3). Push is first-class because a skill is defined
//! by its artifact content, not by a pre-created empty record — so its
//! pipeline differs enough from create/update that it is hand-composed
//! here rather than reusing the standard step library wholesale (it does
//! reuse `ArchiveStep`, the one standard step the spec calls out by name
//! for push).

use crate::controller::ResourceController;
use crate::types::{Skill, SkillSpec};
use agentforge_core::audit::{AuditBlock, SYSTEM_PRINCIPAL};
use agentforge_core::id::ResourceId;
use agentforge_core::kind::ResourceKind;
use agentforge_core::metadata::ResourceMetadata;
use agentforge_core::slug::slugify;
use agentforge_errors::ForgeError;
use agentforge_pipeline::RequestContext;
use agentforge_steps::ArchiveStep;
use agentforge_store::{keys, KvStore};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SkillPushRequest {
    #[serde(default)]
    pub metadata: ResourceMetadata,
    #[serde(default)]
    pub description: String,
    pub artifact: Vec<u8>,
    #[serde(default)]
    pub tag: Option<String>,
}

#[derive(Clone)]
pub struct SkillController {
    pub inner: ResourceController<SkillSpec, crate::types::SkillStatus>,
    pub store: KvStore,
}

impl SkillController {
    pub fn new(store: KvStore) -> Self {
        Self {
            inner: ResourceController::new(ResourceKind::Skill, store.clone()),
            store,
        }
    }

    pub async fn create(&self, input: Skill, principal: &str) -> Result<Skill, ForgeError> {
        self.inner.create(input, principal).await
    }

    pub async fn update(&self, input: Skill, principal: &str) -> Result<Skill, ForgeError> {
        self.inner.update(input, principal).await
    }

    pub async fn delete(&self, id: agentforge_core::id_request::IdRequest, principal: &str) -> Result<Skill, ForgeError> {
        self.inner.delete(id, principal).await
    }

    pub async fn get(&self, id: agentforge_core::id_request::IdRequest, principal: &str) -> Result<Skill, ForgeError> {
        self.inner.get(id, principal).await
    }

    pub async fn get_by_reference(
        &self,
        reference: agentforge_core::reference::ResourceReference,
        principal: &str,
    ) -> Result<Skill, ForgeError> {
        self.inner.get_by_reference(reference, principal).await
    }

    /// `ValidateProto → BuildInitialSkill → ResolveSlugForPush →
    /// FindExistingBySlug → GenerateIDIfNeeded → ExtractAndHashArtifact →
    /// CheckAndStoreArtifact(dedup by hash) → PopulateSkillFields →
    /// ArchiveCurrentSkill → StoreSkill`.
    ///
    /// Artifact writes precede the live record so a crash leaves, at worst,
    /// an orphan artifact — reclaimable by an identical retry's dedup —
    /// never a live record pointing at missing bytes (spec §7).
    pub async fn push(&self, request: SkillPushRequest, principal: &str) -> Result<Skill, ForgeError> {
        // ValidateProto: artifact must be non-empty.
        if request.artifact.is_empty() {
            return Err(ForgeError::validation_at("artifact", "artifact must not be empty"));
        }

        // BuildInitialSkill + ResolveSlugForPush.
        let slug = if !request.metadata.slug.is_empty() {
            request.metadata.slug.clone()
        } else {
            slugify(&request.metadata.name)
        };
        if slug.is_empty() {
            return Err(ForgeError::validation_at("metadata.name", "name or slug is required"));
        }
        let org = request.metadata.org_or_local().to_string();

        // FindExistingBySlug.
        let existing = self.inner.get_by_reference(
            agentforge_core::reference::ResourceReference {
                scope: request.metadata.owner_scope,
                org: org.clone(),
                kind: ResourceKind::Skill.as_str().to_string(),
                slug: slug.clone(),
                version: None,
            },
            principal,
        ).await;
        let existing = match existing {
            Ok(skill) => Some(skill),
            Err(ForgeError::NotFound(_)) => None,
            Err(other) => return Err(other),
        };

        // GenerateIDIfNeeded.
        let id = existing
            .as_ref()
            .and_then(|s| s.metadata.id.clone())
            .unwrap_or_else(|| ResourceId::generate(ResourceKind::Skill));

        // ExtractAndHashArtifact.
        let mut hasher = Sha256::new();
        hasher.update(&request.artifact);
        let version_hash = hex::encode(hasher.finalize());

        // CheckAndStoreArtifact: dedup by hash, never rewrite identical bytes.
        let artifact_key = keys::artifact(&version_hash);
        let artifact_is_new = self.store.get(artifact_key.clone()).await?.is_none();
        if artifact_is_new {
            self.store.put(artifact_key, request.artifact.clone()).await?;
        }
        self.store
            .put(
                keys::artifact_ref(ResourceKind::Skill.as_str(), id.as_str(), &version_hash),
                version_hash.clone().into_bytes(),
            )
            .await?;

        // ArchiveCurrentSkill: archive whatever is live before overwriting it.
        let archive_step = ArchiveStep::new(ResourceKind::Skill, self.store.clone());
        {
            use agentforge_pipeline::Step;
            let mut archive_ctx: RequestContext<(), Skill> = RequestContext::new((), principal);
            if let Some(existing) = existing.clone() {
                archive_ctx.set_new_state(existing);
            }
            archive_step.execute(&mut archive_ctx).await?;
        }

        // PopulateSkillFields.
        let now = Utc::now();
        let audit = match &existing {
            Some(existing) => existing.status.audit.advance(now, SYSTEM_PRINCIPAL, "push"),
            None => AuditBlock::new_at(now, SYSTEM_PRINCIPAL),
        };
        let skill = Skill {
            api_version: ResourceKind::Skill.default_api_version().to_string(),
            kind: ResourceKind::Skill.as_str().to_string(),
            metadata: ResourceMetadata {
                name: if request.metadata.name.is_empty() {
                    slug.clone()
                } else {
                    request.metadata.name.clone()
                },
                slug: slug.clone(),
                id: Some(id.clone()),
                org,
                owner_scope: request.metadata.owner_scope,
                labels: request.metadata.labels,
                annotations: request.metadata.annotations,
                tags: request.metadata.tags,
                version: existing
                    .as_ref()
                    .map(|e| e.metadata.version.next())
                    .unwrap_or_default(),
            },
            spec: SkillSpec {
                description: request.description,
                tag: request.tag,
            },
            status: crate::types::SkillStatus {
                audit,
                artifact_storage_key: format!("artifact/{version_hash}"),
                version_hash,
            },
        };

        // StoreSkill: persist live record + slug index.
        let encoded = serde_json::to_vec(&skill).map_err(ForgeError::from)?;
        self.store
            .apply_batch(vec![
                agentforge_store::engine::WriteOp::Put {
                    key: keys::live(ResourceKind::Skill.as_str(), id.as_str()),
                    value: encoded,
                },
                agentforge_store::engine::WriteOp::Put {
                    key: keys::slug_index(ResourceKind::Skill.as_str(), &skill.metadata.org, &slug),
                    value: id.as_str().as_bytes().to_vec(),
                },
            ])
            .await
            .map_err(|e| ForgeError::internal(format!("push failed: {e}")))?;

        Ok(skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, artifact: &[u8]) -> SkillPushRequest {
        SkillPushRequest {
            metadata: ResourceMetadata {
                name: name.to_string(),
                ..Default::default()
            },
            description: "a test skill".to_string(),
            artifact: artifact.to_vec(),
            tag: Some("latest".to_string()),
        }
    }

    #[tokio::test]
    async fn first_push_creates_the_skill() {
        let controller = SkillController::new(KvStore::in_memory());
        let skill = controller.push(request("Code Analysis", b"v1 bytes"), "alice").await.unwrap();

        assert_eq!(skill.metadata.slug, "code-analysis");
        assert_eq!(skill.metadata.version.generation, 0);
        assert!(!skill.status.version_hash.is_empty());
    }

    #[tokio::test]
    async fn second_push_with_same_slug_updates_in_place_and_archives() {
        let controller = SkillController::new(KvStore::in_memory());
        let first = controller.push(request("Code Analysis", b"v1 bytes"), "alice").await.unwrap();
        let second = controller.push(request("Code Analysis", b"v2 bytes"), "alice").await.unwrap();

        assert_eq!(first.metadata.id, second.metadata.id);
        assert_eq!(second.metadata.version.generation, 1);
        assert_ne!(first.status.version_hash, second.status.version_hash);

        let archived = controller
            .store
            .scan_prefix(agentforge_store::keys::audit_prefix(
                "skill",
                first.metadata.id.as_ref().unwrap().as_str(),
            ))
            .await
            .unwrap();
        assert_eq!(archived.len(), 1);
    }

    #[tokio::test]
    async fn pushing_identical_bytes_does_not_duplicate_the_artifact() {
        let controller = SkillController::new(KvStore::in_memory());
        let first = controller.push(request("Code Analysis", b"same bytes"), "alice").await.unwrap();
        let second = controller.push(request("Code Analysis", b"same bytes"), "alice").await.unwrap();

        assert_eq!(first.status.version_hash, second.status.version_hash);
    }

    #[tokio::test]
    async fn empty_artifact_is_rejected() {
        let controller = SkillController::new(KvStore::in_memory());
        let err = controller.push(request("Code Analysis", b""), "alice").await.unwrap_err();
        assert_eq!(err.code(), agentforge_errors::Code::InvalidArgument);
    }
}
