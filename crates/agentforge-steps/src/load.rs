//! Load steps: `LoadTargetStep`, `LoadByReferenceStep`, `LoadForApplyStep`.
//!
//! All three resolve a resource from the store and leave it in
//! `metadata[EXISTING_RESOURCE]` rather than `new_state` — `new_state`
//! stays reserved for the value being built/merged. Controllers that end a
//! pipeline on a load step (get-by-id, get-by-reference) read the response
//! back out of that metadata slot; `BuildUpdateStateStep` reads it to know
//! what it is updating.

use crate::keys::EXISTING_RESOURCE;
use agentforge_core::id::ResourceId;
use agentforge_core::kind::ResourceKind;
use agentforge_core::reference::ResourceReference;
use agentforge_core::resource::{Resource, ResourceSpec, ResourceStatus};
use agentforge_core::id_request::IdRequest;
use agentforge_errors::ForgeError;
use agentforge_pipeline::{RequestContext, Step};
use agentforge_store::{keys, KvStore};
use async_trait::async_trait;

async fn load_live<Spec, Status>(
    store: &KvStore,
    kind: ResourceKind,
    id: &ResourceId,
) -> Result<Resource<Spec, Status>, ForgeError>
where
    Spec: ResourceSpec,
    Status: ResourceStatus,
{
    let raw = store
        .get(keys::live(kind.as_str(), id.as_str()))
        .await?
        .ok_or_else(|| ForgeError::not_found(format!("{} '{}' not found", kind, id)))?;
    serde_json::from_slice(&raw).map_err(ForgeError::from)
}

async fn load_by_slug<Spec, Status>(
    store: &KvStore,
    kind: ResourceKind,
    org: &str,
    slug: &str,
) -> Result<Option<Resource<Spec, Status>>, ForgeError>
where
    Spec: ResourceSpec,
    Status: ResourceStatus,
{
    let index_key = keys::slug_index(kind.as_str(), org, slug);
    let id_bytes = match store.get(index_key).await? {
        Some(bytes) => bytes,
        None => return Ok(None),
    };
    let id = ResourceId::from(String::from_utf8_lossy(&id_bytes).to_string());
    let raw = store.get(keys::live(kind.as_str(), id.as_str())).await?;
    match raw {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes).map_err(ForgeError::from)?)),
        None => Ok(None),
    }
}

fn is_content_hash(version: &str) -> bool {
    version.len() == 64 && version.chars().all(|c| c.is_ascii_hexdigit())
}

/// Resolves a reference's `version` against the id's full history: the live
/// record plus every archived audit snapshot. A 64-hex-digit version is
/// matched against `Status::content_hash`; anything else is treated as a
/// tag and matched against `Spec::version_tag`, picking the most recently
/// updated match (spec §6.1: "the most recent audit entry whose `spec.tag`
/// equals the tag").
async fn load_versioned<Spec, Status>(
    store: &KvStore,
    kind: ResourceKind,
    org: &str,
    slug: &str,
    version: &str,
) -> Result<Option<Resource<Spec, Status>>, ForgeError>
where
    Spec: ResourceSpec,
    Status: ResourceStatus,
{
    let index_key = keys::slug_index(kind.as_str(), org, slug);
    let Some(id_bytes) = store.get(index_key).await? else {
        return Ok(None);
    };
    let id = ResourceId::from(String::from_utf8_lossy(&id_bytes).to_string());

    let mut candidates: Vec<Resource<Spec, Status>> = Vec::new();
    if let Some(raw) = store.get(keys::live(kind.as_str(), id.as_str())).await? {
        candidates.push(serde_json::from_slice(&raw).map_err(ForgeError::from)?);
    }
    for (_, raw) in store.scan_prefix(keys::audit_prefix(kind.as_str(), id.as_str())).await? {
        if let Ok(resource) = serde_json::from_slice::<Resource<Spec, Status>>(&raw) {
            candidates.push(resource);
        }
    }

    let wants_hash = is_content_hash(version);
    Ok(candidates
        .into_iter()
        .filter(|r| {
            if wants_hash {
                r.status.content_hash() == Some(version)
            } else {
                r.spec.version_tag() == Some(version)
            }
        })
        .max_by_key(|r| r.status.audit_block().status_audit.updated_at))
}

/// Used for get-by-id, and (reused, failing on absence) as the "LoadExisting"
/// stage of the update pipeline when the caller supplies an id.
pub struct LoadTargetStep {
    pub kind: ResourceKind,
    pub store: KvStore,
}

impl LoadTargetStep {
    pub fn new(kind: ResourceKind, store: KvStore) -> Self {
        Self { kind, store }
    }
}

#[async_trait]
impl<Spec, Status> Step<IdRequest, Resource<Spec, Status>> for LoadTargetStep
where
    Spec: ResourceSpec + Send + Sync,
    Status: ResourceStatus + Send + Sync,
{
    fn name(&self) -> &'static str {
        "load_target"
    }

    async fn execute(&self, ctx: &mut RequestContext<IdRequest, Resource<Spec, Status>>) -> Result<(), ForgeError> {
        let id = ResourceId::from(ctx.input.value.clone());
        let resource: Resource<Spec, Status> = load_live(&self.store, self.kind, &id).await?;
        ctx.put_metadata(EXISTING_RESOURCE, resource);
        Ok(())
    }
}

/// Used for get-by-reference, and as "LoadExisting" when the update
/// pipeline identifies its target by slug.
pub struct LoadByReferenceStep {
    pub kind: ResourceKind,
    pub store: KvStore,
}

impl LoadByReferenceStep {
    pub fn new(kind: ResourceKind, store: KvStore) -> Self {
        Self { kind, store }
    }
}

/// `ResourceReference.version` resolution (spec §6.1): empty/`"latest"`
/// resolves to the live slug record; a 64-hex-digit value is a content
/// hash resolved against history; anything else is a tag resolved against
/// the most recent matching `spec.tag`.
#[async_trait]
impl<Spec, Status> Step<ResourceReference, Resource<Spec, Status>> for LoadByReferenceStep
where
    Spec: ResourceSpec + Send + Sync,
    Status: ResourceStatus + Send + Sync,
{
    fn name(&self) -> &'static str {
        "load_by_reference"
    }

    async fn execute(
        &self,
        ctx: &mut RequestContext<ResourceReference, Resource<Spec, Status>>,
    ) -> Result<(), ForgeError> {
        let org = ctx.input.org_or_local().to_string();
        let slug = ctx.input.slug.clone();
        let version = ctx.input.version.as_deref().unwrap_or("");

        let found = if version.is_empty() || version == "latest" {
            load_by_slug::<Spec, Status>(&self.store, self.kind, &org, &slug).await?
        } else {
            load_versioned::<Spec, Status>(&self.store, self.kind, &org, &slug, version).await?
        };

        match found {
            Some(resource) => {
                ctx.put_metadata(EXISTING_RESOURCE, resource);
                Ok(())
            }
            None => Err(ForgeError::not_found(format!(
                "{} with slug '{}' and version '{}' not found in org '{}'",
                self.kind, slug, version, org
            ))),
        }
    }
}

/// The update pipeline identifies its target by the input resource's own
/// slug rather than a separate `ResourceReference` — update requests carry
/// no `version`, so this always resolves the live record.
#[async_trait]
impl<Spec, Status> Step<Resource<Spec, Status>, Resource<Spec, Status>> for LoadByReferenceStep
where
    Spec: ResourceSpec + Send + Sync,
    Status: ResourceStatus + Send + Sync,
{
    fn name(&self) -> &'static str {
        "load_by_reference"
    }

    async fn execute(
        &self,
        ctx: &mut RequestContext<Resource<Spec, Status>, Resource<Spec, Status>>,
    ) -> Result<(), ForgeError> {
        let org = ctx.input.metadata.org_or_local().to_string();
        let slug = ctx.input.metadata.slug.clone();
        match load_by_slug::<Spec, Status>(&self.store, self.kind, &org, &slug).await? {
            Some(resource) => {
                ctx.put_metadata(EXISTING_RESOURCE, resource);
                Ok(())
            }
            None => Err(ForgeError::not_found(format!(
                "{} with slug '{}' not found in org '{}'",
                self.kind, slug, org
            ))),
        }
    }
}

/// Looks the input resource's slug up by reference but never fails on
/// absence — Apply uses the presence/absence of `EXISTING_RESOURCE` to
/// branch between the create and update pipelines.
pub struct LoadForApplyStep {
    pub kind: ResourceKind,
    pub store: KvStore,
}

impl LoadForApplyStep {
    pub fn new(kind: ResourceKind, store: KvStore) -> Self {
        Self { kind, store }
    }
}

#[async_trait]
impl<Spec, Status> Step<Resource<Spec, Status>, Resource<Spec, Status>> for LoadForApplyStep
where
    Spec: ResourceSpec + Send + Sync,
    Status: ResourceStatus + Send + Sync,
{
    fn name(&self) -> &'static str {
        "load_for_apply"
    }

    async fn execute(
        &self,
        ctx: &mut RequestContext<Resource<Spec, Status>, Resource<Spec, Status>>,
    ) -> Result<(), ForgeError> {
        let org = ctx.input.metadata.org_or_local().to_string();
        let slug = ctx.input.metadata.slug.clone();
        if let Some(existing) = load_by_slug::<Spec, Status>(&self.store, self.kind, &org, &slug).await? {
            ctx.put_metadata(EXISTING_RESOURCE, existing);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{DummyResource, DummySpec};
    use agentforge_core::metadata::ResourceMetadata;
    use agentforge_store::engine::WriteOp;

    async fn seeded_store() -> (KvStore, ResourceId) {
        let store = KvStore::in_memory();
        let mut resource = DummyResource::new_input(
            DummySpec::default(),
            ResourceMetadata {
                slug: "my-skill".to_string(),
                ..Default::default()
            },
        );
        let id = ResourceId::generate(ResourceKind::Skill);
        resource.metadata.id = Some(id.clone());
        let encoded = serde_json::to_vec(&resource).unwrap();
        store
            .apply_batch(vec![
                WriteOp::Put {
                    key: keys::live("skill", id.as_str()),
                    value: encoded,
                },
                WriteOp::Put {
                    key: keys::slug_index("skill", "local", "my-skill"),
                    value: id.as_str().as_bytes().to_vec(),
                },
            ])
            .await
            .unwrap();
        (store, id)
    }

    #[tokio::test]
    async fn load_target_finds_existing_by_id() {
        let (store, id) = seeded_store().await;
        let step = LoadTargetStep::new(ResourceKind::Skill, store);
        let mut ctx: RequestContext<IdRequest, DummyResource> =
            RequestContext::new(IdRequest { value: id.as_str().to_string() }, "sys");
        step.execute(&mut ctx).await.unwrap();
        let loaded: DummyResource = ctx.get_metadata(EXISTING_RESOURCE).unwrap();
        assert_eq!(loaded.metadata.slug, "my-skill");
    }

    #[tokio::test]
    async fn load_target_not_found_for_unknown_id() {
        let store = KvStore::in_memory();
        let step = LoadTargetStep::new(ResourceKind::Skill, store);
        let mut ctx: RequestContext<IdRequest, DummyResource> =
            RequestContext::new(IdRequest { value: "skl-missing".to_string() }, "sys");
        let err = step.execute(&mut ctx).await.unwrap_err();
        assert_eq!(err.code(), agentforge_errors::Code::NotFound);
    }

    #[tokio::test]
    async fn load_for_apply_tolerates_absence() {
        let store = KvStore::in_memory();
        let step = LoadForApplyStep::new(ResourceKind::Skill, store);
        let input = DummyResource::new_input(
            DummySpec::default(),
            ResourceMetadata {
                slug: "brand-new".to_string(),
                ..Default::default()
            },
        );
        let mut ctx: RequestContext<DummyResource, DummyResource> = RequestContext::new(input, "sys");
        step.execute(&mut ctx).await.unwrap();
        assert!(!ctx.has_metadata(EXISTING_RESOURCE));
    }

    #[tokio::test]
    async fn load_for_apply_populates_existing_when_found() {
        let (store, _id) = seeded_store().await;
        let step = LoadForApplyStep::new(ResourceKind::Skill, store);
        let input = DummyResource::new_input(
            DummySpec::default(),
            ResourceMetadata {
                slug: "my-skill".to_string(),
                ..Default::default()
            },
        );
        let mut ctx: RequestContext<DummyResource, DummyResource> = RequestContext::new(input, "sys");
        step.execute(&mut ctx).await.unwrap();
        assert!(ctx.has_metadata(EXISTING_RESOURCE));
    }

    fn reference(slug: &str, version: Option<&str>) -> ResourceReference {
        ResourceReference {
            scope: Default::default(),
            org: String::new(),
            kind: "skill".to_string(),
            slug: slug.to_string(),
            version: version.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn load_by_reference_resolves_live_when_version_latest() {
        let (store, _id) = seeded_store().await;
        let step = LoadByReferenceStep::new(ResourceKind::Skill, store);
        let mut ctx: RequestContext<ResourceReference, DummyResource> =
            RequestContext::new(reference("my-skill", Some("latest")), "sys");
        step.execute(&mut ctx).await.unwrap();
        assert!(ctx.has_metadata(EXISTING_RESOURCE));
    }

    #[tokio::test]
    async fn load_by_reference_resolves_content_hash_from_archived_entry() {
        let store = KvStore::in_memory();
        let id = ResourceId::generate(ResourceKind::Skill);
        let hash = "a".repeat(64);

        let mut live = DummyResource::new_input(
            DummySpec::default(),
            ResourceMetadata {
                slug: "my-skill".to_string(),
                ..Default::default()
            },
        );
        live.metadata.id = Some(id.clone());
        live.status.hash = "b".repeat(64);

        let mut archived = DummyResource::new_input(
            DummySpec::default(),
            ResourceMetadata {
                slug: "my-skill".to_string(),
                ..Default::default()
            },
        );
        archived.metadata.id = Some(id.clone());
        archived.status.hash = hash.clone();

        store
            .apply_batch(vec![
                WriteOp::Put {
                    key: keys::live("skill", id.as_str()),
                    value: serde_json::to_vec(&live).unwrap(),
                },
                WriteOp::Put {
                    key: keys::slug_index("skill", "local", "my-skill"),
                    value: id.as_str().as_bytes().to_vec(),
                },
                WriteOp::Put {
                    key: keys::audit("skill", id.as_str(), 1),
                    value: serde_json::to_vec(&archived).unwrap(),
                },
            ])
            .await
            .unwrap();

        let step = LoadByReferenceStep::new(ResourceKind::Skill, store);
        let mut ctx: RequestContext<ResourceReference, DummyResource> =
            RequestContext::new(reference("my-skill", Some(&hash)), "sys");
        step.execute(&mut ctx).await.unwrap();
        let loaded: DummyResource = ctx.get_metadata(EXISTING_RESOURCE).unwrap();
        assert_eq!(loaded.status.hash, hash);
    }

    #[tokio::test]
    async fn load_by_reference_resolves_tag_to_most_recent_match() {
        use agentforge_core::audit::AuditBlock;
        use chrono::{TimeZone, Utc};

        let store = KvStore::in_memory();
        let id = ResourceId::generate(ResourceKind::Skill);

        let mut live = DummyResource::new_input(
            DummySpec::default(),
            ResourceMetadata {
                slug: "my-skill".to_string(),
                ..Default::default()
            },
        );
        live.metadata.id = Some(id.clone());

        let mut older = DummyResource::new_input(
            DummySpec {
                value: String::new(),
                tag: Some("stable".to_string()),
            },
            ResourceMetadata {
                slug: "my-skill".to_string(),
                ..Default::default()
            },
        );
        older.metadata.id = Some(id.clone());
        older.status.audit = AuditBlock::new_at(Utc.timestamp_opt(1_000, 0).unwrap(), "sys");

        let mut newer = DummyResource::new_input(
            DummySpec {
                value: String::new(),
                tag: Some("stable".to_string()),
            },
            ResourceMetadata {
                slug: "my-skill".to_string(),
                ..Default::default()
            },
        );
        newer.metadata.id = Some(id.clone());
        newer.status.audit = AuditBlock::new_at(Utc.timestamp_opt(2_000, 0).unwrap(), "sys");

        store
            .apply_batch(vec![
                WriteOp::Put {
                    key: keys::live("skill", id.as_str()),
                    value: serde_json::to_vec(&live).unwrap(),
                },
                WriteOp::Put {
                    key: keys::slug_index("skill", "local", "my-skill"),
                    value: id.as_str().as_bytes().to_vec(),
                },
                WriteOp::Put {
                    key: keys::audit("skill", id.as_str(), 1),
                    value: serde_json::to_vec(&older).unwrap(),
                },
                WriteOp::Put {
                    key: keys::audit("skill", id.as_str(), 2),
                    value: serde_json::to_vec(&newer).unwrap(),
                },
            ])
            .await
            .unwrap();

        let step = LoadByReferenceStep::new(ResourceKind::Skill, store);
        let mut ctx: RequestContext<ResourceReference, DummyResource> =
            RequestContext::new(reference("my-skill", Some("stable")), "sys");
        step.execute(&mut ctx).await.unwrap();
        let loaded: DummyResource = ctx.get_metadata(EXISTING_RESOURCE).unwrap();
        assert_eq!(loaded.status.audit.status_audit.updated_at, Utc.timestamp_opt(2_000, 0).unwrap());
    }

    #[tokio::test]
    async fn load_by_reference_on_resource_input_finds_existing_by_slug() {
        let (store, _id) = seeded_store().await;
        let step = LoadByReferenceStep::new(ResourceKind::Skill, store);
        let input = DummyResource::new_input(
            DummySpec::default(),
            ResourceMetadata {
                slug: "my-skill".to_string(),
                ..Default::default()
            },
        );
        let mut ctx: RequestContext<DummyResource, DummyResource> = RequestContext::new(input, "sys");
        step.execute(&mut ctx).await.unwrap();
        assert!(ctx.has_metadata(EXISTING_RESOURCE));
    }
}
