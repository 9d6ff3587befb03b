//! Cross-resource clients (spec module C7): thin typed wrappers around the
//! loopback RPC channel, used by kind-specific post-steps to invoke another
//! controller's pipeline in-process while attaching system credentials.
//!
//! Grounded in the teacher's HTTP-client-over-`reqwest` pattern used
//! throughout `kotoba-server-core` callers; generalized here into one
//! generic client parameterised by the resource's `Spec`/`Status`, since
//! every kind's create/update wire shape is identical apart from payload.

use agentforge_core::audit::SYSTEM_PRINCIPAL;
use agentforge_core::resource::{Resource, ResourceSpec, ResourceStatus};
use agentforge_errors::ForgeError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A typed client dialed against the loopback RPC surface for one resource
/// kind's service. `None` base URL means "not wired" — post-steps must
/// tolerate this (spec §4.5: "Fail fast if not wired... skip cleanly with
/// a debug log").
#[derive(Clone)]
pub struct CrossResourceClient<Spec, Status> {
    base_url: Option<String>,
    http: reqwest::Client,
    path_segment: &'static str,
    _marker: std::marker::PhantomData<fn() -> (Spec, Status)>,
}

impl<Spec, Status> CrossResourceClient<Spec, Status>
where
    Spec: ResourceSpec + Serialize + DeserializeOwned,
    Status: ResourceStatus + Serialize + DeserializeOwned,
{
    pub fn wired(base_url: impl Into<String>, path_segment: &'static str) -> Self {
        Self {
            base_url: Some(base_url.into()),
            http: reqwest::Client::new(),
            path_segment,
            _marker: std::marker::PhantomData,
        }
    }

    /// A client with nothing to dial against — used in tests and wherever
    /// a post-step's dependency was never wired at bootstrap.
    pub fn unwired(path_segment: &'static str) -> Self {
        Self {
            base_url: None,
            http: reqwest::Client::new(),
            path_segment,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn is_wired(&self) -> bool {
        self.base_url.is_some()
    }

    pub async fn create_as_system(&self, resource: Resource<Spec, Status>) -> Result<Resource<Spec, Status>, ForgeError> {
        let base = self
            .base_url
            .as_ref()
            .ok_or_else(|| ForgeError::failed_precondition(format!("{} client not wired", self.path_segment)))?;
        let url = format!("{base}/{}", self.path_segment);
        let response = self
            .http
            .post(url)
            .header("x-agentforge-principal", SYSTEM_PRINCIPAL)
            .json(&resource)
            .send()
            .await
            .map_err(|e| ForgeError::dependency(ForgeError::internal(e.to_string())))?;
        decode(response).await
    }

    pub async fn update_as_system(&self, resource: Resource<Spec, Status>) -> Result<Resource<Spec, Status>, ForgeError> {
        let base = self
            .base_url
            .as_ref()
            .ok_or_else(|| ForgeError::failed_precondition(format!("{} client not wired", self.path_segment)))?;
        let url = format!("{base}/{}", self.path_segment);
        let response = self
            .http
            .put(url)
            .header("x-agentforge-principal", SYSTEM_PRINCIPAL)
            .json(&resource)
            .send()
            .await
            .map_err(|e| ForgeError::dependency(ForgeError::internal(e.to_string())))?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ForgeError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ForgeError::dependency(ForgeError::internal(format!(
            "cross-resource call failed ({status}): {body}"
        ))));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ForgeError::dependency(ForgeError::internal(e.to_string())))
}
