//! Generic CRUD router factory, one instantiation per resource kind.
//!
//! Grounded in the teacher's `AppRouter`/route-closure pattern
//! (`kotoba_server_core::router`), generalized from hand-written per-route
//! closures into one generic function parameterised by `Spec`/`Status`,
//! since every kind's wire shape differs only in payload type.

use crate::response::{ApiErrorResponse, ApiResponse, ApiResult};
use agentforge_core::id_request::IdRequest;
use agentforge_core::reference::ResourceReference;
use agentforge_core::resource::{Resource, ResourceSpec, ResourceStatus};
use agentforge_resources::ResourceController;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

const PRINCIPAL_HEADER: &str = "x-agentforge-principal";
const ANONYMOUS_PRINCIPAL: &str = "anonymous";

fn principal_of(headers: &HeaderMap) -> String {
    headers
        .get(PRINCIPAL_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(ANONYMOUS_PRINCIPAL)
        .to_string()
}

/// Builds the standard five-route surface (create/update/delete/get/
/// get_by_reference) plus `apply` for one resource kind's controller.
pub fn resource_router<Spec, Status>(controller: ResourceController<Spec, Status>) -> Router
where
    Spec: ResourceSpec + Send + Sync + 'static,
    Status: ResourceStatus + Send + Sync + 'static,
{
    let state = Arc::new(controller);
    Router::new()
        .route("/", post(create::<Spec, Status>).put(update::<Spec, Status>))
        .route("/apply", post(apply::<Spec, Status>))
        .route("/by-reference", post(get_by_reference::<Spec, Status>))
        .route("/:id", get(get_one::<Spec, Status>).delete(delete_one::<Spec, Status>))
        .with_state(state)
}

async fn create<Spec, Status>(
    State(controller): State<Arc<ResourceController<Spec, Status>>>,
    headers: HeaderMap,
    Json(input): Json<Resource<Spec, Status>>,
) -> ApiResult<Resource<Spec, Status>>
where
    Spec: ResourceSpec + Send + Sync + 'static,
    Status: ResourceStatus + Send + Sync + 'static,
{
    let principal = principal_of(&headers);
    let created = controller.create(input, &principal).await.map_err(ApiErrorResponse::from)?;
    Ok(ApiResponse::success(created))
}

async fn update<Spec, Status>(
    State(controller): State<Arc<ResourceController<Spec, Status>>>,
    headers: HeaderMap,
    Json(input): Json<Resource<Spec, Status>>,
) -> ApiResult<Resource<Spec, Status>>
where
    Spec: ResourceSpec + Send + Sync + 'static,
    Status: ResourceStatus + Send + Sync + 'static,
{
    let principal = principal_of(&headers);
    let updated = controller.update(input, &principal).await.map_err(ApiErrorResponse::from)?;
    Ok(ApiResponse::success(updated))
}

async fn apply<Spec, Status>(
    State(controller): State<Arc<ResourceController<Spec, Status>>>,
    headers: HeaderMap,
    Json(input): Json<Resource<Spec, Status>>,
) -> ApiResult<Resource<Spec, Status>>
where
    Spec: ResourceSpec + Send + Sync + 'static,
    Status: ResourceStatus + Send + Sync + 'static,
{
    let principal = principal_of(&headers);
    let applied = controller.apply(input, &principal).await.map_err(ApiErrorResponse::from)?;
    Ok(ApiResponse::success(applied))
}

async fn get_by_reference<Spec, Status>(
    State(controller): State<Arc<ResourceController<Spec, Status>>>,
    headers: HeaderMap,
    Json(reference): Json<ResourceReference>,
) -> ApiResult<Resource<Spec, Status>>
where
    Spec: ResourceSpec + Send + Sync + 'static,
    Status: ResourceStatus + Send + Sync + 'static,
{
    let principal = principal_of(&headers);
    let found = controller
        .get_by_reference(reference, &principal)
        .await
        .map_err(ApiErrorResponse::from)?;
    Ok(ApiResponse::success(found))
}

async fn get_one<Spec, Status>(
    State(controller): State<Arc<ResourceController<Spec, Status>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Resource<Spec, Status>>
where
    Spec: ResourceSpec + Send + Sync + 'static,
    Status: ResourceStatus + Send + Sync + 'static,
{
    let principal = principal_of(&headers);
    let found = controller
        .get(IdRequest { value: id }, &principal)
        .await
        .map_err(ApiErrorResponse::from)?;
    Ok(ApiResponse::success(found))
}

async fn delete_one<Spec, Status>(
    State(controller): State<Arc<ResourceController<Spec, Status>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Resource<Spec, Status>>
where
    Spec: ResourceSpec + Send + Sync + 'static,
    Status: ResourceStatus + Send + Sync + 'static,
{
    let principal = principal_of(&headers);
    let deleted = controller
        .delete(IdRequest { value: id }, &principal)
        .await
        .map_err(ApiErrorResponse::from)?;
    Ok(ApiResponse::success(deleted))
}
