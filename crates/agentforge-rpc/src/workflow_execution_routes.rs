//! WorkflowExecution's CRUD surface, routed through
//! `WorkflowExecutionController` instead of a bare `ResourceController` so
//! `create` also submits the run to the execution bridge.

use crate::response::{ApiErrorResponse, ApiResponse, ApiResult};
use agentforge_bridge::WorkflowExecutionController;
use agentforge_core::id_request::IdRequest;
use agentforge_core::reference::ResourceReference;
use agentforge_resources::WorkflowExecution;
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

pub fn workflow_execution_router(controller: WorkflowExecutionController) -> Router {
    let state = Arc::new(controller);
    Router::new()
        .route("/", post(create).put(update))
        .route("/apply", post(apply))
        .route("/by-reference", post(get_by_reference))
        .route("/:id", get(get_one).delete(delete_one))
        .with_state(state)
}

async fn create(
    State(controller): State<Arc<WorkflowExecutionController>>,
    headers: HeaderMap,
    Json(input): Json<WorkflowExecution>,
) -> ApiResult<WorkflowExecution> {
    let created = controller
        .create(input, &principal_of(&headers))
        .await
        .map_err(ApiErrorResponse::from)?;
    Ok(ApiResponse::success(created))
}

async fn update(
    State(controller): State<Arc<WorkflowExecutionController>>,
    headers: HeaderMap,
    Json(input): Json<WorkflowExecution>,
) -> ApiResult<WorkflowExecution> {
    let updated = controller
        .update(input, &principal_of(&headers))
        .await
        .map_err(ApiErrorResponse::from)?;
    Ok(ApiResponse::success(updated))
}

async fn apply(
    State(controller): State<Arc<WorkflowExecutionController>>,
    headers: HeaderMap,
    Json(input): Json<WorkflowExecution>,
) -> ApiResult<WorkflowExecution> {
    let applied = controller
        .apply(input, &principal_of(&headers))
        .await
        .map_err(ApiErrorResponse::from)?;
    Ok(ApiResponse::success(applied))
}

async fn get_by_reference(
    State(controller): State<Arc<WorkflowExecutionController>>,
    headers: HeaderMap,
    Json(reference): Json<ResourceReference>,
) -> ApiResult<WorkflowExecution> {
    let found = controller
        .get_by_reference(reference, &principal_of(&headers))
        .await
        .map_err(ApiErrorResponse::from)?;
    Ok(ApiResponse::success(found))
}

async fn get_one(
    State(controller): State<Arc<WorkflowExecutionController>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<WorkflowExecution> {
    let found = controller
        .get(IdRequest { value: id }, &principal_of(&headers))
        .await
        .map_err(ApiErrorResponse::from)?;
    Ok(ApiResponse::success(found))
}

async fn delete_one(
    State(controller): State<Arc<WorkflowExecutionController>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<WorkflowExecution> {
    let deleted = controller
        .delete(IdRequest { value: id }, &principal_of(&headers))
        .await
        .map_err(ApiErrorResponse::from)?;
    Ok(ApiResponse::success(deleted))
}
