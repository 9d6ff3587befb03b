//! Skill's extra `push` route, layered onto the standard CRUD surface
//! `resource_router` already gives every other kind.

use crate::response::{ApiErrorResponse, ApiResponse, ApiResult};
use agentforge_resources::{SkillController, SkillPushRequest};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;

const PRINCIPAL_HEADER: &str = "x-agentforge-principal";
const ANONYMOUS_PRINCIPAL: &str = "anonymous";

pub fn skill_push_router(controller: SkillController) -> Router {
    Router::new()
        .route("/push", post(push))
        .with_state(Arc::new(controller))
}

async fn push(
    State(controller): State<Arc<SkillController>>,
    headers: HeaderMap,
    Json(request): Json<SkillPushRequest>,
) -> ApiResult<agentforge_resources::Skill> {
    let principal = headers
        .get(PRINCIPAL_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(ANONYMOUS_PRINCIPAL)
        .to_string();
    let skill = controller.push(request, &principal).await.map_err(ApiErrorResponse::from)?;
    Ok(ApiResponse::success(skill))
}
