//! `agentforge-rpc`
//!
//! The loopback HTTP/JSON surface (spec module C6): one `axum::Router`
//! nesting a CRUD sub-router per resource kind, a `ForgeError`-to-status
//! mapped error envelope, and a health check. Kept deliberately thin — all
//! real logic lives in `agentforge-resources`' controllers; this crate only
//! translates HTTP in and `ApiResponse`/`ApiErrorResponse` out, the same
//! separation the teacher's `kotoba-server-core::router::AppRouter` draws
//! between routing plumbing and handler bodies.

pub mod agent_execution_routes;
pub mod agent_routes;
pub mod health;
pub mod response;
pub mod routes;
pub mod skill_routes;
pub mod workflow_execution_routes;
pub mod workflow_routes;

use agentforge_bridge::{AgentExecutionController, WorkflowExecutionController};
use agentforge_resources::{
    AgentController, AgentInstanceController, EnvironmentController, ExecutionContextController, SessionController,
    SkillController, WorkflowController, WorkflowInstanceController,
};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Every controller the bootstrap sequence constructs (spec §4.5), handed
/// to [`build_router`] in one bundle so the wiring order lives in one place.
pub struct Controllers {
    pub agent: AgentController,
    pub agent_instance: AgentInstanceController,
    pub skill: SkillController,
    pub workflow: WorkflowController,
    pub workflow_instance: WorkflowInstanceController,
    pub agent_execution: AgentExecutionController,
    pub workflow_execution: WorkflowExecutionController,
    pub session: SessionController,
    pub environment: EnvironmentController,
    pub execution_context: ExecutionContextController,
}

pub fn build_router(controllers: Controllers) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .nest("/agent", agent_routes::agent_router(controllers.agent))
        .nest("/agent_instance", routes::resource_router(controllers.agent_instance))
        .nest(
            "/skill",
            routes::resource_router(controllers.skill.inner.clone()).merge(skill_routes::skill_push_router(controllers.skill)),
        )
        .nest("/workflow", workflow_routes::workflow_router(controllers.workflow))
        .nest(
            "/workflow_instance",
            routes::resource_router(controllers.workflow_instance),
        )
        .nest(
            "/agent_execution",
            agent_execution_routes::agent_execution_router(controllers.agent_execution),
        )
        .nest(
            "/workflow_execution",
            workflow_execution_routes::workflow_execution_router(controllers.workflow_execution),
        )
        .nest("/session", routes::resource_router(controllers.session))
        .nest("/environment", routes::resource_router(controllers.environment))
        .nest(
            "/execution_context",
            routes::resource_router(controllers.execution_context),
        )
        .layer(TraceLayer::new_for_http())
}
