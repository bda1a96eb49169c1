//! Vigil A2A server
//!
//! Exposes the crime response agent over the A2A protocol: JSON-RPC at
//! the root, the agent card at `/.well-known/agent.json`, and SSE
//! streaming for `message/stream`. All non-discovery routes sit behind
//! M2M bearer-token authentication.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use vigil_agent::{CrimeAgent, MemoryHistoryStore};
use vigil_auth::JwksValidator;
use vigil_common::{AuthConfig, ServerConfig, models};

use crate::api::a2a::{A2aState, a2a_routes, crime_agent_card};
use crate::auth::AuthGate;
use crate::executor::CrimeAgentExecutor;
use crate::tasks::InMemoryTaskStore;

mod api;
mod auth;
mod events;
mod executor;
mod tasks;

/// Command-line arguments for the Vigil A2A server
#[derive(Parser, Debug)]
#[clap(name = "vigil-server", about = "A2A server for the Vigil crime response agent")]
struct Args {
    /// Host to bind to
    #[clap(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[clap(short, long, default_value = "8003")]
    port: u16,

    /// Model backing the agent
    #[clap(long, default_value = models::CLAUDE_SONNET_4)]
    model: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vigil A2A server...");
    info!("Model: {}", args.model);

    let server_config = ServerConfig {
        host: args.host,
        port: args.port,
    };
    let auth_config = AuthConfig::from_env()?;

    let validator = Arc::new(JwksValidator::new(
        auth_config.jwks_url(),
        &auth_config.project_id,
    ));
    let gate = AuthGate::new(validator, &auth_config.required_scope);
    info!("M2M gate requires scope: {}", auth_config.required_scope);

    let history = Arc::new(MemoryHistoryStore::new());
    let agent = Arc::new(CrimeAgent::new(&args.model, history)?);

    let tasks = Arc::new(InMemoryTaskStore::new());
    let executor = Arc::new(CrimeAgentExecutor::new(agent, tasks.clone()));

    let state = A2aState {
        card: crime_agent_card(&server_config.public_url()),
        tasks,
        executor,
    };

    let app = a2a_routes(state, gate);

    let addr = server_config.bind_addr();
    info!("Binding to address: {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
