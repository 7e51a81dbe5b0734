//! Starter Chat - browser chat interface with optional web search
//!
//! Serves a single conversation page and a JSON API. Each submitted message
//! is forwarded, on its own, to a hosted completion endpoint and the reply
//! is appended to the conversation.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod conversation;
mod core;
mod providers;
mod routes;
mod ui;

use crate::config::{Config, InterfaceConfig};
use crate::core::Orchestrator;
use crate::providers::{HttpCompletionClient, HttpCompletionConfig, LoggingClient};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub interface: Arc<InterfaceConfig>,
    pub orchestrator: Arc<Orchestrator>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "starter_chat=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let interface = config.load_interface()?;
    if let Some(path) = &config.interface_config {
        tracing::info!("Loaded interface copy from {}", path.display());
    }

    let client = HttpCompletionClient::new(HttpCompletionConfig {
        endpoint: config.completion_url.clone(),
        api_key: config.completion_api_key.clone(),
    });
    tracing::info!(
        endpoint = %client.endpoint(),
        authenticated = config.completion_api_key.is_some(),
        "Completion endpoint configured"
    );

    let orchestrator = Orchestrator::new(Arc::new(LoggingClient::new(Arc::new(client))))
        .with_notification_text(interface.notification_text());

    let state = AppState {
        interface: Arc::new(interface),
        orchestrator: Arc::new(orchestrator),
    };

    let app = Router::new()
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state);

    tracing::info!("Chat interface running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
