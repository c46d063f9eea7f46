//! Main HTTP gateway server.

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::chat_api;
use crate::emitter::Pacing;
use crate::health_api;

/// Application state shared across routes. The persona table itself is
/// static; only the emit pacing is carried here so tests can disable it.
#[derive(Clone)]
pub struct GatewayState {
    pub pacing: Pacing,
}

impl Default for GatewayState {
    fn default() -> Self {
        Self {
            pacing: Pacing::default(),
        }
    }
}

/// Build the gateway router. The web front end runs on another origin, so
/// CORS is wide open.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/chat", post(chat_api::handle_chat))
        .route("/health", get(health_api::get_health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the Axum HTTP server for the gateway.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = router(state);

    info!("CodeMentor gateway listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
