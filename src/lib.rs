pub mod api;
pub mod config;
pub mod deck;
pub mod error;
pub mod genai;
pub mod pipeline;
pub mod prompt;
pub mod selector;
pub mod telemetry;

use std::path::Path;
use std::sync::Arc;

use axum::Router;

use crate::deck::Deck;
use crate::genai::{ImageModel, TextModel};
use crate::selector::CardSelector;

/// Shared, read-only request state.
pub struct AppState {
    pub deck: Deck,
    pub selector: Arc<dyn CardSelector>,
    pub text_model: Arc<dyn TextModel>,
    pub image_model: Arc<dyn ImageModel>,
}

pub fn build_app(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    api::router(state, static_dir)
}

pub async fn run_server(app: Router, addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await
}
