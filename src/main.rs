use std::sync::Arc;

use anyhow::Context;
use koolbox_service::{
    build_app,
    config::AppConfig,
    deck::Deck,
    genai::{GeminiClient, GeminiConfig},
    run_server,
    selector::RandomSelector,
    telemetry::init_tracing,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;
    init_tracing(&config.log_level);

    let deck = Deck::load(&config.deck_path)
        .with_context(|| format!("failed to load deck from {}", config.deck_path.display()))?;
    tracing::info!(
        cards = deck.len(),
        path = %config.deck_path.display(),
        text_model = %config.text_model,
        image_model = %config.image_model,
        "deck loaded"
    );

    let gemini = Arc::new(GeminiClient::new(GeminiConfig::from(&config)));
    let state = Arc::new(AppState {
        deck,
        selector: Arc::new(RandomSelector::new()),
        text_model: gemini.clone(),
        image_model: gemini,
    });

    let app = build_app(state, config.static_dir.as_deref());
    run_server(app, &config.bind_addr())
        .await
        .context("server failed")
}
