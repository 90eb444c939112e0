mod handlers;
mod models;

use std::path::Path;
use std::sync::Arc;

use axum::{
    handler::HandlerWithoutStateExt,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::AppState;

pub use handlers::{ask, health, method_not_allowed, not_found};
pub use models::{AskRequest, AskResponse, ErrorResponse};

/// `/ask` and `/health`, with unknown paths served from `static_dir` when
/// given and answered with a JSON 404 otherwise.
pub fn router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let routes = Router::new()
        .route("/ask", post(ask).fallback(method_not_allowed))
        .route("/health", get(health));

    let routes = match static_dir {
        Some(dir) => {
            routes.fallback_service(ServeDir::new(dir).not_found_service(not_found.into_service()))
        }
        None => routes.fallback(not_found),
    };

    routes.layer(TraceLayer::new_for_http()).with_state(state)
}
