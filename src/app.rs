use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::AppConfig;
use crate::routes::{system_routes, word_routes};
use crate::state::app::AppState;

/// Build the complete Axum application:
/// - /list, /word, /delete, /update   (word database)
/// - /system                          (alive + version)
pub fn build_app(state: AppState, cfg: AppConfig) -> Router {
    Router::new()
        .merge(word_routes::routes(state))
        .nest("/system", system_routes::routes(cfg))
        // Logging middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
