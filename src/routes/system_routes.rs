use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::config::AppConfig;

/// Build the health/info routes under /system
pub fn routes(config: AppConfig) -> Router {
    Router::new()
        .route("/alive", get(alive))
        .route("/version", get(version))
        .with_state(config)
}

/// GET /system/alive
async fn alive() -> &'static str {
    "OK"
}

/// GET /system/version
async fn version(State(config): State<AppConfig>) -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": config.server_version,
    }))
}
