use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a status object with service version and the active merge thresholds.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-merge-api",
        "dedupe_threshold": state.merge_config.dedupe_threshold,
        "summary_threshold": state.merge_config.summary_threshold
    }))
}
