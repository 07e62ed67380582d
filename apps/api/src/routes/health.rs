use axum::Json;
use serde_json::{json, Value};

/// GET /api/health
/// Lets the frontend verify the server is running.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "AlmostThere backend running"
    }))
}
