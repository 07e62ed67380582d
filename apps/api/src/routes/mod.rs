pub mod health;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
};

use crate::generation::handlers;
use crate::state::AppState;

/// API routes only. Static assets and CORS are attached by `build_app`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/resume", post(handlers::handle_resume))
        .route("/api/cover-letter", post(handlers::handle_cover_letter))
        .route("/api/hr-message", post(handlers::handle_hr_message))
        .route("/api/generate-all", post(handlers::handle_generate_all))
        .with_state(state)
}

/// API routes behind the CORS allow-list, with the frontend served for every
/// other path (`/` resolves to `index.html`).
pub fn build_app(
    state: AppState,
    allowed_origins: &[String],
    frontend_dir: &str,
) -> Result<Router> {
    Ok(build_router(state)
        .layer(cors_layer(allowed_origins)?)
        .fallback_service(ServeDir::new(frontend_dir)))
}

pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin '{o}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}
