// handlers/system.rs - service index, health and fallback

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

/// GET / - service index (public)
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Person API",
        "version": version,
        "endpoints": {
            "get": "GET /v1/get-person/:personId (READ_ONLY or READ_WRITE)",
            "post": "POST /v1/post-person (READ_WRITE)",
            "delete": "DELETE /v1/delete-person/:personId (public)",
            "docs": "/v3/api-docs, /swagger-ui.html (public)",
            "health": "/health (public)"
        }
    }))
}

/// GET /health - database connectivity (public)
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.people.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

/// Unmatched routes (only reached by authenticated callers)
pub async fn fallback(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}
