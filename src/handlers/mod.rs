pub mod items;

use axum::{
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok", "service": "item-service" })))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/health", get(health))

        // ── Items ───────────────────────────────────────────────────────────
        .route("/item", post(items::create_item))
        .route("/items", get(items::list_items))
        .route("/item/:id/quantity/:quantity", put(items::update_quantity))
        .route("/item/:id", delete(items::delete_item))

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
