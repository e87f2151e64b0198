use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    models::{Item, NewItem},
    validation::item_schema,
    AppState,
};

// ── Create ────────────────────────────────────────────────────────────────────

/// The body is taken as raw bytes so that a malformed payload ends in a bare
/// 400 instead of the extractor's plain-text rejection.
pub async fn create_item(State(state): State<AppState>, body: Bytes) -> AppResult<StatusCode> {
    let payload: Value = serde_json::from_slice(&body)?;
    let normalized = item_schema().validate(&payload)?;
    let item: NewItem = serde_json::from_value(normalized)?;

    state.store.insert_item(&item).await?;

    info!(name = %item.name, quantity = item.quantity, "Created item");
    Ok(StatusCode::OK)
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<Vec<Item>>> {
    let items: Vec<Item> = state
        .store
        .get_items()
        .await?
        .into_iter()
        .map(Item::from)
        .collect();

    info!(count = items.len(), "Listed items");
    Ok(Json(items))
}

// ── Update quantity ───────────────────────────────────────────────────────────

/// Applies the path quantity as an increment to the stored value.
pub async fn update_quantity(
    State(state): State<AppState>,
    Path((id, quantity)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let delta: i64 = quantity.parse().map_err(|_| AppError::InvalidParam {
        name: "quantity",
        value: quantity.clone(),
    })?;

    state.store.update_quantity(&id, delta).await?;

    info!(id = %id, delta, "Updated item quantity");
    Ok(StatusCode::OK)
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.store.delete_item(&id).await?;

    info!(id = %id, "Deleted item");
    Ok(StatusCode::OK)
}
