use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An item as the store holds it. The identifier keeps the document-store
/// field name `_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredItem {
    #[serde(rename = "_id")]
    #[sqlx(rename = "_id")]
    pub object_id: Uuid,
    pub name: String,
    pub quantity: i64,
}

/// Public representation returned by `GET /items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub quantity: i64,
}

impl From<StoredItem> for Item {
    fn from(stored: StoredItem) -> Self {
        Self {
            id: stored.object_id,
            name: stored.name,
            quantity: stored.quantity,
        }
    }
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// Creation payload. Only built from a body that passed the item schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub quantity: i64,
}
