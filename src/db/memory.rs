use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{parse_id, ItemStore, StoreError, StoreResult};
use crate::models::{NewItem, StoredItem};

/// Process-local store. Listing follows insertion order; a removal shifts
/// later items up rather than swapping the last one in.
#[derive(Debug, Default, Clone)]
pub struct InMemoryItemStore {
    items: Arc<RwLock<IndexMap<Uuid, StoredItem>>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn insert_item(&self, item: &NewItem) -> StoreResult<()> {
        let stored = StoredItem {
            object_id: Uuid::new_v4(),
            name: item.name.clone(),
            quantity: item.quantity,
        };
        self.items.write().await.insert(stored.object_id, stored);
        Ok(())
    }

    async fn get_items(&self) -> StoreResult<Vec<StoredItem>> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn update_quantity(&self, id: &str, delta: i64) -> StoreResult<()> {
        let id = parse_id(id)?;
        if let Some(item) = self.items.write().await.get_mut(&id) {
            item.quantity = item
                .quantity
                .checked_add(delta)
                .ok_or(StoreError::QuantityOverflow { id })?;
        }
        Ok(())
    }

    async fn delete_item(&self, id: &str) -> StoreResult<()> {
        let id = parse_id(id)?;
        self.items.write().await.shift_remove(&id);
        Ok(())
    }
}
