use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewItem, StoredItem};

mod memory;

pub use memory::InMemoryItemStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid item id: {0}")]
    InvalidId(String),

    #[error("quantity of item {id} would overflow")]
    QuantityOverflow { id: Uuid },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations behind the item routes.
///
/// Ids are passed through as received from the path; each store decides how
/// to interpret them. Updating or deleting an id that matches nothing is a
/// successful no-op.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn insert_item(&self, item: &NewItem) -> StoreResult<()>;

    /// All items in the order the store yields them.
    async fn get_items(&self) -> StoreResult<Vec<StoredItem>>;

    /// Adds `delta` to the stored quantity. The result is not re-validated.
    async fn update_quantity(&self, id: &str, delta: i64) -> StoreResult<()>;

    async fn delete_item(&self, id: &str) -> StoreResult<()>;
}

pub(crate) fn parse_id(id: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

// ── PostgreSQL ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn insert_item(&self, item: &NewItem) -> StoreResult<()> {
        sqlx::query("INSERT INTO items (name, quantity) VALUES ($1, $2)")
            .bind(&item.name)
            .bind(item.quantity)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_items(&self) -> StoreResult<Vec<StoredItem>> {
        let items = sqlx::query_as::<_, StoredItem>("SELECT _id, name, quantity FROM items")
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn update_quantity(&self, id: &str, delta: i64) -> StoreResult<()> {
        let id = parse_id(id)?;
        sqlx::query("UPDATE items SET quantity = quantity + $1 WHERE _id = $2")
            .bind(delta)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_item(&self, id: &str) -> StoreResult<()> {
        let id = parse_id(id)?;
        sqlx::query("DELETE FROM items WHERE _id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
