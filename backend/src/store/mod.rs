//! The persistence gateway.
//!
//! Handlers never see a pool or a connection; they receive an
//! `Arc<dyn Store>` through `AppState`. Each write method is one unit of
//! work: it either commits completely or leaves no trace.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{EntityKind, Market, NewMarket, NewPrice, NewProduct, Price, PriceFilter, Product};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness or check constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The row, or a row it references, does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    async fn exists(&self, kind: EntityKind, id: i64) -> Result<bool, StoreError>;

    async fn create_product(&self, input: NewProduct) -> Result<Product, StoreError>;
    async fn update_product(&self, id: i64, input: NewProduct) -> Result<Product, StoreError>;
    async fn get_product(&self, id: i64) -> Result<Product, StoreError>;
    /// Ordered by name ascending.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;
    /// Removes the product and its price history; returns how many prices went with it.
    async fn delete_product(&self, id: i64) -> Result<u64, StoreError>;

    async fn create_market(&self, input: NewMarket) -> Result<Market, StoreError>;
    async fn update_market(&self, id: i64, input: NewMarket) -> Result<Market, StoreError>;
    async fn get_market(&self, id: i64) -> Result<Market, StoreError>;
    /// Ordered by name ascending.
    async fn list_markets(&self) -> Result<Vec<Market>, StoreError>;
    async fn delete_market(&self, id: i64) -> Result<u64, StoreError>;

    async fn create_price(&self, input: NewPrice) -> Result<Price, StoreError>;
    /// Ordered by `observed_at` descending, at most `filter.limit` rows.
    async fn list_prices(&self, filter: PriceFilter) -> Result<Vec<Price>, StoreError>;
}
