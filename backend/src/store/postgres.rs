use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{error, warn};

use super::{Store, StoreError};
use crate::db::{self, market_queries, price_queries, product_queries, schema};
use crate::models::{EntityKind, Market, NewMarket, NewPrice, NewProduct, Price, PriceFilter, Product};

const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";
const SQLSTATE_FOREIGN_KEY_VIOLATION: &str = "23503";
const SQLSTATE_CHECK_VIOLATION: &str = "23514";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool and makes sure the tables exist.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        schema::init_schema(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        let (code, constraint) = match &e {
            sqlx::Error::Database(db_err) => (
                db_err.code().map(|c| c.into_owned()),
                db_err.constraint().map(str::to_string),
            ),
            _ => (None, None),
        };
        let constraint = constraint.unwrap_or_else(|| "unknown".to_string());

        match code.as_deref() {
            Some(SQLSTATE_UNIQUE_VIOLATION) if constraint == schema::UQ_PRODUCT_NAME => {
                StoreError::Conflict("a product with this name already exists".to_string())
            }
            Some(SQLSTATE_UNIQUE_VIOLATION) => {
                StoreError::Conflict(format!("duplicate value violates {}", constraint))
            }
            Some(SQLSTATE_CHECK_VIOLATION) => {
                StoreError::Conflict(format!("value rejected by {}", constraint))
            }
            Some(SQLSTATE_FOREIGN_KEY_VIOLATION) => {
                StoreError::NotFound(format!("referenced row missing ({})", constraint))
            }
            _ => StoreError::Database(e),
        }
    }
}

/// Commits on success, rolls back on failure. The connection goes back to
/// the pool either way once `tx` is consumed.
async fn settle<T>(
    tx: Transaction<'static, Postgres>,
    result: Result<T, StoreError>,
) -> Result<T, StoreError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback failed after {}: {}", e, rollback_err);
            }
            if let StoreError::Database(db_err) = &e {
                error!("Transaction rolled back on database error: {}", db_err);
            }
            Err(e)
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn exists(&self, kind: EntityKind, id: i64) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::exists(&mut *conn, kind, id).await?)
    }

    async fn create_product(&self, input: NewProduct) -> Result<Product, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = product_queries::insert(&mut *tx, &input).await.map_err(StoreError::from);
        settle(tx, result).await
    }

    async fn update_product(&self, id: i64, input: NewProduct) -> Result<Product, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = match product_queries::update(&mut *tx, id, &input).await {
            Ok(Some(product)) => Ok(product),
            Ok(None) => Err(StoreError::NotFound(EntityKind::Product.not_found(id))),
            Err(e) => Err(e.into()),
        };
        settle(tx, result).await
    }

    async fn get_product(&self, id: i64) -> Result<Product, StoreError> {
        let mut conn = self.pool.acquire().await?;
        product_queries::fetch_one(&mut *conn, id)
            .await?
            .ok_or_else(|| StoreError::NotFound(EntityKind::Product.not_found(id)))
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(product_queries::fetch_all(&mut *conn).await?)
    }

    async fn delete_product(&self, id: i64) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result: Result<u64, StoreError> = async {
            let removed = price_queries::delete_for_product(&mut *tx, id).await?;
            if product_queries::delete(&mut *tx, id).await? == 0 {
                return Err(StoreError::NotFound(EntityKind::Product.not_found(id)));
            }
            Ok(removed)
        }
        .await;
        settle(tx, result).await
    }

    async fn create_market(&self, input: NewMarket) -> Result<Market, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = market_queries::insert(&mut *tx, &input).await.map_err(StoreError::from);
        settle(tx, result).await
    }

    async fn update_market(&self, id: i64, input: NewMarket) -> Result<Market, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = match market_queries::update(&mut *tx, id, &input).await {
            Ok(Some(market)) => Ok(market),
            Ok(None) => Err(StoreError::NotFound(EntityKind::Market.not_found(id))),
            Err(e) => Err(e.into()),
        };
        settle(tx, result).await
    }

    async fn get_market(&self, id: i64) -> Result<Market, StoreError> {
        let mut conn = self.pool.acquire().await?;
        market_queries::fetch_one(&mut *conn, id)
            .await?
            .ok_or_else(|| StoreError::NotFound(EntityKind::Market.not_found(id)))
    }

    async fn list_markets(&self) -> Result<Vec<Market>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(market_queries::fetch_all(&mut *conn).await?)
    }

    async fn delete_market(&self, id: i64) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result: Result<u64, StoreError> = async {
            let removed = price_queries::delete_for_market(&mut *tx, id).await?;
            if market_queries::delete(&mut *tx, id).await? == 0 {
                return Err(StoreError::NotFound(EntityKind::Market.not_found(id)));
            }
            Ok(removed)
        }
        .await;
        settle(tx, result).await
    }

    async fn create_price(&self, input: NewPrice) -> Result<Price, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = price_queries::insert(&mut *tx, &input).await.map_err(StoreError::from);
        settle(tx, result).await
    }

    async fn list_prices(&self, filter: PriceFilter) -> Result<Vec<Price>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(price_queries::fetch_filtered(&mut *conn, &filter).await?)
    }
}
