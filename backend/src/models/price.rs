use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::{
    currency_code, optional_text, positive_id, required, strictly_positive, ValidationErrors,
};

pub const QUALITY_MAX_LEN: usize = 120;
pub const SOURCE_MAX_LEN: usize = 255;
pub const MAX_PRICE_ROWS: i64 = 100;

// One observed price of a product at a market at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Price {
    pub id: i64,
    pub product_id: i64,
    pub market_id: i64,
    pub value: f64,
    pub currency: String,
    pub quality: Option<String>,
    pub source: Option<String>,
    pub user_id: Option<i64>,
    pub observed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePrice {
    pub product_id: Option<i64>,
    pub market_id: Option<i64>,
    pub value: Option<f64>,
    pub currency: Option<String>,
    pub quality: Option<String>,
    pub source: Option<String>,
    pub user_id: Option<i64>,
    #[serde(alias = "collected_at", alias = "date")]
    pub observed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPrice {
    pub product_id: i64,
    pub market_id: i64,
    pub value: f64,
    pub currency: String,
    pub quality: Option<String>,
    pub source: Option<String>,
    pub user_id: Option<i64>,
    pub observed_at: DateTime<Utc>,
}

impl CreatePrice {
    /// Pure checks only. Whether `product_id` and `market_id` point at
    /// existing rows is decided by the service against the store.
    pub fn validate(&self) -> Result<NewPrice, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        // Any present id is accepted here; one that matches no row is a
        // not-found, decided against the store.
        let product_id = errors.take(required("product_id", self.product_id));
        let market_id = errors.take(required("market_id", self.market_id));
        let value = errors.take(strictly_positive("value", self.value));
        let currency = errors.take(currency_code("currency", self.currency.as_deref()));
        let quality = errors.take(optional_text("quality", self.quality.as_deref(), QUALITY_MAX_LEN));
        let source = errors.take(optional_text("source", self.source.as_deref(), SOURCE_MAX_LEN));
        let user_id = errors.take(positive_id("user_id", self.user_id));
        let observed_at = errors.take(required("observed_at", self.observed_at));

        errors.finish(NewPrice {
            product_id,
            market_id,
            value,
            currency,
            quality,
            source,
            user_id,
            observed_at,
        })
    }
}

/// Query string of `GET /prix/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceQuery {
    pub product_id: Option<i64>,
    pub market_id: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceFilter {
    pub product_id: Option<i64>,
    pub market_id: Option<i64>,
    pub limit: i64,
}

impl Default for PriceFilter {
    fn default() -> Self {
        Self {
            product_id: None,
            market_id: None,
            limit: MAX_PRICE_ROWS,
        }
    }
}

impl From<PriceQuery> for PriceFilter {
    fn from(query: PriceQuery) -> Self {
        Self {
            product_id: query.product_id,
            market_id: query.market_id,
            limit: query.limit.unwrap_or(MAX_PRICE_ROWS).clamp(1, MAX_PRICE_ROWS),
        }
    }
}

impl PriceFilter {
    pub fn matches(&self, price: &Price) -> bool {
        self.product_id.map_or(true, |id| price.product_id == id)
            && self.market_id.map_or(true, |id| price.market_id == id)
    }
}
