use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use super::{Store, StoreError};
use crate::models::{EntityKind, Market, NewMarket, NewPrice, NewProduct, Price, PriceFilter, Product};
use crate::validation::{CURRENCY_MAX_LEN, CURRENCY_MIN_LEN};

#[derive(Default)]
struct Tables {
    products: BTreeMap<i64, Product>,
    markets: BTreeMap<i64, Market>,
    prices: BTreeMap<i64, Price>,
    product_seq: i64,
    market_seq: i64,
    price_seq: i64,
}

impl Tables {
    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.products
            .values()
            .any(|p| p.name == name && Some(p.id) != except)
    }

    fn remove_prices_where(&mut self, pred: impl Fn(&Price) -> bool) -> u64 {
        let before = self.prices.len();
        self.prices.retain(|_, price| !pred(price));
        (before - self.prices.len()) as u64
    }
}

/// Process-local store with the same constraints as the PostgreSQL schema.
///
/// Every operation runs under one lock, which gives the all-or-nothing
/// behaviour of a transaction. Used by tests and by `STORAGE=memory`.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_market(input: &NewMarket) -> Result<(), StoreError> {
    if input.city.is_none() && input.region.is_none() {
        return Err(StoreError::Conflict("value rejected by ck_marches_locality".into()));
    }
    if input.latitude.is_some_and(|v| !(-90.0..=90.0).contains(&v)) {
        return Err(StoreError::Conflict("value rejected by ck_marches_latitude_range".into()));
    }
    if input.longitude.is_some_and(|v| !(-180.0..=180.0).contains(&v)) {
        return Err(StoreError::Conflict("value rejected by ck_marches_longitude_range".into()));
    }
    Ok(())
}

fn check_price(input: &NewPrice) -> Result<(), StoreError> {
    if !(input.value > 0.0) {
        return Err(StoreError::Conflict("value rejected by ck_prix_value_positive".into()));
    }
    let len = input.currency.chars().count();
    if !(CURRENCY_MIN_LEN..=CURRENCY_MAX_LEN).contains(&len) {
        return Err(StoreError::Conflict("value rejected by ck_prix_currency_len".into()));
    }
    if input.user_id.is_some_and(|id| id <= 0) {
        return Err(StoreError::Conflict("value rejected by ck_prix_user_id_positive".into()));
    }
    Ok(())
}

fn duplicate_product() -> StoreError {
    StoreError::Conflict("a product with this name already exists".to_string())
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn exists(&self, kind: EntityKind, id: i64) -> Result<bool, StoreError> {
        let tables = self.tables.lock();
        Ok(match kind {
            EntityKind::Product => tables.products.contains_key(&id),
            EntityKind::Market => tables.markets.contains_key(&id),
        })
    }

    async fn create_product(&self, input: NewProduct) -> Result<Product, StoreError> {
        let mut tables = self.tables.lock();
        if tables.name_taken(&input.name, None) {
            return Err(duplicate_product());
        }
        tables.product_seq += 1;
        let now = Utc::now();
        let product = Product {
            id: tables.product_seq,
            name: input.name,
            unit: input.unit,
            description: input.description,
            category: input.category,
            created_at: now,
            updated_at: now,
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: i64, input: NewProduct) -> Result<Product, StoreError> {
        let mut tables = self.tables.lock();
        if !tables.products.contains_key(&id) {
            return Err(StoreError::NotFound(EntityKind::Product.not_found(id)));
        }
        if tables.name_taken(&input.name, Some(id)) {
            return Err(duplicate_product());
        }
        let product = tables
            .products
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(EntityKind::Product.not_found(id)))?;
        product.name = input.name;
        product.unit = input.unit;
        product.description = input.description;
        product.category = input.category;
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn get_product(&self, id: i64) -> Result<Product, StoreError> {
        self.tables
            .lock()
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(EntityKind::Product.not_found(id)))
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let mut products: Vec<Product> = self.tables.lock().products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(products)
    }

    async fn delete_product(&self, id: i64) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock();
        if !tables.products.contains_key(&id) {
            return Err(StoreError::NotFound(EntityKind::Product.not_found(id)));
        }
        let removed = tables.remove_prices_where(|p| p.product_id == id);
        tables.products.remove(&id);
        Ok(removed)
    }

    async fn create_market(&self, input: NewMarket) -> Result<Market, StoreError> {
        check_market(&input)?;
        let mut tables = self.tables.lock();
        tables.market_seq += 1;
        let now = Utc::now();
        let market = Market {
            id: tables.market_seq,
            name: input.name,
            city: input.city,
            region: input.region,
            latitude: input.latitude,
            longitude: input.longitude,
            created_at: now,
            updated_at: now,
        };
        tables.markets.insert(market.id, market.clone());
        Ok(market)
    }

    async fn update_market(&self, id: i64, input: NewMarket) -> Result<Market, StoreError> {
        check_market(&input)?;
        let mut tables = self.tables.lock();
        let market = tables
            .markets
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(EntityKind::Market.not_found(id)))?;
        market.name = input.name;
        market.city = input.city;
        market.region = input.region;
        market.latitude = input.latitude;
        market.longitude = input.longitude;
        market.updated_at = Utc::now();
        Ok(market.clone())
    }

    async fn get_market(&self, id: i64) -> Result<Market, StoreError> {
        self.tables
            .lock()
            .markets
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(EntityKind::Market.not_found(id)))
    }

    async fn list_markets(&self) -> Result<Vec<Market>, StoreError> {
        let mut markets: Vec<Market> = self.tables.lock().markets.values().cloned().collect();
        markets.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(markets)
    }

    async fn delete_market(&self, id: i64) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock();
        if !tables.markets.contains_key(&id) {
            return Err(StoreError::NotFound(EntityKind::Market.not_found(id)));
        }
        let removed = tables.remove_prices_where(|p| p.market_id == id);
        tables.markets.remove(&id);
        Ok(removed)
    }

    async fn create_price(&self, input: NewPrice) -> Result<Price, StoreError> {
        check_price(&input)?;
        let mut tables = self.tables.lock();
        // Same outcome as a foreign key violation in PostgreSQL.
        if !tables.products.contains_key(&input.product_id) {
            return Err(StoreError::NotFound(EntityKind::Product.not_found(input.product_id)));
        }
        if !tables.markets.contains_key(&input.market_id) {
            return Err(StoreError::NotFound(EntityKind::Market.not_found(input.market_id)));
        }
        tables.price_seq += 1;
        let now = Utc::now();
        let price = Price {
            id: tables.price_seq,
            product_id: input.product_id,
            market_id: input.market_id,
            value: input.value,
            currency: input.currency,
            quality: input.quality,
            source: input.source,
            user_id: input.user_id,
            observed_at: input.observed_at,
            created_at: now,
            updated_at: now,
        };
        tables.prices.insert(price.id, price.clone());
        Ok(price)
    }

    async fn list_prices(&self, filter: PriceFilter) -> Result<Vec<Price>, StoreError> {
        let mut prices: Vec<Price> = self
            .tables
            .lock()
            .prices
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        prices.sort_by(|a, b| b.observed_at.cmp(&a.observed_at).then(b.id.cmp(&a.id)));
        prices.truncate(usize::try_from(filter.limit).unwrap_or(0));
        Ok(prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn product(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            unit: Some("kg".into()),
            description: None,
            category: None,
        }
    }

    fn market(name: &str) -> NewMarket {
        NewMarket {
            name: name.to_string(),
            city: Some("Dakar".into()),
            region: Some("Dakar".into()),
            latitude: None,
            longitude: None,
        }
    }

    fn price(product_id: i64, market_id: i64, minutes: i64) -> NewPrice {
        NewPrice {
            product_id,
            market_id,
            value: 450.0,
            currency: "XOF".into(),
            quality: None,
            source: None,
            user_id: None,
            observed_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes),
        }
    }

    #[tokio::test]
    async fn ids_are_generated_sequentially() {
        let store = MemoryStore::new();
        let a = store.create_product(product("Riz")).await.unwrap();
        let b = store.create_product(product("Mil")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(a.created_at, a.updated_at);
    }

    #[tokio::test]
    async fn duplicate_product_name_conflicts() {
        let store = MemoryStore::new();
        store.create_product(product("Riz")).await.unwrap();
        let err = store.create_product(product("Riz")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.list_products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rename_to_existing_name_conflicts() {
        let store = MemoryStore::new();
        store.create_product(product("Riz")).await.unwrap();
        let mil = store.create_product(product("Mil")).await.unwrap();
        let err = store.update_product(mil.id, product("Riz")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Keeping its own name is not a conflict.
        let same = store.update_product(mil.id, product("Mil")).await.unwrap();
        assert!(same.updated_at >= same.created_at);
    }

    #[tokio::test]
    async fn price_with_missing_reference_is_not_stored() {
        let store = MemoryStore::new();
        let m = store.create_market(market("Sandaga")).await.unwrap();
        let err = store.create_price(price(999, m.id, 0)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(store.list_prices(PriceFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn check_constraints_reject_bad_rows() {
        let store = MemoryStore::new();
        let p = store.create_product(product("Riz")).await.unwrap();
        let m = store.create_market(market("Sandaga")).await.unwrap();

        let mut bad = price(p.id, m.id, 0);
        bad.value = 0.0;
        assert!(matches!(store.create_price(bad).await, Err(StoreError::Conflict(_))));

        let mut bad = market("Tilène");
        bad.latitude = Some(91.0);
        assert!(matches!(store.create_market(bad).await, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn prices_are_listed_newest_first_and_capped() {
        let store = MemoryStore::new();
        let p = store.create_product(product("Riz")).await.unwrap();
        let m = store.create_market(market("Sandaga")).await.unwrap();
        for minutes in [5, 1, 9, 3] {
            store.create_price(price(p.id, m.id, minutes)).await.unwrap();
        }

        let filter = PriceFilter {
            limit: 3,
            ..PriceFilter::default()
        };
        let listed = store.list_prices(filter).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed.windows(2).all(|w| w[0].observed_at >= w[1].observed_at));
        assert_eq!(listed[0].observed_at, price(p.id, m.id, 9).observed_at);
    }

    #[tokio::test]
    async fn deleting_a_market_cascades_only_its_prices() {
        let store = MemoryStore::new();
        let p = store.create_product(product("Riz")).await.unwrap();
        let sandaga = store.create_market(market("Sandaga")).await.unwrap();
        let tilene = store.create_market(market("Tilène")).await.unwrap();
        store.create_price(price(p.id, sandaga.id, 0)).await.unwrap();
        store.create_price(price(p.id, sandaga.id, 1)).await.unwrap();
        store.create_price(price(p.id, tilene.id, 2)).await.unwrap();

        assert_eq!(store.delete_market(sandaga.id).await.unwrap(), 2);
        let remaining = store.list_prices(PriceFilter::default()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].market_id, tilene.id);
        assert!(!store.exists(EntityKind::Market, sandaga.id).await.unwrap());

        let err = store.delete_market(sandaga.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
