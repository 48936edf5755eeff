use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{CreatePrice, EntityKind, Price, PriceFilter, PriceQuery};
use crate::store::Store;

/// Records one price observation.
///
/// Field checks run first and touch nothing. Then both references are
/// looked up; a missing product or market is reported as not found before
/// any write is attempted. A reference deleted between the lookup and the
/// insert is still caught by the store's foreign keys.
pub async fn create(store: &dyn Store, input: CreatePrice) -> Result<Price, AppError> {
    let new_price = input.validate()?;

    for (kind, id) in [
        (EntityKind::Product, new_price.product_id),
        (EntityKind::Market, new_price.market_id),
    ] {
        if !store.exists(kind, id).await? {
            warn!("Rejecting price: {} {} does not exist", kind.label(), id);
            return Err(AppError::NotFound(kind.not_found(id)));
        }
    }

    let price = store.create_price(new_price).await?;
    info!(
        "Recorded price {} for product {} at market {}: {} {}",
        price.id, price.product_id, price.market_id, price.value, price.currency
    );
    Ok(price)
}

pub async fn list(store: &dyn Store, query: PriceQuery) -> Result<Vec<Price>, AppError> {
    let prices = store.list_prices(PriceFilter::from(query)).await?;
    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateMarket, CreateProduct};
    use crate::services::{market_service, product_service};
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        product_service::create(
            &store,
            CreateProduct {
                name: Some("Riz".into()),
                unit: Some("kg".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        market_service::create(
            &store,
            CreateMarket {
                name: Some("Marché Sandaga".into()),
                city: Some("Dakar".into()),
                region: Some("Dakar".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        store
    }

    fn input(product_id: i64, market_id: i64, value: f64) -> CreatePrice {
        CreatePrice {
            product_id: Some(product_id),
            market_id: Some(market_id),
            value: Some(value),
            currency: Some("xof".into()),
            observed_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let store = seeded().await;
        let err = create(&store, input(999, 1, 100.0)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg.contains("product 999")));
        assert!(list(&store, PriceQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_market_is_not_found() {
        let store = seeded().await;
        let err = create(&store, input(1, 42, 100.0)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg.contains("market 42")));
    }

    #[tokio::test]
    async fn invalid_value_is_rejected_before_lookup() {
        let store = seeded().await;
        // Both the value and the product are wrong; field checks win.
        let err = create(&store, input(999, 1, -5.0)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref e) if e.has_field("value")));
    }

    #[tokio::test]
    async fn valid_price_is_stored_with_normalized_currency() {
        let store = seeded().await;
        let price = create(&store, input(1, 1, 450.0)).await.unwrap();
        assert_eq!(price.currency, "XOF");
        assert_eq!(list(&store, PriceQuery::default()).await.unwrap(), vec![price]);
    }
}
