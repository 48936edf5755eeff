use tracing::info;

use crate::errors::AppError;
use crate::models::{CreateMarket, Market};
use crate::store::Store;

pub async fn create(store: &dyn Store, input: CreateMarket) -> Result<Market, AppError> {
    let new_market = input.validate()?;
    let market = store.create_market(new_market).await?;
    info!("Created market {} ({})", market.id, market.name);
    Ok(market)
}

pub async fn update(store: &dyn Store, id: i64, input: CreateMarket) -> Result<Market, AppError> {
    let new_market = input.validate()?;
    let market = store.update_market(id, new_market).await?;
    Ok(market)
}

pub async fn fetch_all(store: &dyn Store) -> Result<Vec<Market>, AppError> {
    let markets = store.list_markets().await?;
    Ok(markets)
}

pub async fn fetch_one(store: &dyn Store, id: i64) -> Result<Market, AppError> {
    let market = store.get_market(id).await?;
    Ok(market)
}

pub async fn delete(store: &dyn Store, id: i64) -> Result<u64, AppError> {
    let removed = store.delete_market(id).await?;
    info!("Deleted market {} and {} dependent price(s)", id, removed);
    Ok(removed)
}
