use tracing::info;

use crate::errors::AppError;
use crate::models::{CreateProduct, Product};
use crate::store::Store;

pub async fn create(store: &dyn Store, input: CreateProduct) -> Result<Product, AppError> {
    let new_product = input.validate()?;
    let product = store.create_product(new_product).await?;
    info!("Created product {} ({})", product.id, product.name);
    Ok(product)
}

pub async fn update(store: &dyn Store, id: i64, input: CreateProduct) -> Result<Product, AppError> {
    let new_product = input.validate()?;
    let product = store.update_product(id, new_product).await?;
    Ok(product)
}

pub async fn fetch_all(store: &dyn Store) -> Result<Vec<Product>, AppError> {
    let products = store.list_products().await?;
    Ok(products)
}

pub async fn fetch_one(store: &dyn Store, id: i64) -> Result<Product, AppError> {
    let product = store.get_product(id).await?;
    Ok(product)
}

/// Deletes the product together with its price history.
pub async fn delete(store: &dyn Store, id: i64) -> Result<u64, AppError> {
    let removed = store.delete_product(id).await?;
    info!("Deleted product {} and {} dependent price(s)", id, removed);
    Ok(removed)
}
