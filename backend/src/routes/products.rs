use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use tracing::{error, info};

use super::Deleted;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::{CreateProduct, Product};
use crate::services::product_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/produits", post(create_product).get(fetch_products))
        .route("/produits/", post(create_product).get(fetch_products))
        .route(
            "/produits/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

pub async fn create_product(
    State(state): State<AppState>,
    AppJson(data): AppJson<CreateProduct>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    info!("POST /produits - Creating new product");
    let product = product_service::create(state.store.as_ref(), data)
        .await
        .map_err(|e| {
            error!("Failed to create product: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn fetch_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    info!("GET /produits - Fetching all products");
    let products = product_service::fetch_all(state.store.as_ref()).await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, AppError> {
    info!("GET /produits/{} - Fetching product", id);
    let product = product_service::fetch_one(state.store.as_ref(), id).await?;
    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(data): AppJson<CreateProduct>,
) -> Result<Json<Product>, AppError> {
    info!("PUT /produits/{} - Updating product", id);
    let product = product_service::update(state.store.as_ref(), id, data)
        .await
        .map_err(|e| {
            error!("Failed to update product {}: {}", id, e);
            e
        })?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Deleted>, AppError> {
    info!("DELETE /produits/{} - Deleting product", id);
    let deleted_prices = product_service::delete(state.store.as_ref(), id)
        .await
        .map_err(|e| {
            error!("Failed to delete product {}: {}", id, e);
            e
        })?;
    Ok(Json(Deleted { id, deleted_prices }))
}
