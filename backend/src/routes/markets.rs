use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use tracing::{error, info};

use super::Deleted;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::{CreateMarket, Market};
use crate::services::market_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/marches", post(create_market).get(fetch_markets))
        .route("/marches/", post(create_market).get(fetch_markets))
        .route(
            "/marches/:id",
            get(get_market).put(update_market).delete(delete_market),
        )
}

pub async fn create_market(
    State(state): State<AppState>,
    AppJson(data): AppJson<CreateMarket>,
) -> Result<(StatusCode, Json<Market>), AppError> {
    info!("POST /marches - Creating new market");
    let market = market_service::create(state.store.as_ref(), data)
        .await
        .map_err(|e| {
            error!("Failed to create market: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(market)))
}

pub async fn fetch_markets(State(state): State<AppState>) -> Result<Json<Vec<Market>>, AppError> {
    info!("GET /marches - Fetching all markets");
    let markets = market_service::fetch_all(state.store.as_ref()).await?;
    Ok(Json(markets))
}

pub async fn get_market(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Market>, AppError> {
    info!("GET /marches/{} - Fetching market", id);
    let market = market_service::fetch_one(state.store.as_ref(), id).await?;
    Ok(Json(market))
}

pub async fn update_market(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(data): AppJson<CreateMarket>,
) -> Result<Json<Market>, AppError> {
    info!("PUT /marches/{} - Updating market", id);
    let market = market_service::update(state.store.as_ref(), id, data)
        .await
        .map_err(|e| {
            error!("Failed to update market {}: {}", id, e);
            e
        })?;
    Ok(Json(market))
}

pub async fn delete_market(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Deleted>, AppError> {
    info!("DELETE /marches/{} - Deleting market", id);
    let deleted_prices = market_service::delete(state.store.as_ref(), id)
        .await
        .map_err(|e| {
            error!("Failed to delete market {}: {}", id, e);
            e
        })?;
    Ok(Json(Deleted { id, deleted_prices }))
}
