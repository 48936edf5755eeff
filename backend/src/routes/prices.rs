use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use http::StatusCode;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::models::{CreatePrice, Price, PriceQuery};
use crate::services::price_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/prix", post(create_price).get(fetch_prices))
        .route("/prix/", post(create_price).get(fetch_prices))
}

pub async fn create_price(
    State(state): State<AppState>,
    AppJson(data): AppJson<CreatePrice>,
) -> Result<(StatusCode, Json<Price>), AppError> {
    info!("POST /prix - Recording price observation");
    let price = price_service::create(state.store.as_ref(), data)
        .await
        .map_err(|e| {
            match &e {
                AppError::Validation(_) | AppError::NotFound(_) => warn!("Rejected price: {}", e),
                _ => error!("Failed to record price: {}", e),
            }
            e
        })?;
    Ok((StatusCode::CREATED, Json(price)))
}

pub async fn fetch_prices(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PriceQuery>,
) -> Result<Json<Vec<Price>>, AppError> {
    info!("GET /prix - Fetching prices {:?}", query);
    let prices = price_service::list(state.store.as_ref(), query).await?;
    Ok(Json(prices))
}
