use sqlx::PgConnection;

use crate::models::{NewPrice, Price, PriceFilter};

const COLUMNS: &str =
    "id, product_id, market_id, value, currency, quality, source, user_id, observed_at, created_at, updated_at";

pub async fn insert(conn: &mut PgConnection, input: &NewPrice) -> Result<Price, sqlx::Error> {
    sqlx::query_as::<_, Price>(&format!(
        "INSERT INTO prix (product_id, market_id, value, currency, quality, source, user_id, observed_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING {COLUMNS}"
    ))
    .bind(input.product_id)
    .bind(input.market_id)
    .bind(input.value)
    .bind(&input.currency)
    .bind(&input.quality)
    .bind(&input.source)
    .bind(input.user_id)
    .bind(input.observed_at)
    .fetch_one(conn)
    .await
}

/// Most recent observations first, optionally narrowed to a product and/or
/// market. Served by `ix_prix_product_market_observed` when both are given.
pub async fn fetch_filtered(
    conn: &mut PgConnection,
    filter: &PriceFilter,
) -> Result<Vec<Price>, sqlx::Error> {
    sqlx::query_as::<_, Price>(&format!(
        "SELECT {COLUMNS}
         FROM prix
         WHERE ($1::BIGINT IS NULL OR product_id = $1)
           AND ($2::BIGINT IS NULL OR market_id = $2)
         ORDER BY observed_at DESC, id DESC
         LIMIT $3"
    ))
    .bind(filter.product_id)
    .bind(filter.market_id)
    .bind(filter.limit)
    .fetch_all(conn)
    .await
}

pub async fn delete_for_product(conn: &mut PgConnection, product_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM prix WHERE product_id = $1")
        .bind(product_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_for_market(conn: &mut PgConnection, market_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM prix WHERE market_id = $1")
        .bind(market_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
