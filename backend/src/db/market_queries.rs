use sqlx::PgConnection;

use crate::models::{Market, NewMarket};

const COLUMNS: &str = "id, name, city, region, latitude, longitude, created_at, updated_at";

pub async fn fetch_all(conn: &mut PgConnection) -> Result<Vec<Market>, sqlx::Error> {
    sqlx::query_as::<_, Market>(&format!(
        "SELECT {COLUMNS} FROM marches ORDER BY name ASC, id ASC"
    ))
    .fetch_all(conn)
    .await
}

pub async fn fetch_one(conn: &mut PgConnection, id: i64) -> Result<Option<Market>, sqlx::Error> {
    sqlx::query_as::<_, Market>(&format!("SELECT {COLUMNS} FROM marches WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn insert(conn: &mut PgConnection, input: &NewMarket) -> Result<Market, sqlx::Error> {
    sqlx::query_as::<_, Market>(&format!(
        "INSERT INTO marches (name, city, region, latitude, longitude)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COLUMNS}"
    ))
    .bind(&input.name)
    .bind(&input.city)
    .bind(&input.region)
    .bind(input.latitude)
    .bind(input.longitude)
    .fetch_one(conn)
    .await
}

pub async fn update(
    conn: &mut PgConnection,
    id: i64,
    input: &NewMarket,
) -> Result<Option<Market>, sqlx::Error> {
    sqlx::query_as::<_, Market>(&format!(
        "UPDATE marches
         SET name = $1, city = $2, region = $3, latitude = $4, longitude = $5, updated_at = now()
         WHERE id = $6
         RETURNING {COLUMNS}"
    ))
    .bind(&input.name)
    .bind(&input.city)
    .bind(&input.region)
    .bind(input.latitude)
    .bind(input.longitude)
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn delete(conn: &mut PgConnection, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM marches WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
