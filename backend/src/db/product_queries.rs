use sqlx::PgConnection;

use crate::models::{NewProduct, Product};

const COLUMNS: &str = "id, name, unit, description, category, created_at, updated_at";

pub async fn fetch_all(conn: &mut PgConnection) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!(
        "SELECT {COLUMNS} FROM produits ORDER BY name ASC, id ASC"
    ))
    .fetch_all(conn)
    .await
}

pub async fn fetch_one(conn: &mut PgConnection, id: i64) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM produits WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn insert(conn: &mut PgConnection, input: &NewProduct) -> Result<Product, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!(
        "INSERT INTO produits (name, unit, description, category)
         VALUES ($1, $2, $3, $4)
         RETURNING {COLUMNS}"
    ))
    .bind(&input.name)
    .bind(&input.unit)
    .bind(&input.description)
    .bind(&input.category)
    .fetch_one(conn)
    .await
}

pub async fn update(
    conn: &mut PgConnection,
    id: i64,
    input: &NewProduct,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!(
        "UPDATE produits
         SET name = $1, unit = $2, description = $3, category = $4, updated_at = now()
         WHERE id = $5
         RETURNING {COLUMNS}"
    ))
    .bind(&input.name)
    .bind(&input.unit)
    .bind(&input.description)
    .bind(&input.category)
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn delete(conn: &mut PgConnection, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM produits WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
