pub mod market_queries;
pub mod price_queries;
pub mod product_queries;
pub mod schema;

use sqlx::PgConnection;

use crate::models::EntityKind;

pub async fn exists(conn: &mut PgConnection, kind: EntityKind, id: i64) -> Result<bool, sqlx::Error> {
    // Table names come from a closed enum, never from input.
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", kind.table());
    sqlx::query_scalar::<_, bool>(&sql)
        .bind(id)
        .fetch_one(conn)
        .await
}
