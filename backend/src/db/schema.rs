//! Table definitions for the three entities.
//!
//! Every statement is idempotent (`IF NOT EXISTS`) so the schema can be
//! applied on each startup. The constraints here repeat the checks done in
//! `crate::validation`, so rows written by anything other than this service
//! are held to the same rules.

use sqlx::PgPool;
use tracing::info;

pub const UQ_PRODUCT_NAME: &str = "uq_produits_name";

pub const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS produits (
        id          BIGSERIAL PRIMARY KEY,
        name        VARCHAR(120) NOT NULL,
        unit        VARCHAR(32),
        description TEXT,
        category    VARCHAR(120),
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        CONSTRAINT uq_produits_name UNIQUE (name),
        CONSTRAINT ck_produits_name_not_blank CHECK (length(btrim(name)) > 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS marches (
        id          BIGSERIAL PRIMARY KEY,
        name        VARCHAR(160) NOT NULL,
        city        VARCHAR(120),
        region      VARCHAR(120),
        latitude    DOUBLE PRECISION,
        longitude   DOUBLE PRECISION,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        CONSTRAINT ck_marches_name_not_blank CHECK (length(btrim(name)) > 0),
        CONSTRAINT ck_marches_locality CHECK (city IS NOT NULL OR region IS NOT NULL),
        CONSTRAINT ck_marches_latitude_range
            CHECK (latitude IS NULL OR (latitude >= -90 AND latitude <= 90)),
        CONSTRAINT ck_marches_longitude_range
            CHECK (longitude IS NULL OR (longitude >= -180 AND longitude <= 180))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS prix (
        id          BIGSERIAL PRIMARY KEY,
        product_id  BIGINT NOT NULL REFERENCES produits (id) ON DELETE CASCADE,
        market_id   BIGINT NOT NULL REFERENCES marches (id) ON DELETE CASCADE,
        value       DOUBLE PRECISION NOT NULL,
        currency    VARCHAR(8) NOT NULL DEFAULT 'XOF',
        quality     VARCHAR(120),
        source      VARCHAR(255),
        user_id     BIGINT,
        observed_at TIMESTAMPTZ NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        CONSTRAINT ck_prix_value_positive CHECK (value > 0),
        CONSTRAINT ck_prix_currency_len CHECK (char_length(currency) BETWEEN 3 AND 8),
        CONSTRAINT ck_prix_user_id_positive CHECK (user_id IS NULL OR user_id > 0)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_marches_city ON marches (city)",
    "CREATE INDEX IF NOT EXISTS ix_prix_product_id ON prix (product_id)",
    "CREATE INDEX IF NOT EXISTS ix_prix_market_id ON prix (market_id)",
    "CREATE INDEX IF NOT EXISTS ix_prix_user_id ON prix (user_id)",
    "CREATE INDEX IF NOT EXISTS ix_prix_product_market_observed ON prix (product_id, market_id, observed_at)",
];

pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in STATEMENTS.iter().copied() {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    info!("🗄️ Schema ready ({} statements applied)", STATEMENTS.len());
    Ok(())
}
