pub(crate) mod health;
pub(crate) mod markets;
pub(crate) mod prices;
pub(crate) mod products;

use serde::Serialize;

/// Response of the cascading deletes.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: i64,
    pub deleted_prices: u64,
}
