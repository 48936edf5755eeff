mod market;
mod price;
mod product;

pub use market::{CreateMarket, Market, NewMarket};
pub use price::{CreatePrice, NewPrice, Price, PriceFilter, PriceQuery, MAX_PRICE_ROWS};
pub use product::{CreateProduct, NewProduct, Product};

/// Entities a price refers to, used for existence checks and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Product,
    Market,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Product => "product",
            EntityKind::Market => "market",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Product => "produits",
            EntityKind::Market => "marches",
        }
    }

    pub fn not_found(self, id: i64) -> String {
        format!("{} {} not found", self.label(), id)
    }
}
