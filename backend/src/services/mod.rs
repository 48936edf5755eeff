pub mod market_service;
pub mod price_service;
pub mod product_service;
