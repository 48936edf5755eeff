use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::{optional_text, required_text, ValidationErrors};

pub const NAME_MAX_LEN: usize = 120;
pub const UNIT_MAX_LEN: usize = 32;
pub const DESCRIPTION_MAX_LEN: usize = 10_000;
pub const CATEGORY_MAX_LEN: usize = 120;

// A commodity whose price is tracked (e.g. "Riz", "Huile", "Oignon").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /produits/` and `PUT /produits/:id`.
///
/// Every field is optional at the serde level so that a missing `name`
/// surfaces as a field error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProduct {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// A product payload that passed validation; the only form the store accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl CreateProduct {
    pub fn validate(&self) -> Result<NewProduct, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = errors.take(required_text("name", self.name.as_deref(), NAME_MAX_LEN));
        let unit = errors.take(optional_text("unit", self.unit.as_deref(), UNIT_MAX_LEN));
        let description = errors.take(optional_text(
            "description",
            self.description.as_deref(),
            DESCRIPTION_MAX_LEN,
        ));
        let category = errors.take(optional_text("category", self.category.as_deref(), CATEGORY_MAX_LEN));

        errors.finish(NewProduct {
            name,
            unit,
            description,
            category,
        })
    }
}
