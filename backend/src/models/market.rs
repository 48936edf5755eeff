use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::{optional_in_range, optional_text, required_text, FieldError, ValidationErrors};

pub const NAME_MAX_LEN: usize = 160;
pub const LOCALITY_MAX_LEN: usize = 120;

// A place where prices are observed, from a city market to a wholesale hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Market {
    pub id: i64,
    pub name: String,
    pub city: Option<String>,
    pub region: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateMarket {
    pub name: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMarket {
    pub name: String,
    pub city: Option<String>,
    pub region: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CreateMarket {
    pub fn validate(&self) -> Result<NewMarket, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = errors.take(required_text("name", self.name.as_deref(), NAME_MAX_LEN));
        let city = errors.take(optional_text("city", self.city.as_deref(), LOCALITY_MAX_LEN));
        let region = errors.take(optional_text("region", self.region.as_deref(), LOCALITY_MAX_LEN));
        let latitude = errors.take(optional_in_range("latitude", self.latitude, -90.0, 90.0));
        let longitude = errors.take(optional_in_range("longitude", self.longitude, -180.0, 180.0));

        // At least one locality, unless one of them already failed on length.
        if city.is_none() && region.is_none() && !errors.has_field("city") && !errors.has_field("region") {
            errors.push(FieldError::new("city", "city or region is required"));
        }

        errors.finish(NewMarket {
            name,
            city,
            region,
            latitude,
            longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sandaga() -> CreateMarket {
        CreateMarket {
            name: Some("Marché Sandaga".into()),
            city: Some("Dakar".into()),
            region: Some("Dakar".into()),
            latitude: Some(14.6712),
            longitude: Some(-17.4381),
        }
    }

    #[test]
    fn valid_market_passes() {
        let market = sandaga().validate().unwrap();
        assert_eq!(market.name, "Marché Sandaga");
        assert_eq!(market.city.as_deref(), Some("Dakar"));
    }

    #[test]
    fn coordinate_boundaries_are_accepted() {
        for (lat, lon) in [(-90.0, -180.0), (90.0, 180.0), (0.0, 0.0)] {
            let input = CreateMarket {
                latitude: Some(lat),
                longitude: Some(lon),
                ..sandaga()
            };
            assert!(input.validate().is_ok(), "({lat}, {lon}) should be accepted");
        }
    }

    #[test]
    fn coordinates_out_of_range_are_rejected() {
        let input = CreateMarket {
            latitude: Some(-90.5),
            longitude: Some(180.1),
            ..sandaga()
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.has_field("latitude"));
        assert!(errors.has_field("longitude"));
    }

    #[test]
    fn one_locality_is_enough() {
        let city_only = CreateMarket {
            region: None,
            ..sandaga()
        };
        assert!(city_only.validate().is_ok());

        let region_only = CreateMarket {
            city: Some("  ".into()),
            ..sandaga()
        };
        let market = region_only.validate().unwrap();
        assert_eq!(market.city, None);
        assert_eq!(market.region.as_deref(), Some("Dakar"));
    }

    #[test]
    fn missing_locality_is_rejected() {
        let input = CreateMarket {
            city: None,
            region: None,
            ..sandaga()
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.has_field("city"));
    }
}
