use serde::Deserialize;
use std::fmt;

use super::coordinate::{self, Coordinate};

pub const DEFAULT_PRICE_UNIT: &str = "&euro;";

fn default_price_unit() -> String {
    DEFAULT_PRICE_UNIT.to_string()
}

/// The `main` section of a map document
#[derive(Debug, Clone, Deserialize)]
pub struct MainSection {
    #[serde(default, deserialize_with = "coordinate::lenient")]
    pub coordinates: Option<Coordinate>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default = "default_price_unit")]
    pub price_unit: String,
    #[serde(default)]
    pub zoom: Option<u8>,
}

impl Default for MainSection {
    fn default() -> Self {
        Self {
            coordinates: None,
            country: None,
            price_unit: default_price_unit(),
            zoom: None,
        }
    }
}

/// Price attribute: either a plain amount or free text such as "free" or "50-80"
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(f64),
    Text(String),
}

impl Price {
    pub fn is_free(&self) -> bool {
        match self {
            Price::Amount(a) => *a == 0.0,
            Price::Text(t) => {
                let t = t.trim();
                t.eq_ignore_ascii_case("free") || t.eq_ignore_ascii_case("gratis") || t == "0"
            }
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Amount(a) if a.fract() == 0.0 && a.abs() < 1e15 => write!(f, "{}", *a as i64),
            Price::Amount(a) => write!(f, "{}", a),
            Price::Text(t) => f.write_str(t),
        }
    }
}

/// Attributes of one location under a marker category
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Place {
    #[serde(default, deserialize_with = "coordinate::lenient")]
    pub coordinates: Option<Coordinate>,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, alias = "prijs")]
    pub price: Option<Price>,
    #[serde(default, alias = "beschikbaarheid")]
    pub availability: Vec<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_place_accepts_dutch_keys() {
        let place: Place = serde_json::from_value(json!({
            "coordinates": [64.0, -21.0],
            "prijs": 120,
            "beschikbaarheid": ["12 juli", "13 juli"],
            "website": "https://example.com"
        }))
        .unwrap();

        assert_eq!(place.coordinates, Some(Coordinate::new(64.0, -21.0)));
        assert_eq!(place.price, Some(Price::Amount(120.0)));
        assert_eq!(place.availability.len(), 2);
        assert!(place.info.is_none());
    }

    #[test]
    fn test_place_with_unresolved_coordinates() {
        let place: Place = serde_json::from_value(json!({"coordinates": [null, null]})).unwrap();
        assert!(place.coordinates.is_none());
    }

    #[test]
    fn test_price_display_and_free() {
        assert_eq!(Price::Amount(120.0).to_string(), "120");
        assert_eq!(Price::Amount(89.5).to_string(), "89.5");
        assert_eq!(Price::Text("50-80".into()).to_string(), "50-80");
        assert!(Price::Amount(0.0).is_free());
        assert!(Price::Text("Gratis".into()).is_free());
        assert!(!Price::Text("50".into()).is_free());
    }

    #[test]
    fn test_main_section_defaults() {
        let main: MainSection = serde_json::from_value(json!({"country": "iceland"})).unwrap();
        assert_eq!(main.price_unit, DEFAULT_PRICE_UNIT);
        assert!(main.coordinates.is_none());
        assert_eq!(main.country.as_deref(), Some("iceland"));
    }
}
