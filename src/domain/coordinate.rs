use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use std::fmt;

/// A WGS84 point, stored in documents as a `[lat, lon]` array
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Read a coordinate out of a document value.
    ///
    /// Anything other than a two-element array of numbers (`null`, `[]`,
    /// `[null, null]`, a string) yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value.as_array()?.as_slice() {
            [lat, lon] => Some(Self::new(lat.as_f64()?, lon.as_f64()?)),
            _ => None,
        }
    }

    /// Value written for a location the geocoder could not resolve
    pub fn unresolved() -> Value {
        json!([null, null])
    }

    pub fn to_value(self) -> Value {
        json!([self.lat, self.lon])
    }

    pub fn as_tuple(self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(c: Coordinate) -> Self {
        c.as_tuple()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

/// Whether a `coordinates` attribute still has to be looked up
pub fn needs_lookup(value: Option<&Value>) -> bool {
    value.and_then(Coordinate::from_value).is_none()
}

/// Serde helper for attributes that may hold a partial or null coordinate
pub(crate) fn lenient<'de, D>(deserializer: D) -> Result<Option<Coordinate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Coordinate::from_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value() {
        assert_eq!(
            Coordinate::from_value(&json!([64.1466, -21.9426])),
            Some(Coordinate::new(64.1466, -21.9426))
        );
        assert_eq!(Coordinate::from_value(&json!([null, null])), None);
        assert_eq!(Coordinate::from_value(&json!([])), None);
        assert_eq!(Coordinate::from_value(&json!([1.0])), None);
        assert_eq!(Coordinate::from_value(&Value::Null), None);
    }

    #[test]
    fn test_needs_lookup() {
        assert!(needs_lookup(None));
        assert!(needs_lookup(Some(&Value::Null)));
        assert!(needs_lookup(Some(&json!([51.5, null]))));
        assert!(!needs_lookup(Some(&json!([51.5, -0.12]))));
    }

    #[test]
    fn test_serializes_as_array() {
        let json = serde_json::to_string(&Coordinate::new(51.5, -0.12)).unwrap();
        assert_eq!(json, "[51.5,-0.12]");
        assert_eq!(Coordinate::unresolved(), json!([null, null]));
    }
}
