use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IconError {
    #[error("Icon {0} not recognized!")]
    Unknown(String),
}

/// A Font Awesome glyph on a colored Leaflet marker pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerIcon {
    pub color: &'static str,
    pub glyph: &'static str,
    pub prefix: &'static str,
}

impl MarkerIcon {
    const fn fa(color: &'static str, glyph: &'static str) -> Self {
        Self {
            color,
            glyph,
            prefix: "fa",
        }
    }

    /// Resolve an icon name (a category name or a per-place override).
    ///
    /// Category names match loosely so that both "hotel" and "hotels" work.
    pub fn from_name(name: &str) -> Result<Self, IconError> {
        let icon = if name.contains("hotel") {
            Self::fa("green", "bed")
        } else if name == "location" {
            Self::fa("blue", "location-dot")
        } else if name.contains("landmark") {
            Self::fa("red", "landmark")
        } else if name == "volcano" {
            Self::fa("red", "volcano")
        } else if name == "waterfall" {
            Self::fa("red", "water")
        } else if name == "tree" {
            Self::fa("red", "tree")
        } else if name.contains("food") || name == "restaurant" {
            Self::fa("orange", "utensils")
        } else {
            return Err(IconError::Unknown(name.to_string()));
        };
        Ok(icon)
    }
}
