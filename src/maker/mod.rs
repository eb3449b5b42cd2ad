//! Turns a loaded map document into a rendered map page.

pub mod backfill;

use anyhow::{Context, Result, bail};
use indicatif::ProgressBar;
use std::path::PathBuf;

use crate::api::Geocoder;
use crate::config::{DEFAULT_POPUP_HEIGHT, DEFAULT_POPUP_WIDTH, DEFAULT_ZOOM};
use crate::document::MapItems;
use crate::domain::{Coordinate, MainSection, MarkerIcon};
use crate::geometry::LatLonBounds;
use crate::i18n::{Language, capitalize};
use crate::render::{MapPage, MarkerSpec, PopupStyle, popup_html};

pub use backfill::{BackfillReport, add_coordinates, backfill_center};

/// Presentation settings resolved from flags and the config file
#[derive(Debug, Clone)]
pub struct Settings {
    pub language: Language,
    /// Zoom forced from the command line; beats the document's `main.zoom`
    pub zoom_override: Option<u8>,
    /// Zoom used when neither the command line nor the document sets one
    pub default_zoom: u8,
    pub popup_width: u32,
    pub popup_height: u32,
    pub fit_bounds: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            zoom_override: None,
            default_zoom: DEFAULT_ZOOM,
            popup_width: DEFAULT_POPUP_WIDTH,
            popup_height: DEFAULT_POPUP_HEIGHT,
            fit_bounds: false,
        }
    }
}

/// Default output file: `{Country}Map.html`, or `map.html` without a country
pub fn default_output(main: &MainSection) -> PathBuf {
    match main.country.as_deref().map(str::trim) {
        Some(country) if !country.is_empty() => {
            PathBuf::from(format!("{}Map.html", capitalize(&country.to_lowercase())))
        }
        _ => PathBuf::from("map.html"),
    }
}

pub struct MapMaker {
    items: MapItems,
    geocoder: Option<Box<dyn Geocoder>>,
    settings: Settings,
}

impl MapMaker {
    /// A maker without a geocoder; missing coordinates stay missing
    pub fn new(items: MapItems, settings: Settings) -> Self {
        Self {
            items,
            geocoder: None,
            settings,
        }
    }

    pub fn with_geocoder(mut self, geocoder: Box<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn items(&self) -> &MapItems {
        &self.items
    }

    /// Look up the center and every marker category's missing coordinates
    pub fn backfill(&mut self, progress: &ProgressBar) -> Result<BackfillReport> {
        let Some(geocoder) = self.geocoder.as_deref() else {
            return Ok(BackfillReport::default());
        };

        let center_saved = backfill_center(&mut self.items, geocoder)?;
        let categories = self.items.categories()?;
        let mut report = add_coordinates(&mut self.items, &categories, geocoder, progress)?;
        report.saved |= center_saved;
        Ok(report)
    }

    /// Build the map page. Every marker must have coordinates by now.
    pub fn build_page(&self) -> Result<MapPage> {
        let main = self.items.main_section()?;
        let style = PopupStyle {
            labels: self.settings.language.labels(),
            price_unit: &main.price_unit,
        };

        let mut markers = Vec::new();
        for category in self.items.categories()? {
            for (name, place) in self.items.places(&category)? {
                let Some(location) = place.coordinates else {
                    bail!("{} is missing coordinates! (category {})", name, category);
                };
                let icon_name = place.icon.as_deref().unwrap_or(&category);
                let icon = MarkerIcon::from_name(icon_name)
                    .with_context(|| format!("Invalid icon for {}", name))?;

                markers.push(MarkerSpec {
                    popup: popup_html(&name, &place, &style),
                    name,
                    category: category.clone(),
                    location,
                    icon,
                });
            }
        }

        let center = self.center(&main, &markers)?;
        let zoom = self
            .settings
            .zoom_override
            .or(main.zoom)
            .unwrap_or(self.settings.default_zoom);

        Ok(MapPage {
            title: self.title(&main),
            center,
            zoom,
            popup_width: self.settings.popup_width,
            popup_height: self.settings.popup_height,
            fit_bounds: self.settings.fit_bounds,
            markers,
        })
    }

    fn center(&self, main: &MainSection, markers: &[MarkerSpec]) -> Result<Coordinate> {
        if let Some(center) = main.coordinates {
            return Ok(center);
        }
        let coords: Vec<Coordinate> = markers.iter().map(|m| m.location).collect();
        match LatLonBounds::from_coordinates(&coords) {
            Some(bounds) => Ok(bounds.center()),
            None => bail!("Document has no main.coordinates and no markers to center on"),
        }
    }

    fn title(&self, main: &MainSection) -> String {
        if let Some(country) = &main.country {
            return capitalize(&country.to_lowercase());
        }
        self.items
            .path()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Map".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::backfill::tests::FakeGeocoder;
    use super::*;
    use serde_json::json;

    fn iceland() -> serde_json::Value {
        json!({
            "main": {"country": "iceland", "coordinates": [64.9, -18.6]},
            "markers": {
                "landmarks": {
                    "Gullfoss": {"info": "Waterfall", "icon": "waterfall"},
                    "Hallgrimskirkja": {"coordinates": [64.142, -21.927]}
                },
                "hotels": {
                    "Hotel Borg": {"coordinates": [64.147, -21.94], "prijs": 145}
                }
            }
        })
    }

    fn saved(dir: &tempfile::TempDir, value: serde_json::Value) -> MapItems {
        let path = dir.path().join("iceland.json");
        std::fs::write(&path, value.to_string()).unwrap();
        MapItems::from_json(&path).unwrap()
    }

    #[test]
    fn test_default_output() {
        let mut main = MainSection::default();
        assert_eq!(default_output(&main), PathBuf::from("map.html"));
        main.country = Some("iceland".to_string());
        assert_eq!(default_output(&main), PathBuf::from("IcelandMap.html"));
        main.country = Some("UNITED KINGDOM".to_string());
        assert_eq!(default_output(&main), PathBuf::from("United kingdomMap.html"));
    }

    #[test]
    fn test_backfill_then_build() {
        let dir = tempfile::tempdir().unwrap();
        let geocoder = FakeGeocoder::with(&[("Gullfoss", 64.32, -20.12)]);
        let mut maker =
            MapMaker::new(saved(&dir, iceland()), Settings::default()).with_geocoder(Box::new(geocoder));

        let report = maker.backfill(&ProgressBar::hidden()).unwrap();
        assert_eq!(report.resolved, 1);
        assert!(report.saved);

        let page = maker.build_page().unwrap();
        assert_eq!(page.title, "Iceland");
        assert_eq!(page.zoom, DEFAULT_ZOOM);
        assert_eq!(page.markers.len(), 3);

        let gullfoss = page.markers.iter().find(|m| m.name == "Gullfoss").unwrap();
        assert_eq!(gullfoss.icon.glyph, "water");
        assert_eq!(gullfoss.location, Coordinate::new(64.32, -20.12));

        let hotel = page.markers.iter().find(|m| m.name == "Hotel Borg").unwrap();
        assert_eq!(hotel.icon.glyph, "bed");
        assert!(hotel.popup.contains("Prijs: &euro; 145"));
    }

    #[test]
    fn test_build_without_backfill_fails() {
        let maker = MapMaker::new(MapItems::from_value(iceland()), Settings::default());
        let err = maker.build_page().unwrap_err();
        assert!(err.to_string().contains("Gullfoss is missing coordinates"));
    }

    #[test]
    fn test_offline_backfill_is_noop() {
        let mut maker = MapMaker::new(MapItems::from_value(iceland()), Settings::default());
        let report = maker.backfill(&ProgressBar::hidden()).unwrap();
        assert_eq!(report, BackfillReport::default());
    }

    #[test]
    fn test_unknown_icon_fails() {
        let maker = MapMaker::new(
            MapItems::from_value(json!({
                "main": {"coordinates": [51.5, -0.12]},
                "markers": {"castles": {"Tower of London": {"coordinates": [51.508, -0.076]}}}
            })),
            Settings::default(),
        );
        let err = maker.build_page().unwrap_err();
        assert!(format!("{:#}", err).contains("Icon castles not recognized"));
    }

    #[test]
    fn test_zoom_precedence_and_language() {
        let items = MapItems::from_value(json!({
            "main": {"coordinates": [51.5, -0.12], "zoom": 12, "price_unit": "&pound;"},
            "markers": {"food": {"Borough Market": {"coordinates": [51.505, -0.091], "price": "free"}}}
        }));
        let settings = Settings {
            language: Language::En,
            ..Settings::default()
        };
        let page = MapMaker::new(items.clone(), settings.clone()).build_page().unwrap();
        assert_eq!(page.zoom, 12);
        assert!(page.markers[0].popup.contains("Price: free"));

        let forced = Settings {
            zoom_override: Some(9),
            ..settings
        };
        let page = MapMaker::new(items, forced).build_page().unwrap();
        assert_eq!(page.zoom, 9);
    }

    #[test]
    fn test_center_follows_markers() {
        let maker = MapMaker::new(
            MapItems::from_value(json!({
                "markers": {"landmarks": {
                    "A": {"coordinates": [10.0, 20.0]},
                    "B": {"coordinates": [12.0, 24.0]}
                }}
            })),
            Settings::default(),
        );
        let page = maker.build_page().unwrap();
        assert_eq!(page.center, Coordinate::new(11.0, 22.0));
        assert_eq!(page.title, "Map");
    }
}
