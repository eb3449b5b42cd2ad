use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{Coordinate, MarkerIcon};
use crate::geometry::LatLonBounds;
use crate::render::popup::escape_html;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to serialize map data")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write map to {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One marker as handed to the page script
#[derive(Debug, Clone, Serialize)]
pub struct MarkerSpec {
    pub name: String,
    pub category: String,
    pub location: Coordinate,
    pub icon: MarkerIcon,
    pub popup: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct PopupSize {
    width: u32,
    height: u32,
}

#[derive(Debug, Serialize)]
struct PageData<'a> {
    center: Coordinate,
    zoom: u8,
    popup: PopupSize,
    bounds: Option<LatLonBounds>,
    markers: &'a [MarkerSpec],
}

/// A standalone Leaflet map with awesome-markers pins and iframe popups
#[derive(Debug, Clone)]
pub struct MapPage {
    pub title: String,
    pub center: Coordinate,
    pub zoom: u8,
    pub popup_width: u32,
    pub popup_height: u32,
    pub fit_bounds: bool,
    pub markers: Vec<MarkerSpec>,
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>"#;

const PAGE_BODY: &str = r#"</title>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.css" />
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.css" />
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css" />
  <script src="https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.js"></script>
  <script src="https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.js"></script>
  <style>
    html, body { width: 100%; height: 100%; margin: 0; padding: 0; }
    #map { position: absolute; top: 0; bottom: 0; left: 0; right: 0; }
  </style>
</head>
<body>
  <div id="map"></div>
  <script>
    var data = "#;

const PAGE_SCRIPT: &str = r#";
    var map = L.map("map", { center: data.center, zoom: data.zoom });
    L.tileLayer("https://tile.openstreetmap.org/{z}/{x}/{y}.png", {
      maxZoom: 19,
      attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
    }).addTo(map);
    L.control.scale().addTo(map);

    data.markers.forEach(function (m) {
      var icon = L.AwesomeMarkers.icon({
        icon: m.icon.glyph,
        prefix: m.icon.prefix,
        markerColor: m.icon.color,
        iconColor: "white"
      });
      var frame = document.createElement("iframe");
      frame.srcdoc = m.popup;
      frame.width = data.popup.width;
      frame.height = data.popup.height;
      frame.style.border = "none";
      L.marker(m.location, { icon: icon, title: m.name })
        .bindPopup(frame, { maxWidth: data.popup.width + 20 })
        .addTo(map);
    });

    if (data.bounds) {
      map.fitBounds(data.bounds);
    }
  </script>
</body>
</html>
"#;

impl MapPage {
    pub fn bounds(&self) -> Option<LatLonBounds> {
        let coords: Vec<Coordinate> = self.markers.iter().map(|m| m.location).collect();
        LatLonBounds::from_coordinates(&coords)
    }

    /// Render the full HTML document
    pub fn render(&self) -> Result<String, RenderError> {
        let data = PageData {
            center: self.center,
            zoom: self.zoom,
            popup: PopupSize {
                width: self.popup_width,
                height: self.popup_height,
            },
            bounds: if self.fit_bounds { self.bounds() } else { None },
            markers: &self.markers,
        };
        // popups carry raw HTML; keep "</script>" inside them from closing the tag
        let json = serde_json::to_string(&data)?.replace("</", "<\\/");

        let title = escape_html(&self.title);
        Ok([PAGE_HEAD, title.as_str(), PAGE_BODY, json.as_str(), PAGE_SCRIPT].concat())
    }

    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        let html = self.render()?;
        fs::write(path, html).map_err(|source| RenderError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
