use geo::{BoundingRect, MultiPoint, Point};
use serde::Serialize;

use crate::domain::Coordinate;

/// South-west / north-east corners, serialized the way Leaflet's
/// `fitBounds` expects them: `[[south, west], [north, east]]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "[[f64; 2]; 2]")]
pub struct LatLonBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl LatLonBounds {
    /// Bounding box of a set of coordinates, `None` when empty
    pub fn from_coordinates(coords: &[Coordinate]) -> Option<Self> {
        let points: MultiPoint<f64> = coords
            .iter()
            .map(|c| Point::new(c.lon, c.lat))
            .collect::<Vec<_>>()
            .into();
        let rect = points.bounding_rect()?;

        Some(Self {
            south: rect.min().y,
            west: rect.min().x,
            north: rect.max().y,
            east: rect.max().x,
        })
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }
}

impl From<LatLonBounds> for [[f64; 2]; 2] {
    fn from(b: LatLonBounds) -> Self {
        [[b.south, b.west], [b.north, b.east]]
    }
}
