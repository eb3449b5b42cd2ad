use anyhow::{Context, Result, bail};
use indicatif::ProgressBar;
use log::{info, warn};

use crate::api::Geocoder;
use crate::document::{KeyPath, MAIN_KEY, MARKERS_KEY, MapItems};
use crate::domain::Coordinate;
use crate::domain::coordinate::needs_lookup;

const COORDINATES_KEY: &str = "coordinates";

/// Outcome of one backfill pass
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BackfillReport {
    pub resolved: usize,
    /// `category > location` of every lookup that came back empty or failed
    pub unresolved: Vec<String>,
    pub saved: bool,
}

impl BackfillReport {
    pub fn attempted(&self) -> usize {
        self.resolved + self.unresolved.len()
    }
}

/// Query the geocoder, folding lookup errors into "not found"
fn lookup(geocoder: &dyn Geocoder, location: &str, context: Option<&str>) -> Option<Coordinate> {
    match geocoder.geocode(location, context) {
        Ok(found) => found,
        Err(e) => {
            warn!("Lookup for {} failed: {:#}", location, e);
            None
        }
    }
}

/// Locations in `categories` whose coordinates are absent or incomplete
fn pending(items: &MapItems, categories: &[String]) -> Result<Vec<(String, String)>> {
    let mut pending = Vec::new();
    for category in categories {
        if !items.contains([MARKERS_KEY, category.as_str()]) {
            bail!("Key {} not in {}!", category, MARKERS_KEY);
        }
        for location in items.locations(category)? {
            let entry = items.get([MARKERS_KEY, category.as_str(), location.as_str()])?;
            if needs_lookup(entry.get(COORDINATES_KEY)) {
                pending.push((category.clone(), location));
            }
        }
    }
    Ok(pending)
}

/// Fill in missing coordinates for every location in `categories`.
///
/// The country from the `main` section, when present, narrows each query.
/// Failed lookups are stored as `[null, null]`. The document is saved back to
/// its file when anything was written.
pub fn add_coordinates(
    items: &mut MapItems,
    categories: &[String],
    geocoder: &dyn Geocoder,
    progress: &ProgressBar,
) -> Result<BackfillReport> {
    let country = items.main_section()?.country;
    let pending = pending(items, categories)?;
    let mut report = BackfillReport::default();

    if pending.is_empty() {
        return Ok(report);
    }

    progress.set_length(pending.len() as u64);
    for (category, location) in pending {
        progress.set_message(format!("Geocoding {}", location));

        let value = match lookup(geocoder, &location, country.as_deref()) {
            Some(coordinate) => {
                report.resolved += 1;
                coordinate.to_value()
            }
            None => {
                report.unresolved.push(format!("{} > {}", category, location));
                Coordinate::unresolved()
            }
        };

        let path = KeyPath::from([
            MARKERS_KEY,
            category.as_str(),
            location.as_str(),
            COORDINATES_KEY,
        ]);
        items.set(path, value)?;
        progress.inc(1);
    }

    items
        .to_json(None)
        .context("Failed to save document with added coordinates")?;
    report.saved = true;
    info!(
        "Added coordinates for {} of {} locations",
        report.resolved,
        report.attempted()
    );

    Ok(report)
}

/// Geocode the region center from `main.country` when it has no coordinates.
///
/// Returns whether the document was changed (and saved).
pub fn backfill_center(items: &mut MapItems, geocoder: &dyn Geocoder) -> Result<bool> {
    let main = items.main_section()?;
    if main.coordinates.is_some() {
        return Ok(false);
    }
    let Some(country) = main.country else {
        return Ok(false);
    };

    let Some(center) = lookup(geocoder, &country, None) else {
        warn!("Could not locate {}; center will follow the markers", country);
        return Ok(false);
    };

    items.set([MAIN_KEY, COORDINATES_KEY], center.to_value())?;
    items
        .to_json(None)
        .context("Failed to save document with added center")?;
    Ok(true)
}
