use anyhow::{Context, Result, bail};
use log::{debug, info};
use serde::Deserialize;
use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::GeocoderConfig;
use crate::domain::Coordinate;

#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// Resolves a location name to coordinates, one location at a time.
pub trait Geocoder {
    /// Look up `location`, optionally narrowed by `context` (usually a country).
    ///
    /// Returns `Ok(None)` when the service has no match.
    fn geocode(&self, location: &str, context: Option<&str>) -> Result<Option<Coordinate>>;
}

/// Build the free-text query sent to the service
pub fn build_query(location: &str, context: Option<&str>) -> String {
    match context {
        Some(ctx) if !ctx.trim().is_empty() => format!("{} {}", location, ctx),
        _ => location.to_string(),
    }
}

/// Geocoder backed by the Nominatim search API.
///
/// Requests are spaced at least `delay` apart (Nominatim ToS: max 1 request
/// per second).
pub struct NominatimGeocoder {
    client: reqwest::blocking::Client,
    url: String,
    language: String,
    delay: Duration,
    last_request: Cell<Option<Instant>>,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: config.url.clone(),
            language: config.language.clone(),
            delay: Duration::from_millis(config.delay_ms),
            last_request: Cell::new(None),
        })
    }

    fn wait_for_rate_limit(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                thread::sleep(self.delay - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, location: &str, context: Option<&str>) -> Result<Option<Coordinate>> {
        let query = build_query(location, context);
        self.wait_for_rate_limit();
        info!("Getting location for {}...", query);

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("q", query.as_str()),
                ("format", "json"),
                ("limit", "1"),
                ("accept-language", self.language.as_str()),
            ])
            .send()
            .context("Failed to send request to Nominatim API")?;

        if !response.status().is_success() {
            bail!("Nominatim API returned error status: {}", response.status());
        }

        let results: Vec<NominatimResult> = response
            .json()
            .context("Failed to parse Nominatim JSON response")?;

        let matched = results.first().map(|r| r.display_name.clone());
        let coordinate = parse_first(results)?;
        match (coordinate, matched) {
            (Some(c), Some(name)) => debug!("Resolved {} -> {} ({})", query, c, name),
            _ => info!("{} not found!", location),
        }
        Ok(coordinate)
    }
}

fn parse_first(results: Vec<NominatimResult>) -> Result<Option<Coordinate>> {
    let Some(result) = results.into_iter().next() else {
        return Ok(None);
    };

    let lat: f64 = result
        .lat
        .parse()
        .context("Failed to parse latitude from Nominatim response")?;
    let lon: f64 = result
        .lon
        .parse()
        .context("Failed to parse longitude from Nominatim response")?;

    Ok(Some(Coordinate::new(lat, lon)))
}
