use serde::Deserialize;
use std::path::PathBuf;

use crate::i18n::Language;

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const USER_AGENT: &str = "tripmap/0.1.0";

pub const DEFAULT_ZOOM: u8 = 7;
pub const DEFAULT_POPUP_WIDTH: u32 = 200;
pub const DEFAULT_POPUP_HEIGHT: u32 = 200;

fn default_url() -> String {
    NOMINATIM_URL.to_string()
}
fn default_user_agent() -> String {
    USER_AGENT.to_string()
}
fn default_geocoder_language() -> String {
    "nl".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_delay_ms() -> u64 {
    1000
}

/// Settings for the Nominatim lookup
#[derive(Debug, Deserialize, Clone)]
pub struct GeocoderConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Sent as `accept-language`; affects the names the service matches on
    #[serde(default = "default_geocoder_language")]
    pub language: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Minimum spacing between two requests
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            user_agent: default_user_agent(),
            language: default_geocoder_language(),
            timeout_secs: default_timeout_secs(),
            delay_ms: default_delay_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub zoom: Option<u8>,
    #[serde(default)]
    pub popup_width: Option<u32>,
    #[serde(default)]
    pub popup_height: Option<u32>,
    #[serde(default)]
    pub fit_bounds: bool,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub geocoder: Option<GeocoderConfig>,
}

/// Result of searching the default config locations
#[derive(Debug, Default)]
pub struct Discovered {
    pub config: Option<FileConfig>,
    /// Files that exist but failed to parse, in search order
    pub rejected: Vec<(PathBuf, toml::de::Error)>,
}

impl FileConfig {
    pub fn load() -> Discovered {
        Self::load_from(&get_config_paths())
    }

    /// Use the first of `paths` that parses. Files that fail to parse are
    /// reported back since logging may not be set up yet.
    pub fn load_from(paths: &[PathBuf]) -> Discovered {
        let mut discovered = Discovered::default();

        for path in paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => {
                        discovered.config = Some(config);
                        break;
                    }
                    Err(e) => discovered.rejected.push((path.clone(), e)),
                }
            }
        }
        discovered
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("tripmap.toml"));
    paths.push(PathBuf::from(".tripmap.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("tripmap").join("config.toml"));
        paths.push(config_dir.join("tripmap.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".tripmap.toml"));
    }

    paths
}
