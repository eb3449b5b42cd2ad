use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use std::path::PathBuf;
use std::time::Instant;

use tripmap::api::NominatimGeocoder;
use tripmap::config::{DEFAULT_POPUP_HEIGHT, DEFAULT_POPUP_WIDTH, DEFAULT_ZOOM, FileConfig};
use tripmap::document::MapItems;
use tripmap::i18n::Language;
use tripmap::maker::{MapMaker, Settings, default_output};

/// Render an interactive travel map from a JSON list of places
///
/// Examples:
///   # Look up missing coordinates, then write IcelandMap.html
///   tripmap iceland_map_items.json
///
///   # English popups, custom output file
///   tripmap london_map_items.json -l en -o london.html
///
///   # Render without contacting the geocoder, zoomed to fit all markers
///   tripmap london_map_items.json --offline --fit-bounds
#[derive(Parser, Debug)]
#[command(name = "tripmap")]
#[command(version, about, long_about = None)]
struct Args {
    /// Map document (JSON); missing coordinates are written back to it
    document: PathBuf,

    /// Output HTML file (defaults to {Country}Map.html)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Path to config file (optional, auto-searches tripmap.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Popup label language
    #[arg(short = 'l', long, value_enum)]
    language: Option<Language>,

    /// Initial zoom level (overrides the document and config file)
    #[arg(short = 'z', long, value_parser = clap::value_parser!(u8).range(0..=19))]
    zoom: Option<u8>,

    /// Fit the initial view to all markers
    #[arg(long)]
    fit_bounds: bool,

    /// Do not look up missing coordinates
    #[arg(long)]
    offline: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let (file_config, rejected) = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            let config: FileConfig =
                toml::from_str(&contents).context("Failed to parse config file")?;
            (config, Vec::new())
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        let discovered = FileConfig::load();
        (discovered.config.unwrap_or_default(), discovered.rejected)
    };

    let verbose = args.verbose || file_config.verbose;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "warn" }),
    )
    .init();
    for (path, e) in &rejected {
        warn!("Failed to parse config file {:?}: {}", path, e);
    }

    let settings = Settings {
        language: args
            .language
            .or(file_config.language)
            .unwrap_or_default(),
        zoom_override: args.zoom,
        default_zoom: file_config.zoom.unwrap_or(DEFAULT_ZOOM),
        popup_width: file_config.popup_width.unwrap_or(DEFAULT_POPUP_WIDTH),
        popup_height: file_config.popup_height.unwrap_or(DEFAULT_POPUP_HEIGHT),
        fit_bounds: args.fit_bounds || file_config.fit_bounds,
    };
    let geocoder_config = file_config.geocoder.clone().unwrap_or_default();

    let items = MapItems::from_json(&args.document)
        .with_context(|| format!("Failed to load map document {:?}", args.document))?;
    let main_section = items.main_section()?;
    let output_path = args
        .output
        .clone()
        .or_else(|| file_config.output.clone())
        .unwrap_or_else(|| default_output(&main_section));

    if verbose {
        println!("Configuration:");
        println!("  Document: {}", args.document.display());
        if let Some(ref country) = main_section.country {
            println!("  Country: {}", country);
        }
        println!("  Language: {:?}", settings.language);
        println!("  Geocoder: {}", geocoder_config.url);
        println!("  Output: {}", output_path.display());
        println!();
    }

    let mut maker = MapMaker::new(items, settings);
    if !args.offline {
        let geocoder =
            NominatimGeocoder::new(&geocoder_config).context("Failed to set up geocoder")?;
        maker = maker.with_geocoder(Box::new(geocoder));
    }

    let progress = create_progress_bar("Checking coordinates...");
    let start = Instant::now();
    let report = maker.backfill(&progress)?;
    progress.finish_with_message(format!(
        "Looked up {} locations, {} resolved [{:.1}s]",
        report.attempted(),
        report.resolved,
        start.elapsed().as_secs_f32()
    ));
    for missing in &report.unresolved {
        eprintln!("Warning: {} not found!", missing);
    }
    if report.saved && let Some(path) = maker.items().path() {
        println!("Saved coordinates to {}", path.display());
    }

    let spinner = create_spinner("Rendering map...");
    let start = Instant::now();
    let page = maker.build_page().context("Failed to build map")?;
    page.save(&output_path).context("Failed to write map")?;
    spinner.finish_with_message(format!(
        "Placed {} markers [{:.1}s]",
        page.markers.len(),
        start.elapsed().as_secs_f32()
    ));

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!("Output: {}", output_path.display());

    Ok(())
}

fn create_progress_bar(message: &str) -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{pos}/{len}] {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
