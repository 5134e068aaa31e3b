#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the school connectivity monitor.
//!
//! Stands in for the UI layer: loads spreadsheet files, applies filters,
//! and prints the status, statistics, and marker projections that a map
//! frontend would bind to its widgets.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use school_map_monitor::{LoadReport, LoadStatus, Monitor, RenderSink, StatusSink};
use school_map_school_models::{Connectivity, ConnectivityCounts};
use school_map_source::parsing::CoordinatePolicy;
use school_map_source::profile::DatasetProfile;
use school_map_source::readers::read_rows;
use school_map_source::registry;
use school_map_view::MarkerView;

#[derive(Parser)]
#[command(name = "school_map_monitor", about = "School connectivity map data tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all embedded dataset profiles
    Profiles,
    /// Load a spreadsheet and report status, drop accounting, and summary
    Load {
        /// CSV or Excel file to load
        file: PathBuf,
        /// Dataset profile ID (defaults to `deped_status`)
        #[arg(long)]
        profile: Option<String>,
        /// Reject coordinates outside the Philippine archipelago envelope
        #[arg(long)]
        strict_bounds: bool,
    },
    /// Summary statistics under an optional region/connectivity filter
    Stats {
        /// CSV or Excel file to load
        file: PathBuf,
        /// Dataset profile ID (defaults to `deped_status`)
        #[arg(long)]
        profile: Option<String>,
        /// Reject coordinates outside the Philippine archipelago envelope
        #[arg(long)]
        strict_bounds: bool,
        /// Region to filter by (one of the values listed on load)
        #[arg(long)]
        region: Option<String>,
        /// Connectivity class to filter by: online, limited, offline, or unknown
        #[arg(long)]
        connectivity: Option<String>,
    },
    /// Bucket schools into a fixed-size density grid
    Grid {
        /// CSV or Excel file to load
        file: PathBuf,
        /// Dataset profile ID (defaults to `deped_status`)
        #[arg(long)]
        profile: Option<String>,
        /// Reject coordinates outside the Philippine archipelago envelope
        #[arg(long)]
        strict_bounds: bool,
        /// Grid cell size in degrees
        #[arg(long, default_value = "0.1")]
        cell_size: f64,
    },
    /// Print marker descriptors for the rendering collaborator as JSON
    Markers {
        /// CSV or Excel file to load
        file: PathBuf,
        /// Dataset profile ID (defaults to `deped_status`)
        #[arg(long)]
        profile: Option<String>,
        /// Reject coordinates outside the Philippine archipelago envelope
        #[arg(long)]
        strict_bounds: bool,
    },
}

/// Status sink that logs status lines and prints alerts to stderr, so the
/// JSON-emitting commands keep stdout clean.
struct ConsoleStatus;

impl StatusSink for ConsoleStatus {
    fn show_status(&mut self, status: &LoadStatus) {
        log::info!("status: {status}");
    }

    fn show_summary(&mut self, counts: &ConnectivityCounts) {
        log::debug!(
            "summary: {} total / {} online / {} limited / {} offline",
            counts.total,
            counts.online,
            counts.limited,
            counts.offline
        );
    }

    fn alert(&mut self, message: &str) {
        eprintln!("ERROR: {message}");
    }
}

/// The CLI has no map; marker pushes are dropped and pulled on demand via
/// [`Monitor::markers`] instead.
struct NullRender;

impl RenderSink for NullRender {
    fn replace_markers(&mut self, _markers: &[MarkerView]) {}
}

fn resolve_profile(id: Option<&str>) -> Result<DatasetProfile, String> {
    id.map_or_else(
        || Ok(registry::default_profile()),
        |id| registry::find_profile(id).ok_or_else(|| format!("Unknown profile: {id}")),
    )
}

fn parse_connectivity(raw: &str) -> Result<Connectivity, String> {
    Connectivity::all()
        .iter()
        .find(|class| class.label().eq_ignore_ascii_case(raw.trim()))
        .copied()
        .ok_or_else(|| {
            format!("Unknown connectivity {raw:?}: expected online, limited, offline, or unknown")
        })
}

const fn coordinate_policy(strict_bounds: bool) -> CoordinatePolicy {
    if strict_bounds {
        CoordinatePolicy::PhilippineEnvelope
    } else {
        CoordinatePolicy::ZeroAndNan
    }
}

fn build_monitor(
    profile: Option<&str>,
    strict_bounds: bool,
) -> Result<Monitor<ConsoleStatus, NullRender>, String> {
    Ok(Monitor::new(
        resolve_profile(profile)?,
        coordinate_policy(strict_bounds),
        ConsoleStatus,
        NullRender,
    ))
}

/// Parses the file off the interaction thread and applies the result
/// atomically; a stale generation (superseded load) is discarded.
async fn load_into(
    monitor: &mut Monitor<ConsoleStatus, NullRender>,
    file: PathBuf,
) -> Result<Option<LoadReport>, Box<dyn std::error::Error>> {
    let generation = monitor.begin_load();
    let display_path = file.display().to_string();

    let rows = tokio::task::spawn_blocking(move || read_rows(&file)).await?;
    match rows {
        Ok(rows) => Ok(monitor.apply_rows(generation, &rows)),
        Err(err) => {
            eprintln!("ERROR: Could not load {display_path}: {err}");
            Ok(None)
        }
    }
}

fn print_summary(counts: &ConnectivityCounts) {
    println!("Total:   {}", counts.total);
    println!("Online:  {}", counts.online);
    println!("Limited: {}", counts.limited);
    println!("Offline: {}", counts.offline);
    println!("Unknown: {}", counts.unknown);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Profiles => {
            println!("{:<18} {:<16} NAME", "ID", "SCHEME");
            println!("{}", "-".repeat(60));
            for profile in registry::all_profiles() {
                println!(
                    "{:<18} {:<16} {}",
                    profile.id(),
                    profile.scheme().to_string(),
                    profile.name()
                );
            }
        }
        Commands::Load {
            file,
            profile,
            strict_bounds,
        } => {
            let mut monitor = build_monitor(profile.as_deref(), strict_bounds)?;
            let Some(report) = load_into(&mut monitor, file).await? else {
                return Ok(());
            };

            println!("{}", monitor.load_status());
            println!(
                "Rows: {} read, {} loaded, {} malformed, {} coordinate-rejected",
                report.rows_seen, report.loaded, report.malformed, report.invalid_coords
            );
            print_summary(&monitor.summary());

            let regions = monitor.region_options();
            if !regions.is_empty() {
                println!("Regions: {}", regions.join(", "));
            }
            if let Some(extent) = school_map_analytics::bounds(monitor.full_schools()) {
                println!(
                    "Bounds: ({:.4}, {:.4}) to ({:.4}, {:.4})",
                    extent.min_latitude,
                    extent.min_longitude,
                    extent.max_latitude,
                    extent.max_longitude
                );
            }
        }
        Commands::Stats {
            file,
            profile,
            strict_bounds,
            region,
            connectivity,
        } => {
            let connectivity = connectivity
                .as_deref()
                .map(parse_connectivity)
                .transpose()?;

            let mut monitor = build_monitor(profile.as_deref(), strict_bounds)?;
            if load_into(&mut monitor, file).await?.is_none() {
                return Ok(());
            }

            monitor.apply_filter(region, connectivity);
            if monitor.filter_fallback_active() {
                println!("Filter matched no schools; showing the full set.");
            }
            print_summary(&monitor.summary());
        }
        Commands::Grid {
            file,
            profile,
            strict_bounds,
            cell_size,
        } => {
            let mut monitor = build_monitor(profile.as_deref(), strict_bounds)?;
            if load_into(&mut monitor, file).await?.is_none() {
                return Ok(());
            }

            let cells = school_map_analytics::density_grid(monitor.effective_schools(), cell_size);
            println!(
                "{:>10} {:>10} {:>6} {:>7} {:>8} {:>8} DOMINANT",
                "LAT", "LNG", "TOTAL", "ONLINE", "LIMITED", "OFFLINE"
            );
            for cell in &cells {
                println!(
                    "{:>10.4} {:>10.4} {:>6} {:>7} {:>8} {:>8} {}",
                    cell.latitude,
                    cell.longitude,
                    cell.counts.total,
                    cell.counts.online,
                    cell.counts.limited,
                    cell.counts.offline,
                    cell.dominant
                );
            }
            println!("{} cells", cells.len());
        }
        Commands::Markers {
            file,
            profile,
            strict_bounds,
        } => {
            let mut monitor = build_monitor(profile.as_deref(), strict_bounds)?;
            if load_into(&mut monitor, file).await?.is_none() {
                return Ok(());
            }

            let markers = monitor.markers();
            println!("{}", serde_json::to_string_pretty(&markers)?);
        }
    }

    Ok(())
}
