#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The school connectivity monitor controller.
//!
//! Owns the in-memory [`collection::SchoolCollection`] and filter state,
//! runs the load pipeline (read → normalize → validate → atomic replace),
//! and pushes projections into injected status and render sinks. The
//! controller never touches the map library or any UI element directly,
//! so it can be driven headless from the CLI or from tests.

pub mod collection;

use std::fmt;
use std::path::Path;

use school_map_school_models::{Connectivity, ConnectivityCounts};
use school_map_source::parsing::CoordinatePolicy;
use school_map_source::profile::DatasetProfile;
use school_map_source::readers::read_rows;
use school_map_source_models::School;
use school_map_view::{MarkerView, school_marker};
use serde_json::Value;

use crate::collection::SchoolCollection;

/// Built-in demonstration rows, shown until a file is loaded.
const SAMPLE_ROWS_JSON: &str = include_str!("../data/sample_schools.json");

/// Human-readable dataset load state for the status surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// No file loaded yet; the embedded sample dataset is shown.
    SampleData,
    /// A dataset was loaded successfully.
    Loaded {
        /// Number of valid schools in the working set.
        count: u64,
    },
    /// A non-empty upload produced zero valid records.
    NoValidRecords,
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SampleData => write!(f, "No file loaded yet - showing sample data"),
            Self::Loaded { count } => write!(f, "{count} schools loaded"),
            Self::NoValidRecords => write!(f, "No valid school records found in the uploaded data"),
        }
    }
}

/// Per-load accounting surfaced alongside the status string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows consumed from the source file.
    pub rows_seen: u64,
    /// Schools accepted into the working set.
    pub loaded: u64,
    /// Rows dropped as structurally malformed.
    pub malformed: u64,
    /// Rows dropped by the coordinate validator.
    pub invalid_coords: u64,
}

/// Status/statistics surface exposed to the UI layer.
pub trait StatusSink {
    /// Shows the load-status string.
    fn show_status(&mut self, status: &LoadStatus);
    /// Shows the summary counts for the effective set.
    fn show_summary(&mut self, counts: &ConnectivityCounts);
    /// Surfaces a user-facing error (file-format problems and the like).
    fn alert(&mut self, message: &str);
}

/// Rendering collaborator surface: receives the full projected marker set
/// on every display refresh.
pub trait RenderSink {
    /// Replaces all visible markers.
    fn replace_markers(&mut self, markers: &[MarkerView]);
}

/// The controller: one instance owns the working set and filter state and
/// mediates every load and filter trigger.
pub struct Monitor<S: StatusSink, R: RenderSink> {
    profile: DatasetProfile,
    policy: CoordinatePolicy,
    collection: SchoolCollection,
    status_sink: S,
    render_sink: R,
    load_status: LoadStatus,
    generation: u64,
}

impl<S: StatusSink, R: RenderSink> Monitor<S, R> {
    /// Creates a controller and populates it with the embedded sample
    /// dataset, mirroring the initial page state.
    ///
    /// # Panics
    ///
    /// Panics if the embedded sample data is malformed (guaranteed
    /// well-formed at compile time).
    #[must_use]
    pub fn new(profile: DatasetProfile, policy: CoordinatePolicy, status_sink: S, render_sink: R) -> Self {
        let mut monitor = Self {
            profile,
            policy,
            collection: SchoolCollection::new(),
            status_sink,
            render_sink,
            load_status: LoadStatus::SampleData,
            generation: 0,
        };

        let sample: Vec<Value> = serde_json::from_str(SAMPLE_ROWS_JSON)
            .unwrap_or_else(|e| panic!("Failed to parse embedded sample data: {e}"));
        let outcome = monitor.profile.normalize_rows(&sample, monitor.policy);
        monitor.collection.replace_all(outcome.schools);
        monitor.load_status = LoadStatus::SampleData;
        monitor.refresh();

        monitor
    }

    /// Starts a new load and returns its generation token.
    ///
    /// Loads may be parsed off-thread; only the outcome carrying the most
    /// recent token is applied (see [`Self::apply_rows`]).
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Applies a parsed batch if `generation` is still current, returning
    /// `None` for a stale (superseded) load.
    pub fn apply_rows(&mut self, generation: u64, rows: &[Value]) -> Option<LoadReport> {
        if generation != self.generation {
            log::warn!(
                "discarding stale load (generation {generation}, current {})",
                self.generation
            );
            return None;
        }
        Some(self.load_rows(rows))
    }

    /// Normalizes a batch of raw rows and atomically replaces the working
    /// set. Filter state resets with the dataset.
    pub fn load_rows(&mut self, rows: &[Value]) -> LoadReport {
        let outcome = self.profile.normalize_rows(rows, self.policy);
        let report = LoadReport {
            rows_seen: rows.len() as u64,
            loaded: outcome.schools.len() as u64,
            malformed: outcome.malformed,
            invalid_coords: outcome.invalid_coords,
        };

        self.load_status = if outcome.schools.is_empty() && !rows.is_empty() {
            LoadStatus::NoValidRecords
        } else {
            LoadStatus::Loaded {
                count: report.loaded,
            }
        };
        self.collection.replace_all(outcome.schools);
        self.refresh();

        report
    }

    /// Top-level load entry point for a spreadsheet file.
    ///
    /// Never propagates an error: file-format and I/O failures surface as
    /// a sink alert and leave the working set untouched.
    pub fn load_file(&mut self, path: &Path) -> Option<LoadReport> {
        let generation = self.begin_load();
        match read_rows(path) {
            Ok(rows) => self.apply_rows(generation, &rows),
            Err(err) => {
                log::error!("failed to read {}: {err}", path.display());
                self.status_sink
                    .alert(&format!("Could not load {}: {err}", path.display()));
                None
            }
        }
    }

    /// Applies a filter selection and refreshes the display.
    pub fn apply_filter(&mut self, region: Option<String>, connectivity: Option<Connectivity>) {
        self.collection.apply_filter(region, connectivity);
        self.refresh();
    }

    /// Recomputes projections for the effective set and pushes them to
    /// both sinks. Called after every load and filter change.
    fn refresh(&mut self) {
        let markers: Vec<MarkerView> = self
            .collection
            .effective_set()
            .iter()
            .map(school_marker)
            .collect();
        self.render_sink.replace_markers(&markers);

        let counts = school_map_analytics::summary_counts(self.collection.effective_set());
        self.status_sink.show_summary(&counts);
        self.status_sink.show_status(&self.load_status);
    }

    /// Summary counts over the currently effective set.
    #[must_use]
    pub fn summary(&self) -> ConnectivityCounts {
        school_map_analytics::summary_counts(self.collection.effective_set())
    }

    /// Region selector options, drawn from the full set.
    #[must_use]
    pub fn region_options(&self) -> Vec<String> {
        school_map_analytics::region_options(self.collection.full_set())
    }

    /// Marker projections for the currently effective set.
    #[must_use]
    pub fn markers(&self) -> Vec<MarkerView> {
        self.collection
            .effective_set()
            .iter()
            .map(school_marker)
            .collect()
    }

    /// The currently effective (displayed) school set.
    #[must_use]
    pub fn effective_schools(&self) -> &[School] {
        self.collection.effective_set()
    }

    /// The full working set, ignoring filters.
    #[must_use]
    pub fn full_schools(&self) -> &[School] {
        self.collection.full_set()
    }

    /// Whether the active filter matched zero schools and the display fell
    /// back to the full set.
    #[must_use]
    pub fn filter_fallback_active(&self) -> bool {
        self.collection.filter_fallback_active()
    }

    /// The current load status.
    #[must_use]
    pub const fn load_status(&self) -> LoadStatus {
        self.load_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use school_map_source::registry;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingStatus {
        statuses: Vec<LoadStatus>,
        summaries: Vec<ConnectivityCounts>,
        alerts: Vec<String>,
    }

    impl StatusSink for RecordingStatus {
        fn show_status(&mut self, status: &LoadStatus) {
            self.statuses.push(*status);
        }

        fn show_summary(&mut self, counts: &ConnectivityCounts) {
            self.summaries.push(*counts);
        }

        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }
    }

    #[derive(Default)]
    struct RecordingRender {
        marker_batches: Vec<Vec<MarkerView>>,
    }

    impl RenderSink for RecordingRender {
        fn replace_markers(&mut self, markers: &[MarkerView]) {
            self.marker_batches.push(markers.to_vec());
        }
    }

    fn monitor() -> Monitor<RecordingStatus, RecordingRender> {
        Monitor::new(
            registry::default_profile(),
            CoordinatePolicy::ZeroAndNan,
            RecordingStatus::default(),
            RecordingRender::default(),
        )
    }

    #[test]
    fn starts_with_sample_data() {
        let monitor = monitor();
        assert_eq!(monitor.load_status(), LoadStatus::SampleData);
        assert_eq!(monitor.full_schools().len(), 3);
        assert_eq!(
            monitor.load_status().to_string(),
            "No file loaded yet - showing sample data"
        );
        assert_eq!(monitor.status_sink.statuses.len(), 1);
        assert_eq!(monitor.render_sink.marker_batches.len(), 1);
        assert_eq!(monitor.render_sink.marker_batches[0].len(), 3);
    }

    #[test]
    fn load_replaces_dataset_wholesale() {
        let mut monitor = monitor();
        let report = monitor.load_rows(&[
            json!({"School Name": "A", "Latitude": 14.6, "Longitude": 120.9, "Connectivity Status": "Online"}),
            json!({"School Name": "B", "Latitude": 0, "Longitude": 0, "Connectivity Status": "offline"}),
        ]);

        assert_eq!(report.loaded, 1);
        assert_eq!(report.invalid_coords, 1);
        assert_eq!(report.malformed, 0);
        assert_eq!(monitor.full_schools().len(), 1);
        assert_eq!(monitor.full_schools()[0].name, "A");
        assert_eq!(monitor.load_status(), LoadStatus::Loaded { count: 1 });
    }

    #[test]
    fn load_resets_active_filter() {
        let mut monitor = monitor();
        monitor.apply_filter(Some("NCR".to_string()), None);
        assert_eq!(monitor.effective_schools().len(), 1);

        monitor.load_rows(&[
            json!({"School Name": "A", "Latitude": 14.6, "Longitude": 120.9}),
            json!({"School Name": "B", "Latitude": 10.3, "Longitude": 123.9}),
        ]);
        assert_eq!(monitor.effective_schools().len(), 2);
        assert!(!monitor.filter_fallback_active());
    }

    #[test]
    fn zero_match_filter_shows_everything() {
        let mut monitor = monitor();
        monitor.apply_filter(Some("Region 404".to_string()), Some(Connectivity::Online));

        assert!(monitor.filter_fallback_active());
        assert_eq!(monitor.effective_schools().len(), monitor.full_schools().len());
        assert_eq!(monitor.summary().total, 3);
    }

    #[test]
    fn empty_result_from_non_empty_input_is_an_explicit_state() {
        let mut monitor = monitor();
        monitor.load_rows(&[json!({"School Name": "B", "Latitude": 0, "Longitude": 0})]);

        assert_eq!(monitor.load_status(), LoadStatus::NoValidRecords);
        assert!(monitor.full_schools().is_empty());
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut monitor = monitor();
        let stale = monitor.begin_load();
        let current = monitor.begin_load();

        let rows = vec![json!({"School Name": "Old", "Latitude": 14.6, "Longitude": 120.9})];
        assert!(monitor.apply_rows(stale, &rows).is_none());
        assert_eq!(monitor.full_schools().len(), 3);

        let rows = vec![json!({"School Name": "New", "Latitude": 14.6, "Longitude": 120.9})];
        assert!(monitor.apply_rows(current, &rows).is_some());
        assert_eq!(monitor.full_schools()[0].name, "New");
    }

    #[test]
    fn unsupported_extension_alerts_without_state_change() {
        let mut monitor = monitor();
        let before = monitor.full_schools().len();

        let report = monitor.load_file(Path::new("schools.pdf"));

        assert!(report.is_none());
        assert_eq!(monitor.status_sink.alerts.len(), 1);
        assert!(monitor.status_sink.alerts[0].contains("schools.pdf"));
        assert_eq!(monitor.full_schools().len(), before);
        assert_eq!(monitor.load_status(), LoadStatus::SampleData);
    }

    #[test]
    fn filter_refresh_pushes_filtered_markers() {
        let mut monitor = monitor();
        monitor.apply_filter(None, Some(Connectivity::Limited));

        let last = monitor.render_sink.marker_batches.last().unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].name, "Cebu Central School");

        let summary = monitor.status_sink.summaries.last().unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.limited, 1);
    }

    #[test]
    fn region_options_come_from_full_set() {
        let mut monitor = monitor();
        monitor.apply_filter(Some("NCR".to_string()), None);
        assert_eq!(
            monitor.region_options(),
            vec!["NCR", "Region VII", "Region XI"]
        );
    }
}
