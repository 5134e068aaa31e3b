#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Grouped statistics over normalized school sets.
//!
//! Every function here is a pure transformation of a school slice: the
//! controller hands in the currently effective subset (or a cluster's
//! member list from the rendering collaborator) and renders the result.
//! Nothing is cached; aggregates are recomputed on each display refresh.

use std::collections::{BTreeMap, BTreeSet};

use school_map_school_models::{Connectivity, ConnectivityCounts};
use school_map_source_models::School;
use serde::Serialize;

/// Distinct region values across the given set, lexicographically sorted.
/// Used to populate the region filter selector.
#[must_use]
pub fn region_options(schools: &[School]) -> Vec<String> {
    let regions: BTreeSet<&str> = schools.iter().map(|s| s.region.as_str()).collect();
    regions.into_iter().map(ToString::to_string).collect()
}

/// Per-class counts over the given set.
#[must_use]
pub fn summary_counts(schools: &[School]) -> ConnectivityCounts {
    let mut counts = ConnectivityCounts::new();
    for school in schools {
        counts.record(school.connectivity);
    }
    counts
}

/// Connectivity breakdown of one rendering cluster.
///
/// Percentages are computed against the group size, not the global set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterBreakdown {
    /// Per-class member counts.
    pub counts: ConnectivityCounts,
    /// Online share of the group, `0.0..=100.0`.
    pub online_percent: f64,
    /// Limited share of the group.
    pub limited_percent: f64,
    /// Offline share of the group.
    pub offline_percent: f64,
}

/// Computes the breakdown for an arbitrary group of schools, as supplied
/// by the external spatial-clustering collaborator.
#[must_use]
pub fn cluster_breakdown(schools: &[School]) -> ClusterBreakdown {
    let counts = summary_counts(schools);
    ClusterBreakdown {
        counts,
        online_percent: counts.percent(Connectivity::Online),
        limited_percent: counts.percent(Connectivity::Limited),
        offline_percent: counts.percent(Connectivity::Offline),
    }
}

/// One cell of the fixed-size density grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityCell {
    /// Latitude of the cell center.
    pub latitude: f64,
    /// Longitude of the cell center.
    pub longitude: f64,
    /// Per-class counts in this cell.
    pub counts: ConnectivityCounts,
    /// Plurality class among online/limited/offline. Ties keep the earlier
    /// candidate in the evaluation order offline, online, limited.
    pub dominant: Connectivity,
}

/// Buckets schools into fixed-size lat/lon cells.
///
/// The cell key is `(floor(lon / size), floor(lat / size))`, so every
/// school lands in exactly one cell and cell totals sum to the input size.
/// Cells come back in deterministic key order.
#[must_use]
pub fn density_grid(schools: &[School], cell_size_degrees: f64) -> Vec<DensityCell> {
    let mut cells: BTreeMap<(i64, i64), ConnectivityCounts> = BTreeMap::new();

    for school in schools {
        #[allow(clippy::cast_possible_truncation)]
        let key = (
            (school.longitude / cell_size_degrees).floor() as i64,
            (school.latitude / cell_size_degrees).floor() as i64,
        );
        cells.entry(key).or_default().record(school.connectivity);
    }

    cells
        .into_iter()
        .map(|((cell_x, cell_y), counts)| {
            #[allow(clippy::cast_precision_loss)]
            let (cell_x, cell_y) = (cell_x as f64, cell_y as f64);
            DensityCell {
                latitude: cell_y.mul_add(cell_size_degrees, cell_size_degrees / 2.0),
                longitude: cell_x.mul_add(cell_size_degrees, cell_size_degrees / 2.0),
                counts,
                dominant: dominant_class(&counts),
            }
        })
        .collect()
}

/// Plurality among online/limited/offline; offline is seeded first and is
/// only displaced by a strictly greater count.
fn dominant_class(counts: &ConnectivityCounts) -> Connectivity {
    let mut dominant = Connectivity::Offline;
    let mut max_count = counts.offline;

    if counts.online > max_count {
        dominant = Connectivity::Online;
        max_count = counts.online;
    }
    if counts.limited > max_count {
        dominant = Connectivity::Limited;
    }

    dominant
}

/// Geographic extent of a school set, for recentering the external view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoBounds {
    /// Southernmost latitude.
    pub min_latitude: f64,
    /// Northernmost latitude.
    pub max_latitude: f64,
    /// Westernmost longitude.
    pub min_longitude: f64,
    /// Easternmost longitude.
    pub max_longitude: f64,
}

/// Min/max latitude and longitude across the set, or `None` when the set
/// is empty.
#[must_use]
pub fn bounds(schools: &[School]) -> Option<GeoBounds> {
    let first = schools.first()?;
    let mut extent = GeoBounds {
        min_latitude: first.latitude,
        max_latitude: first.latitude,
        min_longitude: first.longitude,
        max_longitude: first.longitude,
    };

    for school in &schools[1..] {
        extent.min_latitude = extent.min_latitude.min(school.latitude);
        extent.max_latitude = extent.max_latitude.max(school.latitude);
        extent.min_longitude = extent.min_longitude.min(school.longitude);
        extent.max_longitude = extent.max_longitude.max(school.longitude);
    }

    Some(extent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school(name: &str, latitude: f64, longitude: f64, region: &str, connectivity: Connectivity) -> School {
        School {
            id: name.to_string(),
            name: name.to_string(),
            latitude,
            longitude,
            region: region.to_string(),
            province: "P".to_string(),
            city: "C".to_string(),
            connectivity,
            barangay: None,
            enrollment: None,
            connection_type: None,
            provider: None,
            electricity_status: None,
            division: None,
            district: None,
            street_address: None,
        }
    }

    #[test]
    fn region_options_are_distinct_and_sorted() {
        let schools = vec![
            school("a", 14.6, 120.9, "Region VII", Connectivity::Online),
            school("b", 14.7, 120.9, "NCR", Connectivity::Offline),
            school("c", 14.8, 120.9, "Region VII", Connectivity::Limited),
        ];
        assert_eq!(region_options(&schools), vec!["NCR", "Region VII"]);
    }

    #[test]
    fn summary_counts_partition_the_set() {
        let schools = vec![
            school("a", 14.6, 120.9, "NCR", Connectivity::Online),
            school("b", 14.7, 120.9, "NCR", Connectivity::Offline),
            school("c", 14.8, 120.9, "NCR", Connectivity::Limited),
            school("d", 14.9, 120.9, "NCR", Connectivity::Unknown),
            school("e", 15.0, 120.9, "NCR", Connectivity::Online),
        ];
        let counts = summary_counts(&schools);
        assert_eq!(counts.total, 5);
        assert_eq!(
            counts.total,
            counts.online + counts.offline + counts.limited + counts.unknown
        );
    }

    #[test]
    fn cluster_percentages_use_group_size() {
        let mut group = Vec::new();
        for i in 0..6 {
            group.push(school(&format!("on{i}"), 14.6, 120.9, "NCR", Connectivity::Online));
        }
        for i in 0..4 {
            group.push(school(&format!("off{i}"), 14.6, 120.9, "NCR", Connectivity::Offline));
        }
        let breakdown = cluster_breakdown(&group);
        assert!((breakdown.online_percent - 60.0).abs() < 1e-9);
        assert!((breakdown.offline_percent - 40.0).abs() < 1e-9);
        assert!(breakdown.limited_percent.abs() < 1e-9);
    }

    #[test]
    fn density_cells_sum_to_input_size() {
        let schools = vec![
            school("a", 14.61, 120.91, "NCR", Connectivity::Online),
            school("b", 14.62, 120.92, "NCR", Connectivity::Online),
            school("c", 10.31, 123.88, "Region VII", Connectivity::Offline),
            school("d", 7.07, 125.61, "Region XI", Connectivity::Limited),
        ];
        let cells = density_grid(&schools, 0.1);

        let total: u64 = cells.iter().map(|c| c.counts.total).sum();
        assert_eq!(total, schools.len() as u64);
        assert_eq!(cells.len(), 3);
    }

    #[test]
    fn density_cell_centers_sit_on_the_grid() {
        let schools = vec![school("a", 14.65, 120.95, "NCR", Connectivity::Online)];
        let cells = density_grid(&schools, 0.1);
        assert_eq!(cells.len(), 1);
        assert!((cells[0].latitude - 14.65).abs() < 0.1);
        assert!((cells[0].longitude - 120.95).abs() < 0.1);
    }

    #[test]
    fn dominant_ties_go_to_offline_then_online() {
        let mut counts = ConnectivityCounts::new();
        counts.record(Connectivity::Online);
        counts.record(Connectivity::Offline);
        assert_eq!(dominant_class(&counts), Connectivity::Offline);

        counts.record(Connectivity::Online);
        assert_eq!(dominant_class(&counts), Connectivity::Online);

        let mut tie = ConnectivityCounts::new();
        tie.record(Connectivity::Online);
        tie.record(Connectivity::Limited);
        assert_eq!(dominant_class(&tie), Connectivity::Online);
    }

    #[test]
    fn bounds_cover_the_set_and_empty_is_none() {
        let schools = vec![
            school("a", 14.6, 120.9, "NCR", Connectivity::Online),
            school("b", 10.3, 123.9, "Region VII", Connectivity::Offline),
            school("c", 7.1, 125.6, "Region XI", Connectivity::Limited),
        ];
        let extent = bounds(&schools).unwrap();
        assert!((extent.min_latitude - 7.1).abs() < 1e-9);
        assert!((extent.max_latitude - 14.6).abs() < 1e-9);
        assert!((extent.min_longitude - 120.9).abs() < 1e-9);
        assert!((extent.max_longitude - 125.6).abs() < 1e-9);

        assert!(bounds(&[]).is_none());
    }
}
