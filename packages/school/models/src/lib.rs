#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Connectivity status taxonomy types.
//!
//! This crate defines the canonical connectivity classification used across
//! the entire school-map system. All dataset profiles normalize their
//! source-specific status columns into this shared taxonomy.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Connectivity classification for a school.
///
/// Derived from source data by the classifier in `school_map_source`; raw
/// source strings never appear in a normalized record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Connectivity {
    /// Working fixed or wireless internet connection
    Online,
    /// Mobile data, free public WiFi, or an otherwise degraded connection
    Limited,
    /// No internet connection at all
    Offline,
    /// Source data did not allow a classification
    Unknown,
}

impl Connectivity {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Online, Self::Limited, Self::Offline, Self::Unknown]
    }

    /// Human-readable label for filter selectors and detail payloads.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Limited => "Limited",
            Self::Offline => "Offline",
            Self::Unknown => "Unknown",
        }
    }
}

/// Per-class school counts over some set (the whole collection, a filtered
/// subset, a rendering cluster, or a density grid cell).
///
/// The four classes partition the counted set exactly:
/// `total == online + limited + offline + unknown`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivityCounts {
    /// Schools classified online.
    pub online: u64,
    /// Schools classified limited.
    pub limited: u64,
    /// Schools classified offline.
    pub offline: u64,
    /// Schools that could not be classified.
    pub unknown: u64,
    /// Total schools counted.
    pub total: u64,
}

impl ConnectivityCounts {
    /// Creates an empty count.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            online: 0,
            limited: 0,
            offline: 0,
            unknown: 0,
            total: 0,
        }
    }

    /// Records one school of the given class.
    pub fn record(&mut self, connectivity: Connectivity) {
        match connectivity {
            Connectivity::Online => self.online += 1,
            Connectivity::Limited => self.limited += 1,
            Connectivity::Offline => self.offline += 1,
            Connectivity::Unknown => self.unknown += 1,
        }
        self.total += 1;
    }

    /// Returns the count for a single class.
    #[must_use]
    pub const fn get(&self, connectivity: Connectivity) -> u64 {
        match connectivity {
            Connectivity::Online => self.online,
            Connectivity::Limited => self.limited,
            Connectivity::Offline => self.offline,
            Connectivity::Unknown => self.unknown,
        }
    }

    /// Percentage of the total held by the given class, in `0.0..=100.0`.
    /// Returns `0.0` for an empty count.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self, connectivity: Connectivity) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.get(connectivity) as f64 / self.total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_partition_exactly() {
        let mut counts = ConnectivityCounts::new();
        for connectivity in [
            Connectivity::Online,
            Connectivity::Online,
            Connectivity::Limited,
            Connectivity::Offline,
            Connectivity::Unknown,
        ] {
            counts.record(connectivity);
        }
        assert_eq!(counts.total, 5);
        assert_eq!(
            counts.total,
            counts.online + counts.limited + counts.offline + counts.unknown
        );
    }

    #[test]
    fn percent_of_empty_is_zero() {
        let counts = ConnectivityCounts::new();
        assert!(counts.percent(Connectivity::Online).abs() < f64::EPSILON);
    }

    #[test]
    fn percent_against_group_total() {
        let mut counts = ConnectivityCounts::new();
        for _ in 0..6 {
            counts.record(Connectivity::Online);
        }
        for _ in 0..4 {
            counts.record(Connectivity::Offline);
        }
        assert!((counts.percent(Connectivity::Online) - 60.0).abs() < 1e-9);
        assert!((counts.percent(Connectivity::Offline) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn serializes_screaming_snake_case() {
        let json = serde_json::to_string(&Connectivity::Online).unwrap();
        assert_eq!(json, "\"ONLINE\"");
    }

    #[test]
    fn all_lists_every_variant_once() {
        let all = Connectivity::all();
        assert_eq!(all.len(), 4);
        for variant in all {
            assert_eq!(all.iter().filter(|v| *v == variant).count(), 1);
        }
    }
}
