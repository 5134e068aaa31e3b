#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The canonical normalized school record and per-load accounting types.
//!
//! Every dataset profile (DepEd status export, DICT masterlist, etc.)
//! produces [`School`] records that conform to the shared taxonomy in
//! [`school_map_school_models`].

use school_map_school_models::Connectivity;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How a dataset profile derives the connectivity class from a raw row.
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
pub enum SchemeType {
    /// Single free-text status column, classified by keyword matching.
    StatusText,
    /// Binary with-internet / mobile-data / no-internet indicator columns
    /// plus free-text connection-type and program fields.
    IndicatorFlags,
}

/// A school normalized to the canonical schema.
///
/// Immutable after creation: one record per source row, built only by the
/// profile normalizer. Coordinates are unvalidated here; the coordinate
/// validator decides whether the record enters the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    /// Stable identifier: the source school ID when present, else a
    /// content-derived digest token.
    pub id: String,
    /// School name.
    pub name: String,
    /// Latitude (WGS84 degrees).
    pub latitude: f64,
    /// Longitude (WGS84 degrees).
    pub longitude: f64,
    /// Administrative region (e.g., "NCR", "Region VII").
    pub region: String,
    /// Province.
    pub province: String,
    /// City or municipality.
    pub city: String,
    /// Derived connectivity class.
    pub connectivity: Connectivity,
    /// Barangay, when the source carries it.
    pub barangay: Option<String>,
    /// Enrolled learner count, when the source carries it.
    pub enrollment: Option<u32>,
    /// Raw connection-type text (e.g., "Wired - Connected").
    pub connection_type: Option<String>,
    /// Derived provider description (e.g., "Fixed Broadband", "DICT Free WiFi").
    pub provider: Option<String>,
    /// Electricity availability text from the source.
    pub electricity_status: Option<String>,
    /// DepEd division.
    pub division: Option<String>,
    /// DepEd district.
    pub district: Option<String>,
    /// Street address.
    pub street_address: Option<String>,
}

/// Default name for a row without a resolvable school name.
pub const UNKNOWN_NAME: &str = "Unknown School";
/// Default region for a row without a resolvable region.
pub const UNKNOWN_REGION: &str = "Unknown Region";
/// Default province for a row without a resolvable province.
pub const UNKNOWN_PROVINCE: &str = "Unknown Province";
/// Default city for a row without a resolvable city/municipality.
pub const UNKNOWN_CITY: &str = "Unknown City";

/// Outcome of normalizing one batch of raw rows.
///
/// The two drop reasons are tracked separately so the status surface can
/// report malformed rows and coordinate rejections independently.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NormalizeOutcome {
    /// Records that passed normalization and coordinate validation.
    pub schools: Vec<School>,
    /// Rows dropped because they were structurally malformed.
    pub malformed: u64,
    /// Rows dropped by the coordinate validator.
    pub invalid_coords: u64,
}

impl NormalizeOutcome {
    /// Total number of rows consumed from the source batch.
    #[must_use]
    pub fn rows_seen(&self) -> u64 {
        self.schools.len() as u64 + self.malformed + self.invalid_coords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn school_serializes_camel_case() {
        let school = School {
            id: "300123".to_string(),
            name: "Manila High School".to_string(),
            latitude: 14.5995,
            longitude: 120.9842,
            region: "NCR".to_string(),
            province: "Metro Manila".to_string(),
            city: "Manila".to_string(),
            connectivity: Connectivity::Online,
            barangay: None,
            enrollment: Some(1200),
            connection_type: None,
            provider: None,
            electricity_status: None,
            division: None,
            district: None,
            street_address: None,
        };
        let json = serde_json::to_value(&school).unwrap();
        assert_eq!(json["connectivity"], "ONLINE");
        assert_eq!(json["streetAddress"], serde_json::Value::Null);
        assert_eq!(json["enrollment"], 1200);
    }

    #[test]
    fn outcome_accounts_for_every_row() {
        let outcome = NormalizeOutcome {
            schools: Vec::new(),
            malformed: 2,
            invalid_coords: 3,
        };
        assert_eq!(outcome.rows_seen(), 5);
    }

    #[test]
    fn scheme_type_round_trips_through_strum() {
        use std::str::FromStr as _;
        let parsed = SchemeType::from_str("STATUS_TEXT").unwrap();
        assert_eq!(parsed, SchemeType::StatusText);
        assert_eq!(SchemeType::IndicatorFlags.to_string(), "INDICATOR_FLAGS");
    }
}
