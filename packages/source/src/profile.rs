//! Config-driven dataset profile definition.
//!
//! A [`DatasetProfile`] captures everything unique about a spreadsheet
//! schema in a serializable config struct: the alias chain for each
//! canonical field and the connectivity classification scheme. A single
//! generic normalizer handles all profiles, eliminating per-schema
//! boilerplate.

use school_map_school_models::Connectivity;
use school_map_source_models::{
    NormalizeOutcome, SchemeType, School, UNKNOWN_CITY, UNKNOWN_NAME, UNKNOWN_PROVINCE,
    UNKNOWN_REGION,
};
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest as _, Sha256};

use crate::classify::{
    IndicatorSignals, classify_indicators, classify_status_text, derive_provider,
};
use crate::parsing::{
    CoordinatePolicy, resolve_coordinate, resolve_count, resolve_flag, resolve_string,
    valid_coordinates,
};

/// A complete, config-driven dataset profile.
///
/// Loaded from TOML files embedded at compile time and used as the sole
/// normalizer implementation.
#[derive(Debug, Deserialize)]
pub struct DatasetProfile {
    /// Unique identifier (e.g., `"deped_status"`).
    pub id: String,
    /// Human-readable name (e.g., `"DepEd status export"`).
    pub name: String,
    /// Alias chains for the canonical school fields.
    pub fields: FieldAliases,
    /// How connectivity is derived from a raw row.
    pub classifier: ClassifierConfig,
}

/// Alias chains for each canonical field, tried in order (first present,
/// non-empty value wins).
#[derive(Debug, Deserialize)]
pub struct FieldAliases {
    /// Source school ID column names (preferred over derived IDs).
    pub school_id: Vec<String>,
    /// School name column names.
    pub name: Vec<String>,
    /// Latitude column names.
    pub latitude: Vec<String>,
    /// Longitude column names.
    pub longitude: Vec<String>,
    /// Region column names.
    pub region: Vec<String>,
    /// Province column names.
    pub province: Vec<String>,
    /// City/municipality column names.
    pub city: Vec<String>,
    /// Barangay column names.
    #[serde(default)]
    pub barangay: Vec<String>,
    /// Enrollment column names.
    #[serde(default)]
    pub enrollment: Vec<String>,
    /// Electricity status column names.
    #[serde(default)]
    pub electricity: Vec<String>,
    /// DepEd division column names.
    #[serde(default)]
    pub division: Vec<String>,
    /// DepEd district column names.
    #[serde(default)]
    pub district: Vec<String>,
    /// Street address column names.
    #[serde(default)]
    pub street_address: Vec<String>,
}

/// Connectivity classification scheme configuration.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassifierConfig {
    /// Single free-text status column (keyword matching).
    StatusText {
        /// Status column alias chain.
        status: Vec<String>,
    },
    /// Binary indicator columns plus free-text connection-type and
    /// program fields.
    IndicatorFlags {
        /// "With internet" flag alias chain.
        with_internet: Vec<String>,
        /// "Mobile data" flag alias chain.
        mobile_data: Vec<String>,
        /// "No internet" flag alias chain.
        no_internet: Vec<String>,
        /// Connection-type text alias chain.
        connection_type: Vec<String>,
        /// Free-WiFi program alias chain.
        wifi_program: Vec<String>,
        /// SIM program alias chain.
        sim_program: Vec<String>,
    },
}

impl ClassifierConfig {
    /// The scheme this configuration selects.
    #[must_use]
    pub const fn scheme(&self) -> SchemeType {
        match self {
            Self::StatusText { .. } => SchemeType::StatusText,
            Self::IndicatorFlags { .. } => SchemeType::IndicatorFlags,
        }
    }

    /// Classifies one raw row, also returning the raw connection-type text
    /// and the derived provider description where the scheme carries them.
    fn classify(&self, record: &Value) -> (Connectivity, Option<String>, Option<String>) {
        match self {
            Self::StatusText { status } => {
                let raw = resolve_string(record, status).unwrap_or_default();
                (classify_status_text(&raw), None, None)
            }
            Self::IndicatorFlags {
                with_internet,
                mobile_data,
                no_internet,
                connection_type,
                wifi_program,
                sim_program,
            } => {
                let kind = resolve_string(record, connection_type);
                let wifi = resolve_string(record, wifi_program);
                let sim = resolve_string(record, sim_program);

                let connectivity = classify_indicators(&IndicatorSignals {
                    with_internet: resolve_flag(record, with_internet),
                    connection_type: kind.as_deref(),
                    mobile_data: resolve_flag(record, mobile_data),
                    program_enrolled: wifi.is_some() || sim.is_some(),
                    no_internet: resolve_flag(record, no_internet),
                });
                let provider = derive_provider(kind.as_deref(), wifi.as_deref(), sim.as_deref());

                (connectivity, kind, provider)
            }
        }
    }
}

/// Error for a single row that could not be normalized at all.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    /// The row is not a string-keyed object.
    #[error("row is not a key/value object")]
    NotAnObject,
}

impl DatasetProfile {
    /// Returns the unique profile identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable profile name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the classification scheme of this profile.
    #[must_use]
    pub const fn scheme(&self) -> SchemeType {
        self.classifier.scheme()
    }

    /// Normalizes a single raw row into a canonical [`School`].
    ///
    /// Pure: the input row is never mutated. Coordinates are carried
    /// through as resolved (including the 0/NaN missing sentinels);
    /// the coordinate validator decides acceptance separately.
    ///
    /// # Errors
    ///
    /// Returns [`RowError`] if the row is structurally malformed.
    pub fn normalize_row(&self, row: &Value) -> Result<School, RowError> {
        if !row.is_object() {
            return Err(RowError::NotAnObject);
        }
        let fields = &self.fields;

        let name =
            resolve_string(row, &fields.name).unwrap_or_else(|| UNKNOWN_NAME.to_string());
        let latitude = resolve_coordinate(row, &fields.latitude);
        let longitude = resolve_coordinate(row, &fields.longitude);

        let (connectivity, connection_type, provider) = self.classifier.classify(row);

        let id = resolve_string(row, &fields.school_id)
            .unwrap_or_else(|| derive_id(&name, latitude, longitude));

        Ok(School {
            id,
            name,
            latitude,
            longitude,
            region: resolve_string(row, &fields.region)
                .unwrap_or_else(|| UNKNOWN_REGION.to_string()),
            province: resolve_string(row, &fields.province)
                .unwrap_or_else(|| UNKNOWN_PROVINCE.to_string()),
            city: resolve_string(row, &fields.city).unwrap_or_else(|| UNKNOWN_CITY.to_string()),
            connectivity,
            barangay: resolve_string(row, &fields.barangay),
            enrollment: resolve_count(row, &fields.enrollment),
            connection_type,
            provider,
            electricity_status: resolve_string(row, &fields.electricity),
            division: resolve_string(row, &fields.division),
            district: resolve_string(row, &fields.district),
            street_address: resolve_string(row, &fields.street_address),
        })
    }

    /// Normalizes a batch of raw rows, applying coordinate validation and
    /// keeping the two drop reasons separately countable.
    ///
    /// One bad row never aborts the batch.
    #[must_use]
    pub fn normalize_rows(&self, rows: &[Value], policy: CoordinatePolicy) -> NormalizeOutcome {
        let mut outcome = NormalizeOutcome::default();

        for row in rows {
            match self.normalize_row(row) {
                Err(err) => {
                    log::debug!("[{}] dropping row: {err}", self.id);
                    outcome.malformed += 1;
                }
                Ok(school) => {
                    if valid_coordinates(school.latitude, school.longitude, policy) {
                        outcome.schools.push(school);
                    } else {
                        if school.name != UNKNOWN_NAME {
                            log::debug!(
                                "[{}] dropping {}: invalid coordinates ({}, {})",
                                self.id,
                                school.name,
                                school.latitude,
                                school.longitude
                            );
                        }
                        outcome.invalid_coords += 1;
                    }
                }
            }
        }

        log::info!(
            "[{}] normalized {}/{} rows ({} malformed, {} coordinate-rejected)",
            self.id,
            outcome.schools.len(),
            rows.len(),
            outcome.malformed,
            outcome.invalid_coords
        );

        outcome
    }
}

/// Deterministic fallback ID for rows without a source school ID: a
/// truncated SHA-256 digest of the name and coordinates. Stable across
/// loads of the same file, unlike a random token.
fn derive_id(name: &str, latitude: f64, longitude: f64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(latitude.to_le_bytes());
    hasher.update(longitude.to_le_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..6])
}

/// Parses a [`DatasetProfile`] from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or missing required fields.
pub fn parse_profile_toml(toml_str: &str) -> Result<DatasetProfile, String> {
    toml::de::from_str(toml_str).map_err(|e| e.to_string())
}
