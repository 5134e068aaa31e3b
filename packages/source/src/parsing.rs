//! Shared field-resolution and coordinate validation utilities.
//!
//! Raw rows travel as string-keyed [`serde_json::Value`] objects. The
//! resolvers here implement the alias-chain rule used by every dataset
//! profile: the first present, non-empty value in the alias list wins.

use serde_json::Value;

/// Returns the first present, non-empty value for an alias list.
///
/// `null` values and blank strings count as absent; the next alias is NOT
/// consulted once a present value is found, even if it fails a later
/// numeric coercion.
#[must_use]
pub fn first_present<'a>(record: &'a Value, aliases: &[String]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| record.get(alias))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        })
}

/// Resolves an alias chain to a trimmed string.
#[must_use]
pub fn resolve_string(record: &Value, aliases: &[String]) -> Option<String> {
    match first_present(record, aliases)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Resolves an alias chain to a coordinate value.
///
/// A missing field resolves to `0.0` and an unparseable one to NaN, so
/// both fall to the coordinate validator's sentinel checks rather than
/// failing the row.
#[must_use]
pub fn resolve_coordinate(record: &Value, aliases: &[String]) -> f64 {
    let Some(value) = first_present(record, aliases) else {
        return 0.0;
    };
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Resolves an alias chain to a binary indicator flag (`1`, `"1"`, or
/// `true` set the flag).
#[must_use]
pub fn resolve_flag(record: &Value, aliases: &[String]) -> bool {
    first_present(record, aliases).is_some_and(|value| match value {
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => s.trim() == "1",
        Value::Bool(b) => *b,
        _ => false,
    })
}

/// Resolves an alias chain to a non-negative count (e.g., enrollment).
#[must_use]
pub fn resolve_count(record: &Value, aliases: &[String]) -> Option<u32> {
    match first_present(record, aliases)? {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Coordinate acceptance policy for a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoordinatePolicy {
    /// Reject only the missing-value sentinels: NaN or exactly zero.
    #[default]
    ZeroAndNan,
    /// Additionally require the point to fall inside the Philippine
    /// archipelago envelope bands.
    PhilippineEnvelope,
}

/// Latitude-band envelope covering the archipelago, as
/// `(lat_min, lat_max, lng_min, lng_max)` inclusive ranges.
const ENVELOPE_BANDS: &[(f64, f64, f64, f64)] = &[
    // Batanes and northern Luzon
    (18.0, 21.2, 120.0, 122.2),
    // Central Luzon
    (14.0, 18.0, 119.5, 122.5),
    // Southern Luzon and northern Visayas
    (10.0, 14.0, 118.0, 126.0),
    // Visayas
    (8.0, 12.0, 121.0, 126.8),
    // Mindanao
    (4.0, 10.0, 116.0, 126.8),
];

/// Palawan extends west of every band above; it is allowed unconditionally.
const PALAWAN_BAND: (f64, f64, f64, f64) = (7.0, 12.0, 116.0, 119.5);

/// Validates a coordinate pair under the given policy.
///
/// Exactly-zero values are treated as the "missing" sentinel. A school
/// legitimately sitting on the equator or prime meridian would be rejected;
/// that is a documented limitation of the source data convention, not
/// something this validator second-guesses.
///
/// In envelope mode a point is accepted if any band contains it. Band
/// membership is evaluated independently per band (not
/// first-latitude-band-decides), so overlapping latitude ranges cannot
/// shadow each other.
#[must_use]
pub fn valid_coordinates(latitude: f64, longitude: f64, policy: CoordinatePolicy) -> bool {
    if latitude.is_nan() || longitude.is_nan() || latitude == 0.0 || longitude == 0.0 {
        return false;
    }
    match policy {
        CoordinatePolicy::ZeroAndNan => true,
        CoordinatePolicy::PhilippineEnvelope => in_envelope(latitude, longitude),
    }
}

fn in_envelope(latitude: f64, longitude: f64) -> bool {
    let in_band = |band: &(f64, f64, f64, f64)| {
        latitude >= band.0 && latitude <= band.1 && longitude >= band.2 && longitude <= band.3
    };
    in_band(&PALAWAN_BAND) || ENVELOPE_BANDS.iter().any(in_band)
}
