#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Marker and cluster icon descriptors.
//!
//! Stateless projections from school records and connectivity counts to
//! the serializable descriptors consumed by the rendering collaborator.
//! Nothing here touches the map library directly; the renderer binds
//! these descriptors to its own marker, cluster, and tooltip widgets.

use school_map_school_models::{Connectivity, ConnectivityCounts};
use school_map_source_models::School;
use serde::Serialize;

/// Marker color for online schools.
pub const ONLINE_COLOR: &str = "#28a745";
/// Marker color for limited-connectivity schools.
pub const LIMITED_COLOR: &str = "#ffc107";
/// Marker color for offline schools.
pub const OFFLINE_COLOR: &str = "#dc3545";
/// Marker color for unclassified schools.
pub const UNKNOWN_COLOR: &str = "#6c757d";

/// Muted cluster color for an online plurality short of dominance.
pub const MUTED_ONLINE_COLOR: &str = "#5cb85c";
/// Muted cluster color for an offline plurality short of dominance.
pub const MUTED_OFFLINE_COLOR: &str = "#d9534f";
/// Muted cluster color for a limited plurality short of dominance.
pub const MUTED_LIMITED_COLOR: &str = "#f0ad4e";

/// Share of a cluster a single class must reach to color the whole icon.
const DOMINANT_PERCENT: f64 = 60.0;
/// Minimum cluster size for the proportional pie encoding.
const PIE_MIN_MEMBERS: u64 = 5;

/// Direct 1:1 color for a single school marker. No aggregation.
#[must_use]
pub const fn marker_color(connectivity: Connectivity) -> &'static str {
    match connectivity {
        Connectivity::Online => ONLINE_COLOR,
        Connectivity::Limited => LIMITED_COLOR,
        Connectivity::Offline => OFFLINE_COLOR,
        Connectivity::Unknown => UNKNOWN_COLOR,
    }
}

/// Discrete cluster size tier, mapped from the member count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeTier {
    /// Fewer than 20 members.
    Small,
    /// 20 to 99 members.
    Medium,
    /// 100 or more members.
    Large,
}

impl SizeTier {
    /// Tier for a cluster of `members` schools.
    #[must_use]
    pub const fn from_count(members: u64) -> Self {
        if members >= 100 {
            Self::Large
        } else if members >= 20 {
            Self::Medium
        } else {
            Self::Small
        }
    }

    /// Icon diameter in pixels for this tier.
    #[must_use]
    pub const fn icon_px(self) -> u32 {
        match self {
            Self::Small => 40,
            Self::Medium => 47,
            Self::Large => 55,
        }
    }
}

/// One slice of a proportional cluster pie.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSegment {
    /// The class this slice represents.
    pub connectivity: Connectivity,
    /// Slice color.
    pub color: &'static str,
    /// Slice start angle in degrees, clockwise from 12 o'clock.
    pub start_degrees: f64,
    /// Slice sweep: class fraction of the group × 360.
    pub sweep_degrees: f64,
}

/// How a cluster icon is filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClusterEncoding {
    /// A single color fills the icon.
    Solid {
        /// Fill color.
        color: &'static str,
    },
    /// Proportional multi-segment encoding for mixed clusters, segments
    /// ordered online → limited → offline.
    Pie {
        /// Non-empty slices in drawing order.
        segments: Vec<PieSegment>,
    },
}

/// Renderable description of one cluster icon.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterIcon {
    /// Member count displayed in the icon center.
    pub total: u64,
    /// Discrete size tier.
    pub size_tier: SizeTier,
    /// Icon diameter in pixels.
    pub icon_px: u32,
    /// Fill encoding.
    pub encoding: ClusterEncoding,
}

/// Projects connectivity counts to a cluster icon description.
///
/// Precedence: a class holding at least 60% of the group colors the whole
/// icon; otherwise a mixed group of five or more gets the pie encoding;
/// otherwise the plurality class picks a muted solid color, with gray for
/// an exact tie.
#[must_use]
pub fn cluster_icon(counts: &ConnectivityCounts) -> ClusterIcon {
    let size_tier = SizeTier::from_count(counts.total);

    let encoding = if counts.percent(Connectivity::Online) >= DOMINANT_PERCENT {
        ClusterEncoding::Solid { color: ONLINE_COLOR }
    } else if counts.percent(Connectivity::Offline) >= DOMINANT_PERCENT {
        ClusterEncoding::Solid {
            color: OFFLINE_COLOR,
        }
    } else if counts.percent(Connectivity::Limited) >= DOMINANT_PERCENT {
        ClusterEncoding::Solid {
            color: LIMITED_COLOR,
        }
    } else if mixed_classes(counts) >= 2 && counts.total >= PIE_MIN_MEMBERS {
        ClusterEncoding::Pie {
            segments: pie_segments(counts),
        }
    } else {
        ClusterEncoding::Solid {
            color: plurality_color(counts),
        }
    };

    ClusterIcon {
        total: counts.total,
        size_tier,
        icon_px: size_tier.icon_px(),
        encoding,
    }
}

/// Number of classes among online/limited/offline with any members.
fn mixed_classes(counts: &ConnectivityCounts) -> usize {
    [counts.online, counts.limited, counts.offline]
        .iter()
        .filter(|count| **count > 0)
        .count()
}

fn pie_segments(counts: &ConnectivityCounts) -> Vec<PieSegment> {
    let classes = [
        (Connectivity::Online, ONLINE_COLOR, counts.online),
        (Connectivity::Limited, LIMITED_COLOR, counts.limited),
        (Connectivity::Offline, OFFLINE_COLOR, counts.offline),
    ];

    let mut segments = Vec::new();
    let mut start = 0.0;
    for (connectivity, color, count) in classes {
        if count == 0 {
            continue;
        }
        #[allow(clippy::cast_precision_loss)]
        let sweep = count as f64 / counts.total as f64 * 360.0;
        segments.push(PieSegment {
            connectivity,
            color,
            start_degrees: start,
            sweep_degrees: sweep,
        });
        start += sweep;
    }
    segments
}

/// Muted color for the plurality class, gray for an exact tie.
fn plurality_color(counts: &ConnectivityCounts) -> &'static str {
    let (online, offline, limited) = (counts.online, counts.offline, counts.limited);

    if online > offline && online > limited {
        MUTED_ONLINE_COLOR
    } else if offline > online && offline > limited {
        MUTED_OFFLINE_COLOR
    } else if limited > online && limited > offline {
        MUTED_LIMITED_COLOR
    } else {
        UNKNOWN_COLOR
    }
}

/// One label/value pair of a popup detail payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailField {
    /// Field label.
    pub label: &'static str,
    /// Rendered value; missing optional source fields render as "None".
    pub value: String,
}

/// A school projected for the rendering collaborator: position, icon
/// color, and the bound detail payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerView {
    /// Stable school identifier.
    pub id: String,
    /// School name (popup title).
    pub name: String,
    /// Marker latitude.
    pub latitude: f64,
    /// Marker longitude.
    pub longitude: f64,
    /// Marker color from the 1:1 connectivity map.
    pub color: &'static str,
    /// Ordered popup fields.
    pub detail: Vec<DetailField>,
}

/// Projects one school to its marker description.
#[must_use]
pub fn school_marker(school: &School) -> MarkerView {
    MarkerView {
        id: school.id.clone(),
        name: school.name.clone(),
        latitude: school.latitude,
        longitude: school.longitude,
        color: marker_color(school.connectivity),
        detail: detail_payload(school),
    }
}

/// Builds the popup payload in its fixed order. Consumers rely on stable
/// field positions, so absent values render as "None" rather than being
/// omitted.
#[must_use]
pub fn detail_payload(school: &School) -> Vec<DetailField> {
    let optional = |value: &Option<String>| {
        value
            .clone()
            .unwrap_or_else(|| "None".to_string())
    };

    vec![
        DetailField {
            label: "Region",
            value: school.region.clone(),
        },
        DetailField {
            label: "Province",
            value: school.province.clone(),
        },
        DetailField {
            label: "City",
            value: school.city.clone(),
        },
        DetailField {
            label: "Barangay",
            value: optional(&school.barangay),
        },
        DetailField {
            label: "Status",
            value: school.connectivity.label().to_string(),
        },
        DetailField {
            label: "Connection Type",
            value: optional(&school.connection_type),
        },
        DetailField {
            label: "Provider",
            value: optional(&school.provider),
        },
        DetailField {
            label: "Electricity",
            value: optional(&school.electricity_status),
        },
        DetailField {
            label: "Enrollment",
            value: school
                .enrollment
                .map_or_else(|| "None".to_string(), |n| n.to_string()),
        },
        DetailField {
            label: "Coordinates",
            value: format!("{:.4}, {:.4}", school.latitude, school.longitude),
        },
    ]
}

/// Tooltip text for a cluster: total plus per-class counts and shares.
#[must_use]
pub fn cluster_tooltip(counts: &ConnectivityCounts) -> String {
    format!(
        "{} Schools\nOnline: {} ({:.1}%)\nLimited: {} ({:.1}%)\nOffline: {} ({:.1}%)",
        counts.total,
        counts.online,
        counts.percent(Connectivity::Online),
        counts.limited,
        counts.percent(Connectivity::Limited),
        counts.offline,
        counts.percent(Connectivity::Offline),
    )
}
