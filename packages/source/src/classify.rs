//! Connectivity classification.
//!
//! Maps source-specific status signals to the canonical
//! [`Connectivity`] taxonomy. Sources either carry a single free-text
//! status column or a set of binary indicator columns; both classifiers
//! are total and never fail.

use school_map_school_models::Connectivity;

/// Classifies a free-text status string by keyword matching.
///
/// Case-insensitive. Offline keywords are checked before online ones:
/// "disconnected" contains "connected", so the reverse order would
/// misclassify it. Returns [`Connectivity::Unknown`] when no keyword
/// matches.
#[must_use]
pub fn classify_status_text(raw: &str) -> Connectivity {
    let lower = raw.trim().to_lowercase();
    if lower.is_empty() {
        return Connectivity::Unknown;
    }

    // Bare boolean/indicator values that some exports put in the status column
    if matches!(lower.as_str(), "1" | "true") {
        return Connectivity::Online;
    }
    if matches!(lower.as_str(), "0" | "false") {
        return Connectivity::Offline;
    }

    if contains_any(&lower, &["offline", "disconnected", "no connection"]) {
        return Connectivity::Offline;
    }
    if contains_any(&lower, &["online", "connected", "good"]) {
        return Connectivity::Online;
    }
    if contains_any(&lower, &["limited", "mobile", "slow", "poor"]) {
        return Connectivity::Limited;
    }

    Connectivity::Unknown
}

/// Classification inputs resolved from a multi-column indicator row.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndicatorSignals<'a> {
    /// Binary "with internet" flag.
    pub with_internet: bool,
    /// Free-text connection-type field (e.g., "Wired - Connected").
    pub connection_type: Option<&'a str>,
    /// Binary "mobile data" flag.
    pub mobile_data: bool,
    /// Whether the school is enrolled in a free-WiFi or SIM program.
    pub program_enrolled: bool,
    /// Binary "no internet" flag.
    pub no_internet: bool,
}

/// Classifies a multi-column indicator row.
///
/// Precedence: internet flag or a connection type containing "connected"
/// wins; then mobile data or program enrollment; then the no-internet flag.
#[must_use]
pub fn classify_indicators(signals: &IndicatorSignals<'_>) -> Connectivity {
    let connected_type = signals
        .connection_type
        .is_some_and(|t| t.to_lowercase().contains("connected"));

    if signals.with_internet || connected_type {
        Connectivity::Online
    } else if signals.mobile_data || signals.program_enrolled {
        Connectivity::Limited
    } else if signals.no_internet {
        Connectivity::Offline
    } else {
        Connectivity::Unknown
    }
}

/// Derives a provider description from connection-type and program fields.
///
/// Returns `None` when nothing about the provider can be inferred.
#[must_use]
pub fn derive_provider(
    connection_type: Option<&str>,
    wifi_program: Option<&str>,
    sim_program: Option<&str>,
) -> Option<String> {
    let mut provider: Option<String> = None;

    if let Some(kind) = connection_type {
        let lower = kind.to_lowercase();
        if lower.contains("wired") {
            provider = Some("Fixed Broadband".to_string());
        } else if lower.contains("wireless") {
            provider = Some("Wireless".to_string());
        }
    }

    if wifi_program.is_some_and(|s| !s.trim().is_empty()) {
        provider = Some("DICT Free WiFi".to_string());
    }

    if sim_program.is_some_and(|s| !s.trim().is_empty()) {
        provider = Some(provider.map_or_else(
            || "Bayanihan SIM".to_string(),
            |p| format!("{p} + Bayanihan SIM"),
        ));
    }

    provider
}

/// Checks if `haystack` contains any of the given `needles`.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_status_variants() {
        assert_eq!(
            classify_status_text("Poor/Slow connection"),
            Connectivity::Limited
        );
        assert_eq!(
            classify_status_text("No Connection at all"),
            Connectivity::Offline
        );
        assert_eq!(
            classify_status_text("Connected via fiber"),
            Connectivity::Online
        );
        assert_eq!(classify_status_text("???"), Connectivity::Unknown);
    }

    #[test]
    fn offline_keywords_win_over_connected_substring() {
        assert_eq!(classify_status_text("Disconnected"), Connectivity::Offline);
        assert_eq!(classify_status_text("OFFLINE"), Connectivity::Offline);
    }

    #[test]
    fn case_insensitive_match() {
        assert_eq!(classify_status_text("ONLINE"), Connectivity::Online);
        assert_eq!(classify_status_text("Mobile Data"), Connectivity::Limited);
    }

    #[test]
    fn bare_booleans_classify() {
        assert_eq!(classify_status_text("1"), Connectivity::Online);
        assert_eq!(classify_status_text("true"), Connectivity::Online);
        assert_eq!(classify_status_text("0"), Connectivity::Offline);
        assert_eq!(classify_status_text("false"), Connectivity::Offline);
    }

    #[test]
    fn empty_status_is_unknown() {
        assert_eq!(classify_status_text(""), Connectivity::Unknown);
        assert_eq!(classify_status_text("   "), Connectivity::Unknown);
    }

    #[test]
    fn indicator_precedence() {
        let online = IndicatorSignals {
            with_internet: true,
            mobile_data: true,
            no_internet: true,
            ..IndicatorSignals::default()
        };
        assert_eq!(classify_indicators(&online), Connectivity::Online);

        let connected_type = IndicatorSignals {
            connection_type: Some("Wired - Connected"),
            no_internet: true,
            ..IndicatorSignals::default()
        };
        assert_eq!(classify_indicators(&connected_type), Connectivity::Online);

        let mobile = IndicatorSignals {
            mobile_data: true,
            no_internet: true,
            ..IndicatorSignals::default()
        };
        assert_eq!(classify_indicators(&mobile), Connectivity::Limited);

        let program = IndicatorSignals {
            program_enrolled: true,
            no_internet: true,
            ..IndicatorSignals::default()
        };
        assert_eq!(classify_indicators(&program), Connectivity::Limited);

        let offline = IndicatorSignals {
            no_internet: true,
            ..IndicatorSignals::default()
        };
        assert_eq!(classify_indicators(&offline), Connectivity::Offline);

        assert_eq!(
            classify_indicators(&IndicatorSignals::default()),
            Connectivity::Unknown
        );
    }

    #[test]
    fn derives_provider_from_connection_type() {
        assert_eq!(
            derive_provider(Some("Wired - Connected"), None, None).unwrap(),
            "Fixed Broadband"
        );
        assert_eq!(
            derive_provider(Some("Wireless Broadband"), None, None).unwrap(),
            "Wireless"
        );
        assert!(derive_provider(Some("Satellite"), None, None).is_none());
    }

    #[test]
    fn wifi_program_overrides_and_sim_appends() {
        assert_eq!(
            derive_provider(Some("Wired - Connected"), Some("Yes"), None).unwrap(),
            "DICT Free WiFi"
        );
        assert_eq!(
            derive_provider(None, Some("Yes"), Some("Yes")).unwrap(),
            "DICT Free WiFi + Bayanihan SIM"
        );
        assert_eq!(derive_provider(None, None, Some("Yes")).unwrap(), "Bayanihan SIM");
        assert!(derive_provider(None, Some("  "), None).is_none());
    }
}
