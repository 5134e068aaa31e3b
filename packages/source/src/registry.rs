//! Profile registry: loads dataset profiles from embedded TOML configs.
//!
//! Each `.toml` file in `packages/source/profiles/` is baked into the
//! binary at compile time via [`include_str!`]. Which classification scheme
//! applies to a load is a configuration choice made by picking a profile,
//! never something the normalizer guesses from the data.

use crate::profile::{DatasetProfile, parse_profile_toml};

/// TOML configs embedded at compile time.
const PROFILE_TOMLS: &[(&str, &str)] = &[
    (
        "deped_status",
        include_str!("../profiles/deped_status.toml"),
    ),
    (
        "dict_masterlist",
        include_str!("../profiles/dict_masterlist.toml"),
    ),
];

/// Profile used when the caller does not pick one.
pub const DEFAULT_PROFILE: &str = "deped_status";

/// Returns all configured dataset profiles, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time
/// guarantee since the configs are embedded).
#[must_use]
pub fn all_profiles() -> Vec<DatasetProfile> {
    PROFILE_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_profile_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up a profile by its identifier.
#[must_use]
pub fn find_profile(id: &str) -> Option<DatasetProfile> {
    all_profiles().into_iter().find(|p| p.id() == id)
}

/// Returns the default profile.
#[must_use]
pub fn default_profile() -> DatasetProfile {
    find_profile(DEFAULT_PROFILE)
        .unwrap_or_else(|| panic!("default profile {DEFAULT_PROFILE} missing from registry"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use school_map_source_models::SchemeType;

    #[test]
    fn loads_all_profiles() {
        let profiles = all_profiles();
        assert_eq!(profiles.len(), PROFILE_TOMLS.len());
    }

    #[test]
    fn profile_ids_match_registry_keys_and_are_unique() {
        let profiles = all_profiles();
        for ((key, _), profile) in PROFILE_TOMLS.iter().zip(&profiles) {
            assert_eq!(*key, profile.id());
        }
        let mut ids: Vec<&str> = profiles.iter().map(DatasetProfile::id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), profiles.len());
    }

    #[test]
    fn default_profile_exists_and_uses_status_scheme() {
        let profile = default_profile();
        assert_eq!(profile.id(), DEFAULT_PROFILE);
        assert_eq!(profile.scheme(), SchemeType::StatusText);
    }

    #[test]
    fn masterlist_profile_uses_indicator_scheme() {
        let profile = find_profile("dict_masterlist").unwrap();
        assert_eq!(profile.scheme(), SchemeType::IndicatorFlags);
    }
}
