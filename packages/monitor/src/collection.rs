//! In-memory school collection and filter state.

use school_map_school_models::Connectivity;
use school_map_source_models::School;

/// The active filter selection: both predicates optional, matched
/// conjunctively. Reset implicitly whenever a new dataset loads.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Selected region, `None` for "all regions".
    pub region: Option<String>,
    /// Selected connectivity class, `None` for "all".
    pub connectivity: Option<Connectivity>,
}

impl FilterState {
    /// Whether a school matches both predicates (an absent predicate
    /// matches everything).
    #[must_use]
    pub fn matches(&self, school: &School) -> bool {
        let region_match = self
            .region
            .as_deref()
            .is_none_or(|region| school.region == region);
        let connectivity_match = self
            .connectivity
            .is_none_or(|connectivity| school.connectivity == connectivity);
        region_match && connectivity_match
    }

    /// Whether no predicate is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.region.is_none() && self.connectivity.is_none()
    }
}

/// The full normalized set for one loaded dataset plus the currently
/// active filtered subset.
#[derive(Debug, Default)]
pub struct SchoolCollection {
    schools: Vec<School>,
    filtered: Vec<School>,
    filter: FilterState,
}

impl SchoolCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole working set. The previous dataset and any active
    /// filter are discarded together; there is no partial merge.
    pub fn replace_all(&mut self, schools: Vec<School>) {
        self.schools = schools;
        self.filtered = Vec::new();
        self.filter = FilterState::default();
    }

    /// Recomputes the filtered subset for the given selection.
    pub fn apply_filter(&mut self, region: Option<String>, connectivity: Option<Connectivity>) {
        self.filter = FilterState {
            region,
            connectivity,
        };
        self.filtered = self
            .schools
            .iter()
            .filter(|school| self.filter.matches(school))
            .cloned()
            .collect();
    }

    /// The set to display: the filtered subset when it has members, else
    /// the full set. A filter that matches zero records therefore shows
    /// everything rather than nothing; that behavior is intentional and
    /// preserved.
    #[must_use]
    pub fn effective_set(&self) -> &[School] {
        if self.filtered.is_empty() {
            &self.schools
        } else {
            &self.filtered
        }
    }

    /// The full normalized set, ignoring filters.
    #[must_use]
    pub fn full_set(&self) -> &[School] {
        &self.schools
    }

    /// The active filter selection.
    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Whether a non-empty filter selection matched zero schools, i.e.
    /// the effective set fell back to the full set.
    #[must_use]
    pub fn filter_fallback_active(&self) -> bool {
        !self.filter.is_empty() && self.filtered.is_empty()
    }

    /// Number of schools in the full set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schools.len()
    }

    /// Whether the full set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }
}
