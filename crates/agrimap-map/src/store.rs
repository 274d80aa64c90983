//! Depot set ownership and filter recomputation.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use agrimap_core::{EquipmentKey, LocationRecord};

/// Shared view of the current filtered depot set.
///
/// Popup callbacks registered at marker-creation time read through this
/// handle, so a handler firing after later filter changes always sees the
/// latest set — never the one captured when its marker was built.
pub type FilteredHandle = Arc<RwLock<Vec<LocationRecord>>>;

/// The two independent filter predicates.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    /// Selected equipment keys. Empty means no type filter. Multiple keys
    /// combine with AND: a depot must satisfy every one.
    pub selected: BTreeSet<EquipmentKey>,
    /// Case-insensitive substring match against name or address. Blank
    /// passes everything.
    pub search_term: String,
}

impl FilterState {
    /// Whether `record` passes both predicates.
    #[must_use]
    pub fn matches(&self, record: &LocationRecord) -> bool {
        self.passes_type_filter(record) && self.passes_search(record)
    }

    fn passes_type_filter(&self, record: &LocationRecord) -> bool {
        self.selected.iter().all(|key| match key {
            EquipmentKey::Other => record.has_other_equipment(),
            EquipmentKey::Machine(machine) => record.count(*machine) > 0,
        })
    }

    fn passes_search(&self, record: &LocationRecord) -> bool {
        let term = self.search_term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        record.name.to_lowercase().contains(&term)
            || record.address.to_lowercase().contains(&term)
    }
}

/// Owns the full depot set and the current filtered subset.
///
/// The filtered subset is a pure function of (full set, filter state): every
/// mutator recomputes it wholesale with a linear scan — the dataset is a few
/// hundred records — and writes it into the shared handle synchronously
/// before returning.
#[derive(Default)]
pub struct MarkerStore {
    full: Vec<LocationRecord>,
    filter: FilterState,
    filtered: FilteredHandle,
}

impl MarkerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared handle consumed by [`crate::MapSyncEngine`] and popup
    /// callbacks.
    #[must_use]
    pub fn handle(&self) -> FilteredHandle {
        Arc::clone(&self.filtered)
    }

    /// Replaces the full set (enriched or not) and recomputes.
    pub fn set_full(&mut self, records: Vec<LocationRecord>) {
        self.full = records;
        self.recompute();
    }

    /// Replaces the type-filter selection and recomputes.
    pub fn set_selected(&mut self, keys: BTreeSet<EquipmentKey>) {
        self.filter.selected = keys;
        self.recompute();
    }

    /// Replaces the search term and recomputes.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filter.search_term = term.into();
        self.recompute();
    }

    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Snapshot of the current filtered set.
    #[must_use]
    pub fn filtered(&self) -> Vec<LocationRecord> {
        self.filtered.read().expect("filtered handle poisoned").clone()
    }

    /// Count of all depots, geocoded or not — the "total depots" statistic.
    #[must_use]
    pub fn total(&self) -> usize {
        self.full.len()
    }

    #[must_use]
    pub fn filtered_len(&self) -> usize {
        self.filtered.read().expect("filtered handle poisoned").len()
    }

    /// Applies both predicates, then narrows to depots with coordinates —
    /// a record without a resolved position is never handed to the map.
    fn recompute(&mut self) {
        let next: Vec<LocationRecord> = self
            .full
            .iter()
            .filter(|r| r.coordinates().is_some() && self.filter.matches(r))
            .cloned()
            .collect();
        tracing::debug!(
            total = self.full.len(),
            filtered = next.len(),
            "recomputed filtered depot set"
        );
        *self.filtered.write().expect("filtered handle poisoned") = next;
    }
}
