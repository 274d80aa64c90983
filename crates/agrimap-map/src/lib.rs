//! Marker filtering and map-surface synchronization for the rental-depot map.
//!
//! [`MarkerStore`] owns the full depot set and recomputes the filtered
//! subset wholesale on every predicate change, publishing it through a
//! shared [`FilteredHandle`]. [`MapSyncEngine`] rebuilds the marker/cluster
//! layer of a [`MapSurface`] from that handle and routes popup interactions
//! back into application logic without ever capturing a stale snapshot.

mod store;
mod sync;

pub use store::{FilterState, FilteredHandle, MarkerStore};
pub use sync::{LatLngBounds, MapSurface, MapSyncEngine, MarkerSpec, PopupSpec};
