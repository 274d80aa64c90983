//! Marker/cluster reconciliation against a third-party map surface.

use agrimap_core::{Coordinates, LocationRecord};

use crate::store::FilteredHandle;

/// One marker to place on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub name: String,
    pub position: Coordinates,
}

/// Content of the single info popup.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupSpec {
    pub name: String,
    pub address: String,
}

/// Axis-aligned region covering a set of markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl LatLngBounds {
    /// Smallest bounds covering every point; `None` for an empty iterator.
    #[must_use]
    pub fn covering(points: impl IntoIterator<Item = Coordinates>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = LatLngBounds {
            south: first.lat,
            west: first.lng,
            north: first.lat,
            east: first.lng,
        };
        for p in points {
            bounds.south = bounds.south.min(p.lat);
            bounds.west = bounds.west.min(p.lng);
            bounds.north = bounds.north.max(p.lat);
            bounds.east = bounds.east.max(p.lng);
        }
        Some(bounds)
    }
}

/// The seam to the map-rendering SDK: markers, one batched clustering call,
/// a single info popup, and viewport fitting.
pub trait MapSurface {
    /// Removes every marker from the clustering layer.
    fn clear_markers(&mut self);
    /// Adds all markers to the clustering layer in one batch.
    fn add_markers(&mut self, markers: Vec<MarkerSpec>);
    fn open_popup(&mut self, popup: PopupSpec);
    fn close_popup(&mut self);
    fn fit_bounds(&mut self, bounds: LatLngBounds);
}

/// Rebuilds the marker layer from the current filtered set and routes popup
/// interactions back into application logic.
///
/// The engine never stores a filtered snapshot of its own: every lookup goes
/// through the [`FilteredHandle`] owned by the store, so handlers registered
/// at marker-creation time stay correct across later filter changes.
pub struct MapSyncEngine<S> {
    surface: S,
    filtered: FilteredHandle,
    open_popup: Option<String>,
    detail_handler: Option<Box<dyn Fn(&LocationRecord) + Send + Sync>>,
}

impl<S: MapSurface> MapSyncEngine<S> {
    pub fn new(surface: S, filtered: FilteredHandle) -> Self {
        Self {
            surface,
            filtered,
            open_popup: None,
            detail_handler: None,
        }
    }

    /// Registers the narrow callback invoked when a popup's detail
    /// call-to-action fires. Registered once; the handler receives the
    /// record as resolved against the filtered set current at fire time.
    pub fn set_detail_handler(
        &mut self,
        handler: impl Fn(&LocationRecord) + Send + Sync + 'static,
    ) {
        self.detail_handler = Some(Box::new(handler));
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Rebuilds the marker/cluster layer from the current filtered set.
    ///
    /// Clears the layer entirely — no incremental diffing; the dataset is
    /// bounded — then adds all markers in one batch and, when the set is
    /// non-empty, fits the viewport to cover them. An empty set leaves the
    /// viewport where it was.
    pub fn sync(&mut self) {
        let markers: Vec<MarkerSpec> = self
            .filtered
            .read()
            .expect("filtered handle poisoned")
            .iter()
            .filter_map(|r| {
                r.coordinates().map(|position| MarkerSpec {
                    name: r.name.clone(),
                    position,
                })
            })
            .collect();

        if self.open_popup.take().is_some() {
            self.surface.close_popup();
        }
        self.surface.clear_markers();

        let bounds = LatLngBounds::covering(markers.iter().map(|m| m.position));
        tracing::debug!(markers = markers.len(), "rebuilding marker layer");
        self.surface.add_markers(markers);
        if let Some(bounds) = bounds {
            self.surface.fit_bounds(bounds);
        }
    }

    /// Marker click: close whichever popup is open — at most one is open
    /// globally — then open this marker's popup.
    pub fn handle_marker_click(&mut self, name: &str) {
        if self.open_popup.take().is_some() {
            self.surface.close_popup();
        }
        let Some(record) = self.find_current(name) else {
            return;
        };
        self.surface.open_popup(PopupSpec {
            name: record.name.clone(),
            address: record.address.clone(),
        });
        self.open_popup = Some(record.name);
    }

    /// Popup detail call-to-action: resolves `name` against the filtered
    /// set as it is NOW and hands the record to the detail handler.
    /// Returns `None` — and invokes nothing — when the depot has since been
    /// filtered out.
    pub fn popup_detail_action(&self, name: &str) -> Option<LocationRecord> {
        let record = self.find_current(name)?;
        if let Some(handler) = &self.detail_handler {
            handler(&record);
        }
        Some(record)
    }

    /// First match wins; depots are keyed by display name.
    fn find_current(&self, name: &str) -> Option<LocationRecord> {
        self.filtered
            .read()
            .expect("filtered handle poisoned")
            .iter()
            .find(|r| r.name == name)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MarkerStore;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum SurfaceOp {
        Clear,
        AddMarkers(Vec<String>),
        OpenPopup(String),
        ClosePopup,
        FitBounds(LatLngBounds),
    }

    #[derive(Default)]
    struct FakeSurface {
        ops: Vec<SurfaceOp>,
    }

    impl MapSurface for FakeSurface {
        fn clear_markers(&mut self) {
            self.ops.push(SurfaceOp::Clear);
        }

        fn add_markers(&mut self, markers: Vec<MarkerSpec>) {
            self.ops
                .push(SurfaceOp::AddMarkers(markers.into_iter().map(|m| m.name).collect()));
        }

        fn open_popup(&mut self, popup: PopupSpec) {
            self.ops.push(SurfaceOp::OpenPopup(popup.name));
        }

        fn close_popup(&mut self) {
            self.ops.push(SurfaceOp::ClosePopup);
        }

        fn fit_bounds(&mut self, bounds: LatLngBounds) {
            self.ops.push(SurfaceOp::FitBounds(bounds));
        }
    }

    fn depot(name: &str, lat: f64, lng: f64) -> LocationRecord {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "address": format!("{name} street 1"),
            "lat": lat,
            "lng": lng,
        }))
        .unwrap()
    }

    fn store_with(records: Vec<LocationRecord>) -> MarkerStore {
        let mut store = MarkerStore::new();
        store.set_full(records);
        store
    }

    #[test]
    fn sync_clears_then_adds_in_one_batch_then_fits() {
        let store = store_with(vec![depot("A", 33.0, 126.0), depot("B", 37.0, 128.0)]);
        let mut engine = MapSyncEngine::new(FakeSurface::default(), store.handle());

        engine.sync();

        let ops = &engine.surface().ops;
        assert_eq!(ops[0], SurfaceOp::Clear);
        assert_eq!(
            ops[1],
            SurfaceOp::AddMarkers(vec!["A".to_owned(), "B".to_owned()])
        );
        assert_eq!(
            ops[2],
            SurfaceOp::FitBounds(LatLngBounds {
                south: 33.0,
                west: 126.0,
                north: 37.0,
                east: 128.0,
            })
        );
    }

    #[test]
    fn empty_filtered_set_leaves_the_viewport_unchanged() {
        let store = store_with(vec![]);
        let mut engine = MapSyncEngine::new(FakeSurface::default(), store.handle());

        engine.sync();

        assert!(
            !engine
                .surface()
                .ops
                .iter()
                .any(|op| matches!(op, SurfaceOp::FitBounds(_))),
            "no bounds fit for an empty set"
        );
    }

    #[test]
    fn at_most_one_popup_is_open() {
        let store = store_with(vec![depot("A", 33.0, 126.0), depot("B", 37.0, 128.0)]);
        let mut engine = MapSyncEngine::new(FakeSurface::default(), store.handle());
        engine.sync();

        engine.handle_marker_click("A");
        engine.handle_marker_click("B");

        let ops = &engine.surface().ops;
        let open_a = ops
            .iter()
            .position(|op| *op == SurfaceOp::OpenPopup("A".to_owned()))
            .unwrap();
        let open_b = ops
            .iter()
            .position(|op| *op == SurfaceOp::OpenPopup("B".to_owned()))
            .unwrap();
        assert!(
            ops[open_a + 1..open_b].contains(&SurfaceOp::ClosePopup),
            "the first popup must close before the second opens"
        );
    }

    #[test]
    fn detail_action_resolves_against_the_current_filtered_set() {
        let mut store = store_with(vec![depot("A", 33.0, 126.0), depot("B", 37.0, 128.0)]);
        let mut engine = MapSyncEngine::new(FakeSurface::default(), store.handle());
        engine.sync(); // markers (and their handlers) created with A and B visible

        store.set_search_term("A street");
        assert_eq!(store.filtered_len(), 1);

        assert!(
            engine.popup_detail_action("B").is_none(),
            "B left the filtered set; its old marker handler must not surface it"
        );
        assert_eq!(engine.popup_detail_action("A").unwrap().name, "A");
    }

    #[test]
    fn detail_handler_receives_the_resolved_record() {
        let store = store_with(vec![depot("A", 33.0, 126.0)]);
        let mut engine = MapSyncEngine::new(FakeSurface::default(), store.handle());
        engine.sync();

        let seen: Arc<Mutex<Vec<String>>> = Arc::default();
        let sink = Arc::clone(&seen);
        engine.set_detail_handler(move |record| {
            sink.lock().unwrap().push(record.name.clone());
        });

        engine.popup_detail_action("A");
        assert_eq!(*seen.lock().unwrap(), vec!["A".to_owned()]);
    }

    #[test]
    fn click_on_a_filtered_out_marker_opens_nothing() {
        let mut store = store_with(vec![depot("A", 33.0, 126.0), depot("B", 37.0, 128.0)]);
        let mut engine = MapSyncEngine::new(FakeSurface::default(), store.handle());
        engine.sync();

        store.set_search_term("A street");
        engine.handle_marker_click("B");

        assert!(
            !engine
                .surface()
                .ops
                .iter()
                .any(|op| *op == SurfaceOp::OpenPopup("B".to_owned())),
            "a stale marker click must not open a popup for a filtered-out depot"
        );
    }
}
