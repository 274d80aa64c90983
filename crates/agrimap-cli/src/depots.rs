//! Depot map pipeline: fetch → enrich → filter → render.

use std::collections::BTreeSet;
use std::io::Write;

use anyhow::Context;

use agrimap_core::{AppConfig, EquipmentKey, LocationRecord, MachineType};
use agrimap_geocode::{BatchEnricher, GeocodeClient};
use agrimap_map::{LatLngBounds, MapSurface, MapSyncEngine, MarkerSpec, MarkerStore, PopupSpec};
use agrimap_portal::PortalClient;

#[derive(Debug, clap::Args)]
pub(crate) struct DepotsArgs {
    /// Equipment filter; repeatable. A depot must stock every listed key
    /// (machine-type wire keys, or `other` for the free-text column).
    #[arg(long = "machine", value_name = "KEY")]
    machines: Vec<String>,

    /// Case-insensitive substring match against depot name or address.
    #[arg(long)]
    search: Option<String>,
}

/// Runs the full map pipeline and renders the filtered set as text.
///
/// Per-depot geocode failures are logged and skipped; only a failure of the
/// bulk fetch aborts the run.
pub(crate) async fn run(config: &AppConfig, args: DepotsArgs) -> anyhow::Result<()> {
    let selected = parse_filter_keys(&args.machines)?;

    let portal = PortalClient::new(
        &config.portal_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    let records = portal
        .rental_locations()
        .await
        .context("failed to load rental locations")?;
    println!("Loaded {} depots", records.len());

    let geocoder = GeocodeClient::new(
        &config.geocoder_rest_key,
        config.request_timeout_secs,
        config.geocode_max_retries,
        config.geocode_retry_delay_ms,
    )?;
    let enricher = BatchEnricher::with_pacing(
        geocoder,
        config.geocode_batch_size,
        config.geocode_inter_batch_delay_ms,
    );

    let enriched = enrich_with_progress(&enricher, records).await;

    let mut store = MarkerStore::new();
    store.set_full(enriched);
    store.set_selected(selected);
    if let Some(term) = args.search {
        store.set_search_term(term);
    }
    tracing::debug!(filter = ?store.filter(), "filter state applied");

    println!("Total depots:   {}", store.total());
    println!("Filter applied: {}", store.filtered_len());

    let mut engine = MapSyncEngine::new(ConsoleSurface::default(), store.handle());
    engine.sync();

    Ok(())
}

/// Drives the enricher while rendering its progress counter in place.
async fn enrich_with_progress(
    enricher: &BatchEnricher<GeocodeClient>,
    records: Vec<LocationRecord>,
) -> Vec<LocationRecord> {
    let mut progress = enricher.progress();
    let enrich = enricher.enrich(records);
    tokio::pin!(enrich);

    let enriched = loop {
        tokio::select! {
            result = &mut enrich => break result,
            changed = progress.changed() => {
                if changed.is_ok() {
                    let p = *progress.borrow_and_update();
                    if p.total > 0 {
                        print!("\r  geocoding... {}/{}", p.current, p.total);
                        let _ = std::io::stdout().flush();
                    }
                }
            }
        }
    };
    if progress.borrow().total > 0 {
        println!();
    }
    enriched
}

fn parse_filter_keys(raw: &[String]) -> anyhow::Result<BTreeSet<EquipmentKey>> {
    raw.iter()
        .map(|key| {
            key.parse::<EquipmentKey>().map_err(|_| {
                let known = MachineType::ALL
                    .iter()
                    .map(|m| m.key())
                    .collect::<Vec<_>>()
                    .join(", ");
                anyhow::anyhow!("unknown equipment key '{key}' (expected one of: {known}, other)")
            })
        })
        .collect()
}

/// Text rendition of the map surface: one line per marker, plus the fitted
/// viewport.
#[derive(Default)]
struct ConsoleSurface {
    markers: Vec<MarkerSpec>,
}

impl MapSurface for ConsoleSurface {
    fn clear_markers(&mut self) {
        self.markers.clear();
    }

    fn add_markers(&mut self, markers: Vec<MarkerSpec>) {
        for marker in &markers {
            println!(
                "  \u{2713} {:<30} ({:.6}, {:.6})",
                marker.name, marker.position.lat, marker.position.lng
            );
        }
        self.markers = markers;
    }

    fn open_popup(&mut self, popup: PopupSpec) {
        println!("  [{}] {}", popup.name, popup.address);
    }

    fn close_popup(&mut self) {}

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        println!(
            "Viewport: ({:.4}, {:.4}) .. ({:.4}, {:.4})",
            bounds.south, bounds.west, bounds.north, bounds.east
        );
    }
}
