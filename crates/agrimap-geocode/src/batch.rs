//! Batched coordinate enrichment for the bulk depot list.
//!
//! Most records in the upstream feed arrive without coordinates, and the
//! geocoding quota is shared — so resolution runs in fixed-size concurrent
//! batches with a pause between batches, bounding load while keeping overall
//! latency sub-linear in record count.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;

use agrimap_core::{Coordinates, LocationRecord};

use crate::client::Geocode;

const DEFAULT_BATCH_SIZE: usize = 5;
const DEFAULT_INTER_BATCH_DELAY_MS: u64 = 200;

/// Monotonic progress counter for one enrichment run: `current` advances
/// once per record attempt, resolved or not. Observability only — consumers
/// render it, nothing branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnrichProgress {
    pub current: usize,
    pub total: usize,
}

/// Drives a [`Geocode`] implementation over a depot list, attaching
/// coordinates to every record that lacks them and can be resolved.
pub struct BatchEnricher<G> {
    geocoder: G,
    batch_size: usize,
    inter_batch_delay: Duration,
    progress_tx: watch::Sender<EnrichProgress>,
}

impl<G: Geocode + Sync> BatchEnricher<G> {
    /// Enricher with production pacing: batches of 5, 200 ms between batches.
    pub fn new(geocoder: G) -> Self {
        Self::with_pacing(geocoder, DEFAULT_BATCH_SIZE, DEFAULT_INTER_BATCH_DELAY_MS)
    }

    /// Enricher with explicit pacing. `batch_size` is clamped to at least 1.
    pub fn with_pacing(geocoder: G, batch_size: usize, inter_batch_delay_ms: u64) -> Self {
        let (progress_tx, _) = watch::channel(EnrichProgress::default());
        Self {
            geocoder,
            batch_size: batch_size.max(1),
            inter_batch_delay: Duration::from_millis(inter_batch_delay_ms),
            progress_tx,
        }
    }

    /// Subscribe to live progress for the next [`enrich`](Self::enrich) run.
    #[must_use]
    pub fn progress(&self) -> watch::Receiver<EnrichProgress> {
        self.progress_tx.subscribe()
    }

    /// Enriches `records` in place and returns the full list.
    ///
    /// Records that already carry coordinates pass through untouched — a
    /// fully-geocoded input performs zero geocoder calls. The remainder is
    /// processed in batches: all resolves within a batch run concurrently
    /// and the batch is a join point; no record of batch N+1 starts
    /// resolving before every record of batch N has settled. Between
    /// batches the enricher pauses for the configured delay (never after
    /// the last batch).
    ///
    /// Blank addresses are never submitted to the geocoder but still
    /// advance the progress counter. A failed resolve is logged and leaves
    /// its record coordinate-less; it never aborts the batch or the run.
    pub async fn enrich(&self, mut records: Vec<LocationRecord>) -> Vec<LocationRecord> {
        let pending: Vec<(String, String)> = records
            .iter()
            .filter(|r| r.needs_geocoding())
            .map(|r| (r.name.clone(), r.address.clone()))
            .collect();

        let total = pending.len();
        self.progress_tx
            .send_replace(EnrichProgress { current: 0, total });

        if total == 0 {
            return records;
        }

        tracing::info!(total, "geocoding depots without coordinates");

        let attempted = AtomicUsize::new(0);
        for (batch_index, batch) in pending.chunks(self.batch_size).enumerate() {
            if batch_index > 0 && !self.inter_batch_delay.is_zero() {
                tokio::time::sleep(self.inter_batch_delay).await;
            }

            let resolutions: Vec<(&str, Option<Coordinates>)> =
                join_all(batch.iter().map(|(name, address)| {
                    let attempted = &attempted;
                    async move {
                        let coords = self.resolve_one(name, address).await;
                        let current = attempted.fetch_add(1, Ordering::SeqCst) + 1;
                        self.progress_tx
                            .send_replace(EnrichProgress { current, total });
                        (name.as_str(), coords)
                    }
                }))
                .await;

            for (name, coords) in resolutions {
                let Some(coords) = coords else { continue };
                // First match wins: the feed keys depots by display name.
                if let Some(record) = records.iter_mut().find(|r| r.name == name) {
                    record.attach_coordinates(coords);
                }
            }
        }

        let resolved = records.iter().filter(|r| r.coordinates().is_some()).count();
        tracing::info!(total, resolved, "geocoding pass complete");

        records
    }

    async fn resolve_one(&self, name: &str, address: &str) -> Option<Coordinates> {
        if address.trim().is_empty() {
            tracing::debug!(depot = name, "blank address — skipping geocode");
            return None;
        }
        match self.geocoder.resolve(address).await {
            Ok(Some(coords)) => Some(coords),
            Ok(None) => {
                tracing::debug!(depot = name, "address did not resolve");
                None
            }
            Err(err) => {
                tracing::warn!(depot = name, error = %err, "geocoding failed");
                None
            }
        }
    }
}
