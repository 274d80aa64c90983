//! Forward geocoding for rental-depot addresses.
//!
//! [`GeocodeClient`] wraps the map provider's address-search REST endpoint
//! with a fixed-delay retry budget; [`BatchEnricher`] drives it over a bulk
//! depot list in fixed-size concurrent batches with inter-batch pacing,
//! reporting progress through a watch channel.

mod batch;
mod client;
mod error;
mod retry;

pub use batch::{BatchEnricher, EnrichProgress};
pub use client::{Geocode, GeocodeClient};
pub use error::GeocodeError;
