//! REST client for the farm-machinery portal and the favorite-state
//! reconciler built on it.
//!
//! The portal serves the bulk rental-location feed anonymously and the
//! favorites endpoints behind a bearer token. [`FavoriteReconciler`] drives
//! the per-selection favorite state machine; [`InactivityTimer`] is the
//! single-owner auto-logout deadline held by the session controller.

mod client;
mod error;
mod favorites;
mod session;
mod types;

pub use client::PortalClient;
pub use error::{FavoriteError, PortalError};
pub use favorites::{FavoriteReconciler, FavoriteState};
pub use session::InactivityTimer;
pub use types::{FavoriteEntry, FAVORITE_KIND_RENTAL};
