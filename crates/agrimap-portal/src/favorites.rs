//! Per-selection favorite state reconciliation.

use agrimap_core::LocationRecord;

use crate::client::PortalClient;
use crate::error::FavoriteError;
use crate::types::{FavoriteEntry, FAVORITE_KIND_RENTAL};

/// Favorite membership of the currently selected depot.
///
/// Transitions: `Unknown → Checking → {Favorited, NotFavorited}` on
/// selection, then `Favorited ⇄ NotFavorited` via confirmed toggles only.
/// A failed toggle leaves the state untouched; a new selection always
/// restarts at `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteState {
    Unknown,
    Checking,
    Favorited,
    NotFavorited,
}

/// Reconciles the selected depot's favorite membership against the portal.
///
/// Holds the ambient bearer token (absent for an anonymous session) and the
/// cached membership boolean for the current selection; the server remains
/// the source of truth — the cache flips only after a confirmed write.
pub struct FavoriteReconciler {
    token: Option<String>,
    selected: Option<LocationRecord>,
    state: FavoriteState,
}

impl FavoriteReconciler {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            token,
            selected: None,
            state: FavoriteState::Unknown,
        }
    }

    #[must_use]
    pub fn state(&self) -> FavoriteState {
        self.state
    }

    #[must_use]
    pub fn selected(&self) -> Option<&LocationRecord> {
        self.selected.as_ref()
    }

    /// Selects a depot and refreshes its membership from the portal.
    ///
    /// Anonymous sessions make no request and settle at `NotFavorited`.
    /// A failed membership check also settles at `NotFavorited` — the safe
    /// default, since an add from there is deduplicated server-side — and
    /// surfaces the error without affecting anything else (the map keeps
    /// rendering).
    ///
    /// # Errors
    ///
    /// Returns [`FavoriteError::Portal`] when the membership fetch fails.
    pub async fn select(
        &mut self,
        client: &PortalClient,
        record: LocationRecord,
    ) -> Result<FavoriteState, FavoriteError> {
        let name = record.name.clone();
        self.selected = Some(record);
        self.state = FavoriteState::Unknown;

        let Some(token) = self.token.clone() else {
            self.state = FavoriteState::NotFavorited;
            return Ok(self.state);
        };

        self.state = FavoriteState::Checking;
        match client.favorite_list(&token).await {
            Ok(list) => {
                let favorited = list.iter().any(|f| f.is_rental(&name));
                self.state = if favorited {
                    FavoriteState::Favorited
                } else {
                    FavoriteState::NotFavorited
                };
                Ok(self.state)
            }
            Err(err) => {
                tracing::warn!(depot = %name, error = %err, "favorite membership check failed");
                self.state = FavoriteState::NotFavorited;
                Err(err.into())
            }
        }
    }

    /// Toggles the selected depot's membership, returning the new state
    /// (`true` = now favorited).
    ///
    /// The cached state flips only after the portal confirms the write; any
    /// failure leaves it unchanged. Anonymous sessions are rejected before
    /// a request is made — the caller routes them to sign-in.
    ///
    /// # Errors
    ///
    /// - [`FavoriteError::SignInRequired`] without a bearer token.
    /// - [`FavoriteError::NothingSelected`] without a selection.
    /// - [`FavoriteError::Portal`] when the portal rejects the write.
    pub async fn toggle(&mut self, client: &PortalClient) -> Result<bool, FavoriteError> {
        let Some(token) = self.token.clone() else {
            return Err(FavoriteError::SignInRequired);
        };
        let record = self
            .selected
            .clone()
            .ok_or(FavoriteError::NothingSelected)?;

        if self.state == FavoriteState::Favorited {
            client
                .favorite_remove(&token, FAVORITE_KIND_RENTAL, &record.name)
                .await?;
            self.state = FavoriteState::NotFavorited;
            tracing::info!(depot = %record.name, "favorite removed");
            Ok(false)
        } else {
            let entry = FavoriteEntry::rental(&record.name, &record.address);
            client.favorite_add(&token, &entry).await?;
            self.state = FavoriteState::Favorited;
            tracing::info!(depot = %record.name, "favorite added");
            Ok(true)
        }
    }
}
