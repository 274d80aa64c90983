use thiserror::Error;

/// Errors returned by the portal REST client.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Network or TLS failure, or a non-2xx HTTP status, from the underlying
    /// HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The portal rejected an add because the item is already favorited.
    #[error("already favorited: {item_id}")]
    AlreadyFavorited { item_id: String },

    /// The portal rejected a removal because the item is not favorited.
    #[error("not favorited: {item_id}")]
    NotFavorited { item_id: String },

    /// The configured base URL is not a valid URL.
    #[error("invalid portal base URL '{0}'")]
    InvalidBaseUrl(String),
}

/// Errors surfaced by the favorite reconciler.
#[derive(Debug, Error)]
pub enum FavoriteError {
    /// Favorite actions require a signed-in session; rejected client-side
    /// before any request is made.
    #[error("sign-in required for favorite actions")]
    SignInRequired,

    /// No depot is currently selected.
    #[error("no depot selected")]
    NothingSelected,

    #[error(transparent)]
    Portal(#[from] PortalError),
}
