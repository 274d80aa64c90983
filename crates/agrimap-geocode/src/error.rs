use thiserror::Error;

/// Errors returned by the geocoding client.
///
/// An unresolvable address is NOT an error — [`crate::GeocodeClient::resolve`]
/// returns `Ok(None)` for that expected outcome.
#[derive(Debug, Error)]
pub enum GeocodeError {
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

    /// The geocoder returned a document whose coordinate strings do not
    /// parse as floating point.
    #[error("unparsable coordinate pair (x={x}, y={y}) for {context}")]
    InvalidCoordinate {
        x: String,
        y: String,
        context: String,
    },

    /// The configured base URL is not a valid URL.
    #[error("invalid geocoder base URL '{0}'")]
    InvalidBaseUrl(String),
}
