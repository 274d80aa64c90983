//! HTTP client for the map provider's address-search REST endpoint.
//!
//! Wraps `reqwest` with provider-specific error handling, REST-key auth, and
//! typed response deserialization. The provider returns coordinates as
//! strings (`x` = longitude, `y` = latitude); parsing happens here so
//! downstream code only ever sees [`Coordinates`].

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use agrimap_core::Coordinates;

use crate::error::GeocodeError;
use crate::retry::retry_until_resolved;

const DEFAULT_BASE_URL: &str = "https://dapi.kakao.com";
const ADDRESS_SEARCH_PATH: &str = "/v2/local/search/address.json";

/// The seam between the concrete REST client and [`crate::BatchEnricher`].
///
/// `Ok(None)` is the expected not-found outcome; errors are reserved for
/// transport and response-shape failures.
pub trait Geocode {
    fn resolve(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Option<Coordinates>, GeocodeError>> + Send;
}

/// Client for the map provider's forward-geocoding REST API.
///
/// Use [`GeocodeClient::new`] for production or
/// [`GeocodeClient::with_base_url`] to point at a mock server in tests.
pub struct GeocodeClient {
    client: Client,
    rest_key: String,
    base_url: Url,
    max_retries: u32,
    retry_delay: Duration,
}

impl GeocodeClient {
    /// Creates a new client pointed at the production geocoding API.
    ///
    /// `max_retries` is the number of additional attempts after the first;
    /// `retry_delay_ms` the fixed pause between attempts.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        rest_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<Self, GeocodeError> {
        Self::with_base_url(
            rest_key,
            timeout_secs,
            max_retries,
            retry_delay_ms,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        rest_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        retry_delay_ms: u64,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("agrimap/0.1 (rental-map)")
            .build()?;

        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|_| GeocodeError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self {
            client,
            rest_key: rest_key.to_owned(),
            base_url,
            max_retries,
            retry_delay: Duration::from_millis(retry_delay_ms),
        })
    }

    /// Builds the address-search URL with the query percent-encoded.
    fn build_url(&self, address: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(ADDRESS_SEARCH_PATH);
        url.query_pairs_mut().append_pair("query", address);
        url
    }

    /// One search attempt: GET, assert 2xx, parse, take the first document.
    async fn address_search(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let url = self.build_url(address);
        let response = self
            .client
            .get(url.clone())
            .header("Authorization", format!("KakaoAK {}", self.rest_key))
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        let parsed: AddressSearchResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        let Some(doc) = parsed.documents.first() else {
            return Ok(None);
        };

        let lng: f64 = doc.x.trim().parse().map_err(|_| invalid_coordinate(doc, address))?;
        let lat: f64 = doc.y.trim().parse().map_err(|_| invalid_coordinate(doc, address))?;
        Ok(Some(Coordinates { lat, lng }))
    }
}

impl Geocode for GeocodeClient {
    /// Resolves a free-text address, retrying per the configured budget.
    ///
    /// Callers must not submit blank addresses; that screening is the
    /// enricher's job.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on a persistent transport failure.
    /// - [`GeocodeError::Deserialize`] / [`GeocodeError::InvalidCoordinate`]
    ///   on a malformed response (no retry).
    async fn resolve(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        retry_until_resolved(self.max_retries, self.retry_delay, || {
            self.address_search(address)
        })
        .await
    }
}

fn invalid_coordinate(doc: &AddressDocument, address: &str) -> GeocodeError {
    GeocodeError::InvalidCoordinate {
        x: doc.x.clone(),
        y: doc.y.clone(),
        context: address.to_owned(),
    }
}

/// Top-level response from the address-search endpoint.
#[derive(Debug, Deserialize)]
struct AddressSearchResponse {
    #[serde(default)]
    documents: Vec<AddressDocument>,
}

/// One match. The provider transports coordinates as strings: `x` is
/// longitude, `y` is latitude.
#[derive(Debug, Deserialize)]
struct AddressDocument {
    x: String,
    y: String,
}
