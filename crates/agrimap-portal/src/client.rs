//! HTTP client for the portal REST API.
//!
//! The bulk rental-location feed is anonymous; the favorites endpoints take
//! a bearer token per call — the client itself holds no session state.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Client, StatusCode, Url};

use agrimap_core::LocationRecord;

use crate::error::PortalError;
use crate::types::FavoriteEntry;

/// Characters escaped when a depot name is embedded as a path segment.
/// Depot names routinely contain spaces and Hangul.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Client for the portal REST API.
pub struct PortalClient {
    client: Client,
    base_url: Url,
}

impl PortalClient {
    /// Creates a new client for the portal at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PortalError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PortalError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|_| PortalError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self { client, base_url })
    }

    /// Fetches the bulk rental-location feed.
    ///
    /// # Errors
    ///
    /// - [`PortalError::Http`] on network failure or non-2xx status.
    /// - [`PortalError::Deserialize`] if the body does not match the
    ///   expected array shape.
    pub async fn rental_locations(&self) -> Result<Vec<LocationRecord>, PortalError> {
        let url = self.endpoint("/api/map/rental-locations");
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        let records: Vec<LocationRecord> =
            serde_json::from_str(&body).map_err(|e| PortalError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;
        tracing::info!(count = records.len(), "fetched rental locations");
        Ok(records)
    }

    /// Fetches the signed-in user's full favorites list.
    ///
    /// # Errors
    ///
    /// - [`PortalError::Http`] on network failure or non-2xx status
    ///   (including 401 for a stale token).
    /// - [`PortalError::Deserialize`] on an unexpected body shape.
    pub async fn favorite_list(&self, token: &str) -> Result<Vec<FavoriteEntry>, PortalError> {
        let url = self.endpoint("/api/favorite/list");
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(token)
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PortalError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Adds one favorites row.
    ///
    /// # Errors
    ///
    /// - [`PortalError::AlreadyFavorited`] on the portal's 409.
    /// - [`PortalError::Http`] on network failure or other non-2xx status.
    pub async fn favorite_add(&self, token: &str, entry: &FavoriteEntry) -> Result<(), PortalError> {
        let url = self.endpoint("/api/favorite/add");
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(entry)
            .send()
            .await?;
        if response.status() == StatusCode::CONFLICT {
            return Err(PortalError::AlreadyFavorited {
                item_id: entry.item_id.clone(),
            });
        }
        response.error_for_status()?;
        Ok(())
    }

    /// Removes one favorites row by kind and item id.
    ///
    /// # Errors
    ///
    /// - [`PortalError::NotFavorited`] on the portal's 404.
    /// - [`PortalError::Http`] on network failure or other non-2xx status.
    pub async fn favorite_remove(
        &self,
        token: &str,
        kind: &str,
        item_id: &str,
    ) -> Result<(), PortalError> {
        let encoded_kind = utf8_percent_encode(kind, PATH_SEGMENT);
        let encoded_id = utf8_percent_encode(item_id, PATH_SEGMENT);
        let url = self.endpoint(&format!("/api/favorite/remove/{encoded_kind}/{encoded_id}"));
        let response = self.client.delete(url).bearer_auth(token).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(PortalError::NotFavorited {
                item_id: item_id.to_owned(),
            });
        }
        response.error_for_status()?;
        Ok(())
    }

    /// Base URL with `path` (already percent-encoded where needed) appended.
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> PortalClient {
        PortalClient::new(base_url, 30, "agrimap/0.1 (test)")
            .expect("client construction should not fail")
    }

    #[test]
    fn endpoint_joins_path_onto_base() {
        let client = test_client("http://localhost:8000");
        let url = client.endpoint("/api/map/rental-locations");
        assert_eq!(url.as_str(), "http://localhost:8000/api/map/rental-locations");
    }

    #[test]
    fn endpoint_strips_trailing_slash_from_base() {
        let client = test_client("http://localhost:8000/");
        let url = client.endpoint("/api/favorite/list");
        assert_eq!(url.as_str(), "http://localhost:8000/api/favorite/list");
    }

    #[test]
    fn removal_path_percent_encodes_the_depot_name() {
        let encoded = utf8_percent_encode("Aewol Depot #2", PATH_SEGMENT).to_string();
        assert_eq!(encoded, "Aewol%20Depot%20%232");
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = PortalClient::new("not a url", 30, "agrimap/0.1 (test)");
        assert!(matches!(result, Err(PortalError::InvalidBaseUrl(_))));
    }
}
