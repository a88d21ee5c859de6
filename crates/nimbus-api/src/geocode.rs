//! Geocoding API client.
//!
//! Forward search maps a free-text place name to a small ranked candidate
//! list; reverse lookup maps a coordinate pair back to a place name for
//! labeling the device location. Candidate order is whatever the upstream
//! service returns; Nimbus never re-ranks.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use nimbus_types::{Coordinates, GeoCandidate};

use crate::error::{normalize_base_url, Error, Result};

/// Default base URL for the geocoding service.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Default number of candidates returned by a search.
pub const DEFAULT_SEARCH_LIMIT: u32 = 5;

/// Request timeout for geocoding lookups.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the geocoding API.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeocodingClient {
    /// Create a client against the default service URL.
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::invalid_config("geocoding API key must not be empty"));
        }

        let base_url = normalize_base_url(base_url)?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::invalid_config(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    /// Search for locations matching a free-text query.
    ///
    /// A blank or whitespace-only query short-circuits to an empty result
    /// without touching the network.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<GeoCandidate>> {
        if query.trim().is_empty() {
            tracing::debug!("Skipping geocoding search for blank query");
            return Ok(Vec::new());
        }

        let url = format!("{}/geo/1.0/direct", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query.to_string()),
                ("limit", limit.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| Error::from_reqwest(&url, e))?;

        let candidates: Vec<CandidateWire> = handle_response(response).await?;
        Ok(candidates.into_iter().map(CandidateWire::into_candidate).collect())
    }

    /// Resolve a coordinate pair to its nearest named place, if any.
    ///
    /// Used to label the device location after a position lookup.
    pub async fn reverse(&self, coordinates: Coordinates) -> Result<Option<GeoCandidate>> {
        let url = format!("{}/geo/1.0/reverse", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("limit", "1".to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| Error::from_reqwest(&url, e))?;

        let mut candidates: Vec<CandidateWire> = handle_response(response).await?;
        Ok(if candidates.is_empty() {
            None
        } else {
            Some(candidates.remove(0).into_candidate())
        })
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| Error::Decode(e.to_string()))
    } else {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        Err(Error::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CandidateWire {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
    state: Option<String>,
}

impl CandidateWire {
    fn into_candidate(self) -> GeoCandidate {
        GeoCandidate {
            name: self.name,
            latitude: self.lat,
            longitude: self.lon,
            country: self.country,
            state: self.state,
        }
    }
}
