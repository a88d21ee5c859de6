//! Device position discovery.
//!
//! A one-shot lookup of where the device currently is, used only by the
//! first-launch bootstrap to seed the active location. The cache layer never
//! calls this. The production implementation geolocates by public IP address,
//! which needs no permissions and works headless; platforms with a real
//! positioning service can provide their own [`PositionProvider`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use nimbus_types::Coordinates;

use crate::error::{normalize_base_url, Error, Result};

/// Default base URL for the IP geolocation service.
pub const DEFAULT_BASE_URL: &str = "https://ipapi.co";

/// Request timeout for position lookups.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A resolved device position.
#[derive(Debug, Clone, PartialEq)]
pub struct DevicePosition {
    /// The coordinate pair.
    pub coordinates: Coordinates,
    /// Place name, if the lookup produced one.
    pub name: Option<String>,
    /// Country name or code, if the lookup produced one.
    pub country: Option<String>,
}

/// A source of one-shot device positions.
#[async_trait]
pub trait PositionProvider: Send + Sync {
    /// Resolve the device's current position.
    async fn locate(&self) -> Result<DevicePosition>;
}

/// IP-geolocation position provider.
///
/// Accuracy is city-level at best, which is plenty for seeding a weather
/// location.
#[derive(Debug, Clone)]
pub struct IpPositionProvider {
    client: Client,
    base_url: String,
}

impl IpPositionProvider {
    /// Create a provider against the default service URL.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a provider against a custom base URL.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::invalid_config(e.to_string()))?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl PositionProvider for IpPositionProvider {
    async fn locate(&self) -> Result<DevicePosition> {
        let url = format!("{}/json/", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(Error::Status {
                status: status.as_u16(),
                message,
            });
        }

        let wire: IpLookupWire = response
            .json()
            .await
            .map_err(|e| Error::Decode(e.to_string()))?;

        let (Some(latitude), Some(longitude)) = (wire.latitude, wire.longitude) else {
            return Err(Error::Decode(
                "position service returned no coordinates".to_string(),
            ));
        };

        let position = DevicePosition {
            coordinates: Coordinates::new(latitude, longitude),
            name: wire.city,
            country: wire.country_name,
        };

        tracing::info!(
            "Resolved device position: {} ({})",
            position.name.as_deref().unwrap_or("unnamed"),
            position.coordinates
        );

        Ok(position)
    }
}

#[derive(Debug, Deserialize)]
struct IpLookupWire {
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
    country_name: Option<String>,
}

/// A fixed-position provider for tests and offline use.
#[derive(Debug, Clone)]
pub struct MockPositionProvider {
    position: Option<DevicePosition>,
}

impl MockPositionProvider {
    /// A provider that always resolves to the given position.
    pub fn fixed(position: DevicePosition) -> Self {
        Self {
            position: Some(position),
        }
    }

    /// A provider that always fails, for exercising the unavailable path.
    pub fn unavailable() -> Self {
        Self { position: None }
    }
}

#[async_trait]
impl PositionProvider for MockPositionProvider {
    async fn locate(&self) -> Result<DevicePosition> {
        self.position.clone().ok_or(Error::Connect {
            url: "mock".to_string(),
            message: "position service unavailable".to_string(),
        })
    }
}
