//! Weather cache repository.
//!
//! One operation: fetch a forecast bundle for a location and replace its
//! cached rows. The fetch happens before any destructive write, so a failed
//! request leaves the previous cache fully intact.

use tokio::sync::Mutex;
use tracing::debug;

use nimbus_api::WeatherClient;
use nimbus_store::Store;
use nimbus_types::{Coordinates, WeatherAlert};

use crate::classify::RawFailure;

/// Fetches forecasts and maintains the cached rows for each location.
#[derive(Debug, Clone)]
pub struct CacheRepository {
    client: WeatherClient,
}

impl CacheRepository {
    /// Create a repository around a weather client.
    pub fn new(client: WeatherClient) -> Self {
        Self { client }
    }

    /// Refresh the cached weather for one location.
    ///
    /// Fetches the full bundle, replaces every cached row for the location
    /// in one transaction, and returns the bundle's alerts for immediate
    /// display (alerts are never persisted). Any fetch failure aborts
    /// before the delete, leaving the existing cache untouched.
    pub async fn refresh(
        &self,
        store: &Mutex<Store>,
        location_id: i64,
        coordinates: Coordinates,
    ) -> Result<Vec<WeatherAlert>, RawFailure> {
        let bundle = self.client.fetch_forecast(coordinates).await?;

        debug!(
            "Fetched bundle for location {}: {} hourly, {} daily, {} alerts",
            location_id,
            bundle.hourly.len(),
            bundle.daily.len(),
            bundle.alerts.len()
        );

        {
            let store = store.lock().await;
            store.replace_forecasts(location_id, &bundle)?;
        }

        Ok(bundle.alerts)
    }
}
