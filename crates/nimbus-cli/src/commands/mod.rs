//! Command implementations for the CLI.

mod alerts;
mod current;
mod forecast;
mod init;
mod locations;
mod refresh;
mod search;
mod settings;

pub use alerts::cmd_alerts;
pub use current::cmd_current;
pub use forecast::{cmd_daily, cmd_hourly};
pub use init::cmd_init;
pub use locations::{cmd_add, cmd_favorite, cmd_locations, cmd_remove, cmd_use};
pub use refresh::cmd_refresh;
pub use search::cmd_search;
pub use settings::cmd_settings;

use std::sync::Arc;

use anyhow::{bail, Context, Result};

use nimbus_api::{GeocodingClient, IpPositionProvider, WeatherClient};
use nimbus_app::{AppError, AppState, CacheRepository, RefreshCoordinator};
use nimbus_store::{Store, StoredLocation};

use crate::config::{resolve_api_key, Config};

/// Open the store and wrap it in application state.
pub(crate) fn open_state(config: &Config) -> Result<Arc<AppState>> {
    let store = Store::open(config.db_path()).context("Failed to open database")?;
    Ok(AppState::new(store))
}

/// Build the weather client, honoring a base URL override.
pub(crate) fn weather_client(config: &Config, api_key_flag: Option<&str>) -> Result<WeatherClient> {
    let api_key = resolve_api_key(api_key_flag, config)?;
    let client = match &config.weather_url {
        Some(url) => WeatherClient::with_base_url(&api_key, url)?,
        None => WeatherClient::new(&api_key)?,
    };
    Ok(client)
}

/// Build the geocoding client, honoring a base URL override.
pub(crate) fn geocoding_client(
    config: &Config,
    api_key_flag: Option<&str>,
) -> Result<GeocodingClient> {
    let api_key = resolve_api_key(api_key_flag, config)?;
    let client = match &config.geocoding_url {
        Some(url) => GeocodingClient::with_base_url(&api_key, url)?,
        None => GeocodingClient::new(&api_key)?,
    };
    Ok(client)
}

/// Build the IP position provider, honoring a base URL override.
pub(crate) fn position_provider(config: &Config) -> Result<IpPositionProvider> {
    let provider = match &config.position_url {
        Some(url) => IpPositionProvider::with_base_url(url)?,
        None => IpPositionProvider::new()?,
    };
    Ok(provider)
}

/// Build the refresh coordinator.
pub(crate) fn refresh_coordinator(
    config: &Config,
    api_key_flag: Option<&str>,
) -> Result<RefreshCoordinator> {
    let client = weather_client(config, api_key_flag)?;
    Ok(RefreshCoordinator::new(CacheRepository::new(client)))
}

/// Convert a classified error into a CLI error with its hint attached.
pub(crate) fn app_error(error: AppError) -> anyhow::Error {
    anyhow::anyhow!("{}\n  {}", error.message, error.hint)
}

/// The active location, or a helpful error when none is configured.
pub(crate) async fn active_location(state: &AppState) -> Result<StoredLocation> {
    let store = state.store.lock().await;
    match store.using_location()? {
        Some(location) => Ok(location),
        None => bail!(
            "No location selected. Add one with 'nimbus add <place> --use' or run 'nimbus init'."
        ),
    }
}
