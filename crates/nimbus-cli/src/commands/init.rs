//! Init command - first-launch setup.
//!
//! Detects the device position, seeds the active location (reusing a nearby
//! saved one when present), then prefetches weather for every saved
//! location. A failed position lookup is reported but does not stop the
//! prefetch; each location's refresh is isolated.

use anyhow::Result;

use nimbus_app::LocationCoordinator;

use crate::config::Config;

use super::{geocoding_client, open_state, position_provider, refresh_coordinator};

/// Execute the init command.
pub async fn cmd_init(api_key_flag: Option<&str>, config: &Config, quiet: bool) -> Result<()> {
    let state = open_state(config)?;
    let coordinator = LocationCoordinator::new(geocoding_client(config, api_key_flag)?);
    let provider = position_provider(config)?;

    match coordinator.bootstrap(&state, &provider).await {
        Ok(Some(location)) => {
            if !quiet {
                println!("Active location: {}", location.name);
            }
        }
        Ok(None) => {
            if !quiet {
                println!("Active location already configured, skipping position lookup.");
            }
        }
        Err(error) => {
            // Continue: weather can still be prefetched for saved locations
            eprintln!("Warning: {} ({})", error.message, error.hint);
        }
    }

    let refresher = refresh_coordinator(config, api_key_flag)?;
    match refresher.refresh_all(&state).await {
        Some(refreshed) => {
            if !quiet {
                println!("Prefetched weather for {} location(s).", refreshed);
            }
        }
        None => println!("A refresh is already in flight; skipping prefetch."),
    }

    Ok(())
}
