//! Refresh command - fetch fresh weather into the cache.

use anyhow::{bail, Result};

use nimbus_app::RefreshOutcome;

use crate::config::Config;

use super::{app_error, open_state, refresh_coordinator};

/// Execute the refresh command.
pub async fn cmd_refresh(
    all: bool,
    api_key_flag: Option<&str>,
    config: &Config,
    quiet: bool,
) -> Result<()> {
    let state = open_state(config)?;
    let coordinator = refresh_coordinator(config, api_key_flag)?;

    if all {
        match coordinator.refresh_all(&state).await {
            Some(refreshed) => {
                if !quiet {
                    println!("Refreshed weather for {} location(s).", refreshed);
                }
            }
            None => println!("A refresh is already in flight; nothing to do."),
        }
        return Ok(());
    }

    match coordinator.refresh_active(&state).await {
        RefreshOutcome::Refreshed => {
            let alerts = state.alerts().await;
            let store = state.store.lock().await;
            let location = store.using_location()?;
            let name = location.map(|l| l.name).unwrap_or_default();

            if !quiet {
                println!("Refreshed weather for {}.", name);
                if !alerts.is_empty() {
                    println!(
                        "{} active alert(s). See 'nimbus alerts'.",
                        alerts.len()
                    );
                }
            }
            Ok(())
        }
        RefreshOutcome::AlreadyRunning => {
            println!("A refresh is already in flight; nothing to do.");
            Ok(())
        }
        RefreshOutcome::Failed => {
            let Some(error) = state.last_error().await else {
                bail!("Refresh failed");
            };
            Err(app_error(error))
        }
    }
}
