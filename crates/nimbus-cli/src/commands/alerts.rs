//! Alerts command - refresh and show active weather alerts.
//!
//! Alerts are never persisted; they arrive with every forecast bundle, so
//! this command refreshes the active location and shows the alerts from
//! that same fetch.

use anyhow::{bail, Result};

use nimbus_app::RefreshOutcome;

use crate::cli::{OutputArgs, OutputFormat};
use crate::config::Config;
use crate::format;

use super::{app_error, open_state, refresh_coordinator};

/// Execute the alerts command.
pub async fn cmd_alerts(
    output: &OutputArgs,
    api_key_flag: Option<&str>,
    config: &Config,
) -> Result<()> {
    let state = open_state(config)?;
    let coordinator = refresh_coordinator(config, api_key_flag)?;

    match coordinator.refresh_active(&state).await {
        RefreshOutcome::Refreshed => {}
        RefreshOutcome::AlreadyRunning => {
            println!("A refresh is already in flight; try again shortly.");
            return Ok(());
        }
        RefreshOutcome::Failed => {
            let Some(error) = state.last_error().await else {
                bail!("Refresh failed");
            };
            return Err(app_error(error));
        }
    }

    let alerts = state.alerts().await;

    if output.format == OutputFormat::Json {
        println!("{}", format::to_json(&alerts)?);
        return Ok(());
    }

    if alerts.is_empty() {
        println!("No active weather alerts.");
        return Ok(());
    }

    print!("{}", format::format_alerts_text(&alerts)?);
    Ok(())
}
