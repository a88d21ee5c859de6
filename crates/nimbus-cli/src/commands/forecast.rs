//! Forecast commands - show the cached hourly and daily forecasts.

use anyhow::{bail, Result};

use nimbus_store::ForecastQuery;
use nimbus_types::ForecastKind;

use crate::cli::{OutputArgs, OutputFormat};
use crate::config::Config;
use crate::format::{self, FormatOptions};

use super::{active_location, open_state};

/// Execute the hourly command.
pub async fn cmd_hourly(hours: u32, output: &OutputArgs, config: &Config) -> Result<()> {
    let state = open_state(config)?;
    let location = active_location(&state).await?;

    let records = {
        let store = state.store.lock().await;
        store.query_forecasts(
            &ForecastQuery::new()
                .location(location.id)
                .kind(ForecastKind::Hourly)
                .limit(hours),
        )?
    };

    if records.is_empty() {
        bail!(
            "No cached forecast for {}. Run 'nimbus refresh' first.",
            location.name
        );
    }

    if output.format == OutputFormat::Json {
        println!("{}", format::to_json(&records)?);
        return Ok(());
    }

    let opts = FormatOptions::resolve(output, state.settings());
    println!("Hourly forecast for {}:\n", location.name);
    print!("{}", format::format_hourly_text(&records, &opts)?);

    Ok(())
}

/// Execute the daily command.
pub async fn cmd_daily(output: &OutputArgs, config: &Config) -> Result<()> {
    let state = open_state(config)?;
    let location = active_location(&state).await?;

    let records = {
        let store = state.store.lock().await;
        store.daily_forecast(location.id)?
    };

    if records.is_empty() {
        bail!(
            "No cached forecast for {}. Run 'nimbus refresh' first.",
            location.name
        );
    }

    if output.format == OutputFormat::Json {
        println!("{}", format::to_json(&records)?);
        return Ok(());
    }

    let opts = FormatOptions::resolve(output, state.settings());
    println!("Daily forecast for {}:\n", location.name);
    print!("{}", format::format_daily_text(&records, &opts)?);

    Ok(())
}
