//! Current command - show cached current conditions.

use anyhow::{bail, Result};

use crate::cli::{OutputArgs, OutputFormat};
use crate::config::Config;
use crate::format::{self, FormatOptions};

use super::{active_location, open_state};

/// Execute the current command.
pub async fn cmd_current(output: &OutputArgs, config: &Config) -> Result<()> {
    let state = open_state(config)?;
    let location = active_location(&state).await?;

    let record = {
        let store = state.store.lock().await;
        store.current_weather(location.id)?
    };

    let Some(record) = record else {
        bail!(
            "No cached weather for {}. Run 'nimbus refresh' first.",
            location.name
        );
    };

    if output.format == OutputFormat::Json {
        println!("{}", format::to_json(&record)?);
        return Ok(());
    }

    let opts = FormatOptions::resolve(output, state.settings());
    print!("{}", format::format_current_text(&location, &record, &opts)?);

    Ok(())
}
