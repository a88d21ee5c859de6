//! Location management commands - list, add, use, favorite, remove.

use anyhow::{bail, Context, Result};

use nimbus_app::LocationCoordinator;

use crate::cli::{OutputArgs, OutputFormat};
use crate::config::Config;
use crate::format;

use super::{app_error, geocoding_client, open_state};

/// Execute the locations command.
pub async fn cmd_locations(output: &OutputArgs, config: &Config) -> Result<()> {
    let state = open_state(config)?;
    let locations = {
        let store = state.store.lock().await;
        store.list_locations()?
    };

    if output.format == OutputFormat::Json {
        println!("{}", format::to_json(&locations)?);
        return Ok(());
    }

    if locations.is_empty() {
        println!("No saved locations. Add one with 'nimbus add <place>'.");
        return Ok(());
    }

    println!("Saved locations:\n");
    print!("{}", format::format_locations_text(&locations));

    Ok(())
}

/// Execute the add command: search and save one candidate.
pub async fn cmd_add(
    query: &str,
    pick: usize,
    set_using: bool,
    api_key_flag: Option<&str>,
    config: &Config,
) -> Result<()> {
    if pick == 0 {
        bail!("--pick is 1-based; use 1 for the first result");
    }

    let state = open_state(config)?;
    let coordinator = LocationCoordinator::new(geocoding_client(config, api_key_flag)?);

    let candidates = coordinator.search(query).await.map_err(app_error)?;
    if candidates.is_empty() {
        bail!("No locations found. Try searching with a different name or check your spelling.");
    }

    let Some(candidate) = candidates.get(pick - 1) else {
        bail!(
            "Only {} result(s) for '{}'; cannot pick #{}",
            candidates.len(),
            query,
            pick
        );
    };

    let location = coordinator
        .add_candidate(&state, candidate, set_using)
        .await
        .map_err(app_error)?;

    if set_using {
        println!(
            "{} is now the active location. Run 'nimbus refresh' to fetch weather.",
            location.name
        );
    } else {
        println!("Added {} to favorites.", location.name);
    }

    Ok(())
}

/// Execute the use command.
pub async fn cmd_use(id: i64, config: &Config) -> Result<()> {
    let state = open_state(config)?;

    let name = {
        let store = state.store.lock().await;
        store.set_using(id).context("Failed to set location")?;
        store
            .get_location(id)?
            .map(|l| l.name)
            .unwrap_or_else(|| id.to_string())
    };

    println!(
        "{} is now the active location. Run 'nimbus refresh' to fetch weather.",
        name
    );
    Ok(())
}

/// Execute the favorite command.
pub async fn cmd_favorite(id: i64, remove: bool, config: &Config) -> Result<()> {
    let state = open_state(config)?;

    let name = {
        let store = state.store.lock().await;
        store
            .set_favorite(id, !remove)
            .context("Failed to update favorites")?;
        store
            .get_location(id)?
            .map(|l| l.name)
            .unwrap_or_else(|| id.to_string())
    };

    if remove {
        println!("Removed {} from favorites.", name);
    } else {
        println!("Added {} to favorites.", name);
    }
    Ok(())
}

/// Execute the remove command.
pub async fn cmd_remove(id: i64, config: &Config) -> Result<()> {
    let state = open_state(config)?;

    {
        let store = state.store.lock().await;
        let Some(location) = store.get_location(id)? else {
            bail!("No location with ID {}. See 'nimbus locations'.", id);
        };
        store
            .delete_location(id)
            .context("Failed to delete location")?;
        println!("Deleted {} and its cached weather.", location.name);
    }

    Ok(())
}
