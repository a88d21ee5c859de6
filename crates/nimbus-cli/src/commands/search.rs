//! Search command - find locations by name.

use anyhow::Result;

use nimbus_app::classify;

use crate::cli::{OutputArgs, OutputFormat};
use crate::config::Config;
use crate::format;

use super::{app_error, geocoding_client};

/// Execute the search command.
pub async fn cmd_search(
    query: &str,
    limit: u32,
    output: &OutputArgs,
    api_key_flag: Option<&str>,
    config: &Config,
) -> Result<()> {
    let client = geocoding_client(config, api_key_flag)?;

    let candidates = client
        .search(query, limit)
        .await
        .map_err(|e| app_error(classify(e.into())))?;

    if output.format == OutputFormat::Json {
        println!("{}", format::to_json(&candidates)?);
        return Ok(());
    }

    if candidates.is_empty() {
        println!("No locations found. Try searching with a different name or check your spelling.");
        return Ok(());
    }

    println!("Search results for '{}':\n", query);
    print!("{}", format::format_candidates_text(&candidates));
    println!("\nAdd one with 'nimbus add \"{}\" --pick <n>'.", query);

    Ok(())
}
