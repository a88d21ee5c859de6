//! Command-line interface for the Nimbus weather forecast app.
//!
//! Fetches forecasts for saved locations, caches them locally for offline
//! display, and manages the location set and display units.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `search` | Search for locations by name |
//! | `add` | Save a location from search results |
//! | `locations` | List saved locations |
//! | `use` | Switch the active forecast target |
//! | `favorite` | Add or remove a favorite |
//! | `remove` | Delete a saved location |
//! | `refresh` | Fetch fresh weather into the cache |
//! | `current` | Show cached current conditions |
//! | `hourly` | Show the cached hourly forecast |
//! | `daily` | Show the cached daily forecast |
//! | `alerts` | Refresh and show active weather alerts |
//! | `init` | First-launch setup from the device position |
//! | `settings` | Show or change persisted settings |
//! | `completions` | Generate shell completions |

mod cli;
mod commands;
mod config;
mod format;

use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "nimbus", &mut io::stdout());
        return Ok(());
    }

    // Initialize tracing
    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load();
    let api_key_flag = cli.api_key.as_deref();

    match cli.command {
        Commands::Search {
            query,
            limit,
            output,
        } => commands::cmd_search(&query, limit, &output, api_key_flag, &config).await,
        Commands::Add {
            query,
            pick,
            set_using,
        } => commands::cmd_add(&query, pick, set_using, api_key_flag, &config).await,
        Commands::Locations { output } => commands::cmd_locations(&output, &config).await,
        Commands::Use { id } => commands::cmd_use(id, &config).await,
        Commands::Favorite { id, remove } => commands::cmd_favorite(id, remove, &config).await,
        Commands::Remove { id } => commands::cmd_remove(id, &config).await,
        Commands::Refresh { all } => {
            commands::cmd_refresh(all, api_key_flag, &config, cli.quiet).await
        }
        Commands::Current { output } => commands::cmd_current(&output, &config).await,
        Commands::Hourly { hours, output } => {
            commands::cmd_hourly(hours, &output, &config).await
        }
        Commands::Daily { output } => commands::cmd_daily(&output, &config).await,
        Commands::Alerts { output } => {
            commands::cmd_alerts(&output, api_key_flag, &config).await
        }
        Commands::Init => commands::cmd_init(api_key_flag, &config, cli.quiet).await,
        Commands::Settings { action } => commands::cmd_settings(action, &config).await,
        Commands::Completions { .. } => {
            // Already handled above
            unreachable!()
        }
    }
}
