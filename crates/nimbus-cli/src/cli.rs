//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};

use nimbus_types::{TemperatureUnit, WindSpeedUnit};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Reusable output format and unit override arguments
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Use Fahrenheit for temperature display (overrides the stored setting)
    #[arg(long, conflicts_with = "celsius")]
    pub fahrenheit: bool,

    /// Use Celsius for temperature display (overrides the stored setting)
    #[arg(long, conflicts_with = "fahrenheit")]
    pub celsius: bool,

    /// Use km/h for wind speed (overrides the stored setting)
    #[arg(long, conflicts_with_all = ["mph", "ms"])]
    pub kmh: bool,

    /// Use mph for wind speed (overrides the stored setting)
    #[arg(long, conflicts_with_all = ["kmh", "ms"])]
    pub mph: bool,

    /// Use m/s for wind speed (overrides the stored setting)
    #[arg(long, conflicts_with_all = ["kmh", "mph"])]
    pub ms: bool,
}

impl OutputArgs {
    /// Resolve the temperature unit: explicit flags override the stored
    /// setting
    pub fn resolve_temperature(&self, stored: TemperatureUnit) -> TemperatureUnit {
        if self.fahrenheit {
            TemperatureUnit::Fahrenheit
        } else if self.celsius {
            TemperatureUnit::Celsius
        } else {
            stored
        }
    }

    /// Resolve the wind speed unit: explicit flags override the stored
    /// setting
    pub fn resolve_wind(&self, stored: WindSpeedUnit) -> WindSpeedUnit {
        if self.kmh {
            WindSpeedUnit::KilometersPerHour
        } else if self.mph {
            WindSpeedUnit::MilesPerHour
        } else if self.ms {
            WindSpeedUnit::MetersPerSecond
        } else {
            stored
        }
    }
}

#[derive(Parser)]
#[command(name = "nimbus")]
#[command(author, version, about = "Weather forecasts from the command line", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Weather API key, or use the NIMBUS_API_KEY env var
    #[arg(long, global = true, env = "NIMBUS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for locations by name
    Search {
        /// Free-text place name, e.g. "Cambridge"
        query: String,

        /// Maximum number of candidates
        #[arg(short, long, default_value = "5")]
        limit: u32,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Add a location from search results
    Add {
        /// Free-text place name to search for
        query: String,

        /// Pick the Nth search result (1-based)
        #[arg(short, long, default_value = "1")]
        pick: usize,

        /// Make it the active forecast target instead of a favorite
        #[arg(long = "use")]
        set_using: bool,
    },

    /// List saved locations
    Locations {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Set the active forecast target
    Use {
        /// Location ID (see `nimbus locations`)
        id: i64,
    },

    /// Add or remove a location from the favorite set
    Favorite {
        /// Location ID (see `nimbus locations`)
        id: i64,

        /// Remove from favorites instead of adding
        #[arg(long)]
        remove: bool,
    },

    /// Delete a saved location and its cached weather
    Remove {
        /// Location ID (see `nimbus locations`)
        id: i64,
    },

    /// Refresh cached weather for the active location
    Refresh {
        /// Refresh every saved location instead
        #[arg(long)]
        all: bool,
    },

    /// Show cached current conditions for the active location
    Current {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the cached hourly forecast for the active location
    Hourly {
        /// Number of hours to show
        #[arg(short = 'n', long, default_value = "24")]
        hours: u32,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the cached daily forecast for the active location
    Daily {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Refresh and show active weather alerts
    Alerts {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// First-launch setup: detect the device position, seed the active
    /// location, and prefetch weather for all saved locations
    Init,

    /// Show or change persisted settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show all settings
    Show,

    /// Set the temperature unit (celsius, fahrenheit)
    Temperature {
        /// celsius or fahrenheit
        unit: String,
    },

    /// Set the wind speed unit (ms, kmh, mph)
    Wind {
        /// ms, kmh, or mph
        unit: String,
    },

    /// Set the theme mode (system, light, dark)
    Theme {
        /// system, light, or dark
        mode: String,
    },
}
