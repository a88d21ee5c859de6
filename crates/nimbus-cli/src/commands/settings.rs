//! Settings command - show or change persisted settings.

use anyhow::{bail, Result};

use nimbus_types::{TemperatureUnit, ThemeMode, WindSpeedUnit};

use crate::cli::SettingsAction;
use crate::config::Config;

use super::{app_error, open_state};

/// Execute the settings command.
pub async fn cmd_settings(action: SettingsAction, config: &Config) -> Result<()> {
    let state = open_state(config)?;

    match action {
        SettingsAction::Show => {
            let settings = state.settings();
            println!("Temperature unit: {}", settings.temperature_unit);
            println!("Wind speed unit:  {}", settings.wind_speed_unit);
            println!("Theme mode:       {}", settings.theme_mode);
        }
        SettingsAction::Temperature { unit } => {
            let unit = parse_temperature_unit(&unit)?;
            state
                .set_temperature_unit(unit)
                .await
                .map_err(app_error)?;
            println!("Temperature unit set to {}.", unit);
        }
        SettingsAction::Wind { unit } => {
            let unit = parse_wind_unit(&unit)?;
            state.set_wind_speed_unit(unit).await.map_err(app_error)?;
            println!("Wind speed unit set to {}.", unit);
        }
        SettingsAction::Theme { mode } => {
            let mode = parse_theme_mode(&mode)?;
            state.set_theme_mode(mode).await.map_err(app_error)?;
            println!("Theme mode set to {}.", mode);
        }
    }

    Ok(())
}

/// Strict parsing for user-typed values; stored values use the lenient
/// fall-back-to-default readers instead.
fn parse_temperature_unit(s: &str) -> Result<TemperatureUnit> {
    match s {
        "celsius" => Ok(TemperatureUnit::Celsius),
        "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
        other => bail!(
            "Unknown temperature unit '{}'. Use celsius or fahrenheit.",
            other
        ),
    }
}

fn parse_wind_unit(s: &str) -> Result<WindSpeedUnit> {
    match s {
        "ms" => Ok(WindSpeedUnit::MetersPerSecond),
        "kmh" => Ok(WindSpeedUnit::KilometersPerHour),
        "mph" => Ok(WindSpeedUnit::MilesPerHour),
        other => bail!("Unknown wind speed unit '{}'. Use ms, kmh, or mph.", other),
    }
}

fn parse_theme_mode(s: &str) -> Result<ThemeMode> {
    match s {
        "system" => Ok(ThemeMode::System),
        "light" => Ok(ThemeMode::Light),
        "dark" => Ok(ThemeMode::Dark),
        other => bail!("Unknown theme mode '{}'. Use system, light, or dark.", other),
    }
}
