//! User-configurable display units.
//!
//! Canonical storage is always metric (°C, m/s); these enums only affect
//! presentation. Stored unit strings that fail to parse fall back to the
//! default rather than erroring, so a corrupt settings row can never wedge
//! the app.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Temperature display unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    /// Degrees Celsius (default, canonical).
    #[default]
    Celsius,
    /// Degrees Fahrenheit.
    Fahrenheit,
}

impl TemperatureUnit {
    /// The stable string form used in storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    /// Parse a stored unit string, falling back to the default on anything
    /// unrecognized.
    #[must_use]
    pub fn from_stored(s: &str) -> Self {
        match s {
            "fahrenheit" => TemperatureUnit::Fahrenheit,
            _ => TemperatureUnit::Celsius,
        }
    }

    /// Convert a canonical Celsius value into this unit.
    #[must_use]
    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    /// Display symbol, e.g. `°C`.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wind speed display unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindSpeedUnit {
    /// Meters per second (default, canonical).
    #[default]
    MetersPerSecond,
    /// Kilometers per hour.
    KilometersPerHour,
    /// Miles per hour.
    MilesPerHour,
}

impl WindSpeedUnit {
    /// The stable string form used in storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            WindSpeedUnit::MetersPerSecond => "ms",
            WindSpeedUnit::KilometersPerHour => "kmh",
            WindSpeedUnit::MilesPerHour => "mph",
        }
    }

    /// Parse a stored unit string, falling back to the default on anything
    /// unrecognized.
    #[must_use]
    pub fn from_stored(s: &str) -> Self {
        match s {
            "kmh" => WindSpeedUnit::KilometersPerHour,
            "mph" => WindSpeedUnit::MilesPerHour,
            _ => WindSpeedUnit::MetersPerSecond,
        }
    }

    /// Convert a canonical m/s value into this unit.
    #[must_use]
    pub fn convert(&self, meters_per_second: f64) -> f64 {
        match self {
            WindSpeedUnit::MetersPerSecond => meters_per_second,
            WindSpeedUnit::KilometersPerHour => meters_per_second * 3.6,
            WindSpeedUnit::MilesPerHour => meters_per_second * 2.23694,
        }
    }

    /// Display symbol, e.g. `m/s`.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            WindSpeedUnit::MetersPerSecond => "m/s",
            WindSpeedUnit::KilometersPerHour => "km/h",
            WindSpeedUnit::MilesPerHour => "mph",
        }
    }
}

impl fmt::Display for WindSpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Theme mode preference.
///
/// Stored and surfaced for front ends; the CLI itself only persists it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Follow the platform setting (default).
    #[default]
    System,
    /// Always light.
    Light,
    /// Always dark.
    Dark,
}

impl ThemeMode {
    /// The stable string form used in storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::System => "system",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Parse a stored mode string, falling back to the default on anything
    /// unrecognized.
    #[must_use]
    pub fn from_stored(s: &str) -> Self {
        match s {
            "light" => ThemeMode::Light,
            "dark" => ThemeMode::Dark,
            _ => ThemeMode::System,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
