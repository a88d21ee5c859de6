//! Output formatting utilities for text and JSON output.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use time::OffsetDateTime;

use nimbus_app::SettingsSnapshot;
use nimbus_store::{StoredLocation, StoredWeatherRecord};
use nimbus_types::{GeoCandidate, TemperatureUnit, WeatherAlert, WindSpeedUnit};

use crate::cli::OutputArgs;

/// Resolved display units for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Temperature display unit.
    pub temperature: TemperatureUnit,
    /// Wind speed display unit.
    pub wind: WindSpeedUnit,
}

impl FormatOptions {
    /// Resolve units: per-invocation flags override the stored settings.
    pub fn resolve(args: &OutputArgs, stored: SettingsSnapshot) -> Self {
        Self {
            temperature: args.resolve_temperature(stored.temperature_unit),
            wind: args.resolve_wind(stored.wind_speed_unit),
        }
    }

    /// Render a canonical Celsius value in the display unit.
    pub fn temp(&self, celsius: f64) -> String {
        format!(
            "{:.1}{}",
            self.temperature.convert(celsius),
            self.temperature.symbol()
        )
    }

    /// Render a canonical m/s value in the display unit.
    pub fn wind_speed(&self, meters_per_second: f64) -> String {
        format!(
            "{:.1} {}",
            self.wind.convert(meters_per_second),
            self.wind.symbol()
        )
    }
}

/// Serialize any value as pretty JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn format_hour(time: OffsetDateTime) -> Result<String> {
    let fmt = time::format_description::parse("[hour]:[minute]")?;
    Ok(time.format(&fmt)?)
}

fn format_date(time: OffsetDateTime) -> Result<String> {
    let fmt = time::format_description::parse("[year]-[month]-[day]")?;
    Ok(time.format(&fmt)?)
}

fn format_date_time(time: OffsetDateTime) -> Result<String> {
    let fmt = time::format_description::parse("[year]-[month]-[day] [hour]:[minute] UTC")?;
    Ok(time.format(&fmt)?)
}

/// Render current conditions for display.
pub fn format_current_text(
    location: &StoredLocation,
    record: &StoredWeatherRecord,
    opts: &FormatOptions,
) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!(
        "{}  ({})\n",
        location.name.bold(),
        format_date_time(record.timestamp)?
    ));
    out.push_str(&format!(
        "  {}  feels like {}",
        opts.temp(record.temperature),
        opts.temp(record.feels_like)
    ));
    if !record.condition.is_empty() {
        out.push_str(&format!("  {}", record.condition));
    }
    out.push('\n');

    out.push_str(&format!(
        "  Humidity: {}%   Wind: {}",
        record.humidity,
        opts.wind_speed(record.wind_speed)
    ));
    if let Some(direction) = record.wind_direction {
        out.push_str(&format!(" ({}°)", direction));
    }
    out.push('\n');

    // Optional readings are shown only when the API reported them
    let mut extras = Vec::new();
    if let Some(pressure) = record.pressure {
        extras.push(format!("Pressure: {:.0} hPa", pressure));
    }
    if let Some(uv) = record.uv_index {
        extras.push(format!("UV index: {:.1}", uv));
    }
    if let Some(visibility) = record.visibility {
        extras.push(format!("Visibility: {:.0} m", visibility));
    }
    if !extras.is_empty() {
        out.push_str(&format!("  {}\n", extras.join("   ")));
    }

    Ok(out)
}

/// Render the hourly forecast as one row per hour.
pub fn format_hourly_text(records: &[StoredWeatherRecord], opts: &FormatOptions) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "  {}  {:>8}  {:<10}  wind {}\n",
            format_hour(record.timestamp)?,
            opts.temp(record.temperature),
            record.condition,
            opts.wind_speed(record.wind_speed),
        ));
    }
    Ok(out)
}

/// Render the daily forecast as one row per day.
pub fn format_daily_text(records: &[StoredWeatherRecord], opts: &FormatOptions) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "  {}  {:>8}  {:<10}  humidity {}%\n",
            format_date(record.timestamp)?,
            opts.temp(record.temperature),
            record.condition,
            record.humidity,
        ));
    }
    Ok(out)
}

/// Render the saved location list.
pub fn format_locations_text(locations: &[StoredLocation]) -> String {
    let mut out = String::new();
    for location in locations {
        let marker = if location.is_using { "*" } else { " " };
        let mut tags = Vec::new();
        if location.is_favorite {
            tags.push("favorite");
        }
        if location.is_current_location {
            tags.push("device");
        }
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", tags.join(", "))
        };

        out.push_str(&format!(
            "{} [{}] {} - {:.4}, {:.4}{}{}\n",
            marker,
            location.id,
            location.name.bold(),
            location.latitude,
            location.longitude,
            location
                .country
                .as_deref()
                .map(|c| format!(" ({})", c))
                .unwrap_or_default(),
            tags,
        ));
    }
    out
}

/// Render geocoding candidates as a numbered list.
pub fn format_candidates_text(candidates: &[GeoCandidate]) -> String {
    let mut out = String::new();
    for (index, candidate) in candidates.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} - {:.4}, {:.4}{}\n",
            index + 1,
            candidate.display_name().bold(),
            candidate.latitude,
            candidate.longitude,
            candidate
                .country
                .as_deref()
                .map(|c| format!(" ({})", c))
                .unwrap_or_default(),
        ));
    }
    out
}

/// Render active weather alerts.
pub fn format_alerts_text(alerts: &[WeatherAlert]) -> Result<String> {
    let mut out = String::new();
    for alert in alerts {
        let starts = OffsetDateTime::from_unix_timestamp(alert.starts_at)?;
        let ends = OffsetDateTime::from_unix_timestamp(alert.ends_at)?;
        out.push_str(&format!(
            "{}  ({})\n  {} - {}\n  {}\n",
            alert.event.bold(),
            alert.sender,
            format_date_time(starts)?,
            format_date_time(ends)?,
            alert.description,
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use nimbus_types::ForecastKind;

    fn opts(temperature: TemperatureUnit, wind: WindSpeedUnit) -> FormatOptions {
        FormatOptions { temperature, wind }
    }

    fn test_record() -> StoredWeatherRecord {
        StoredWeatherRecord {
            id: 1,
            location_id: 1,
            temperature: 22.0,
            feels_like: 21.4,
            condition: "Clouds".to_string(),
            condition_icon: Some("03d".to_string()),
            humidity: 65,
            wind_speed: 3.0,
            wind_direction: Some(180),
            pressure: Some(1013.0),
            uv_index: None,
            visibility: None,
            timestamp: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
            kind: ForecastKind::Current,
        }
    }

    fn test_location() -> StoredLocation {
        StoredLocation {
            id: 1,
            name: "Hong Kong".to_string(),
            latitude: 22.3193,
            longitude: 114.1694,
            country: Some("HK".to_string()),
            is_favorite: false,
            is_current_location: false,
            is_using: true,
            sort_order: 0,
            created_at: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
        }
    }

    #[test]
    fn test_temp_rendering_respects_unit() {
        let celsius = opts(TemperatureUnit::Celsius, WindSpeedUnit::MetersPerSecond);
        assert_eq!(celsius.temp(22.0), "22.0°C");

        let fahrenheit = opts(TemperatureUnit::Fahrenheit, WindSpeedUnit::MetersPerSecond);
        assert_eq!(fahrenheit.temp(0.0), "32.0°F");
    }

    #[test]
    fn test_wind_rendering_respects_unit() {
        let kmh = opts(TemperatureUnit::Celsius, WindSpeedUnit::KilometersPerHour);
        assert_eq!(kmh.wind_speed(10.0), "36.0 km/h");
    }

    #[test]
    fn test_format_options_resolve_flag_override() {
        let args = OutputArgs {
            format: OutputFormat::Text,
            fahrenheit: true,
            celsius: false,
            kmh: true,
            mph: false,
            ms: false,
        };
        let resolved = FormatOptions::resolve(&args, SettingsSnapshot::default());
        assert_eq!(resolved.temperature, TemperatureUnit::Fahrenheit);
        assert_eq!(resolved.wind, WindSpeedUnit::KilometersPerHour);
    }

    #[test]
    fn test_format_current_text_skips_absent_optionals() {
        let opts = opts(TemperatureUnit::Celsius, WindSpeedUnit::MetersPerSecond);
        let text = format_current_text(&test_location(), &test_record(), &opts).unwrap();

        assert!(text.contains("Hong Kong"));
        assert!(text.contains("22.0°C"));
        assert!(text.contains("Pressure: 1013 hPa"));
        // Absent readings are omitted, not rendered as zero
        assert!(!text.contains("UV index"));
        assert!(!text.contains("Visibility"));
    }

    #[test]
    fn test_format_locations_marks_active() {
        let text = format_locations_text(&[test_location()]);
        assert!(text.starts_with('*'));
        assert!(text.contains("(HK)"));
    }
}
