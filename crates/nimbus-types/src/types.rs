//! Core types for Nimbus forecast data.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ParseError;

/// Proximity threshold for comparing locations, in degrees.
///
/// Roughly 100 meters at mid latitudes. This is a flat latitude/longitude
/// delta, not a geodesic distance, matching how saved locations have always
/// been deduplicated.
pub const PROXIMITY_THRESHOLD_DEG: f64 = 0.001;

/// Which forecast horizon a weather record belongs to.
///
/// Partitions cached weather rows per location: one `Current` row, one row
/// per forecast hour, one row per forecast day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastKind {
    /// The current observed conditions.
    Current,
    /// One entry per forecast hour.
    Hourly,
    /// One entry per forecast day.
    Daily,
}

impl ForecastKind {
    /// The stable string form used in storage and query parameters.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastKind::Current => "current",
            ForecastKind::Hourly => "hourly",
            ForecastKind::Daily => "daily",
        }
    }

    /// Parse a stored kind string, returning `None` for anything unknown.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "current" => Some(ForecastKind::Current),
            "hourly" => Some(ForecastKind::Hourly),
            "daily" => Some(ForecastKind::Daily),
            _ => None,
        }
    }
}

impl fmt::Display for ForecastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForecastKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseError::UnknownForecastKind(s.to_string()))
    }
}

/// A WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether another coordinate pair refers to the same place.
    ///
    /// Uses a flat delta on both axes against [`PROXIMITY_THRESHOLD_DEG`].
    /// Inaccurate near the poles; kept deliberately for stable dedup
    /// behavior of saved locations.
    ///
    /// # Examples
    ///
    /// ```
    /// use nimbus_types::Coordinates;
    ///
    /// let hk = Coordinates::new(22.3193, 114.1694);
    /// assert!(hk.is_near(&Coordinates::new(22.3199, 114.1690)));
    /// assert!(!hk.is_near(&Coordinates::new(22.3300, 114.1694)));
    /// ```
    #[must_use]
    pub fn is_near(&self, other: &Coordinates) -> bool {
        let lat_diff = (self.latitude - other.latitude).abs();
        let lon_diff = (self.longitude - other.longitude).abs();
        lat_diff < PROXIMITY_THRESHOLD_DEG && lon_diff < PROXIMITY_THRESHOLD_DEG
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A weather condition as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Short condition label, e.g. "Clouds" or "Rain".
    pub label: String,
    /// Icon code from the API, e.g. "04d".
    pub icon: Option<String>,
}

/// Currently observed conditions for one location.
///
/// All values are metric: °C, m/s, hPa, meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// When the observation was made.
    #[serde(with = "time::serde::rfc3339")]
    pub observed_at: OffsetDateTime,
    /// Air temperature in °C.
    pub temperature: f64,
    /// Perceived temperature in °C.
    pub feels_like: f64,
    /// Condition label and icon, if the API reported one.
    pub condition: Option<Condition>,
    /// Relative humidity percentage.
    pub humidity: u8,
    /// Wind speed in m/s.
    pub wind_speed: f64,
    /// Wind direction in degrees, if reported.
    pub wind_direction: Option<i32>,
    /// Atmospheric pressure in hPa, if reported.
    pub pressure: Option<f64>,
    /// UV index, if reported.
    pub uv_index: Option<f64>,
    /// Visibility in meters, if reported.
    pub visibility: Option<f64>,
}

/// One hour of forecast data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    /// Start of the forecast hour.
    #[serde(with = "time::serde::rfc3339")]
    pub forecast_at: OffsetDateTime,
    /// Forecast temperature in °C.
    pub temperature: f64,
    /// Perceived temperature in °C.
    pub feels_like: f64,
    /// Condition label and icon, if the API reported one.
    pub condition: Option<Condition>,
    /// Relative humidity percentage.
    pub humidity: u8,
    /// Wind speed in m/s.
    pub wind_speed: f64,
    /// Wind direction in degrees, if reported.
    pub wind_direction: Option<i32>,
    /// Atmospheric pressure in hPa, if reported.
    pub pressure: Option<f64>,
    /// UV index, if reported.
    pub uv_index: Option<f64>,
    /// Visibility in meters, if reported.
    pub visibility: Option<f64>,
    /// Probability of precipitation, 0.0 to 1.0.
    pub precipitation_chance: f64,
}

/// One day of forecast data.
///
/// `temperature` and `feels_like` are the day-bucket representative values;
/// the min/max range is carried alongside for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    /// Noon of the forecast day.
    #[serde(with = "time::serde::rfc3339")]
    pub forecast_at: OffsetDateTime,
    /// Representative daytime temperature in °C.
    pub temperature: f64,
    /// Representative daytime perceived temperature in °C.
    pub feels_like: f64,
    /// Minimum temperature of the day in °C.
    pub temperature_min: f64,
    /// Maximum temperature of the day in °C.
    pub temperature_max: f64,
    /// Condition label and icon, if the API reported one.
    pub condition: Option<Condition>,
    /// Relative humidity percentage.
    pub humidity: u8,
    /// Wind speed in m/s.
    pub wind_speed: f64,
    /// Wind direction in degrees, if reported.
    pub wind_direction: Option<i32>,
    /// Atmospheric pressure in hPa, if reported.
    pub pressure: Option<f64>,
    /// UV index, if reported.
    pub uv_index: Option<f64>,
    /// Probability of precipitation, 0.0 to 1.0.
    pub precipitation_chance: f64,
}

/// An active weather alert for one location.
///
/// Alerts are never persisted: they are re-fetched on every refresh and held
/// in memory for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherAlert {
    /// Issuing authority, e.g. "NWS Philadelphia".
    pub sender: String,
    /// Event name, e.g. "Flood Warning".
    pub event: String,
    /// Long-form description.
    pub description: String,
    /// Alert start, epoch seconds.
    pub starts_at: i64,
    /// Alert end, epoch seconds.
    pub ends_at: i64,
}

/// One complete forecast bundle for a coordinate pair.
///
/// A single API round trip produces all four sections, which is what lets
/// the refresh path treat "refresh weather" and "refresh alerts" as one
/// operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBundle {
    /// Currently observed conditions.
    pub current: CurrentConditions,
    /// Hourly forecast entries, in chronological order.
    pub hourly: Vec<HourlyEntry>,
    /// Daily forecast entries, in chronological order.
    pub daily: Vec<DailyEntry>,
    /// Active weather alerts, possibly empty.
    pub alerts: Vec<WeatherAlert>,
}

/// One geocoding candidate for a free-text place search.
///
/// Candidates are ranked by the upstream service; Nimbus does no local
/// re-ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoCandidate {
    /// Place name, e.g. "Cambridge".
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// ISO country code, if known.
    pub country: Option<String>,
    /// State or region, for disambiguation between same-named places.
    pub state: Option<String>,
}

impl GeoCandidate {
    /// Display name for this candidate: `"name, state"` when a state is
    /// present, otherwise just the name.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.state.as_deref() {
            Some(state) if !state.trim().is_empty() => format!("{}, {}", self.name, state),
            _ => self.name.clone(),
        }
    }

    /// The candidate's coordinate pair.
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}
