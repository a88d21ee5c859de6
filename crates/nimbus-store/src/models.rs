//! Data models for stored data.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use nimbus_types::{
    Coordinates, CurrentConditions, DailyEntry, ForecastKind, HourlyEntry,
};

/// A saved location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredLocation {
    /// Database row ID.
    pub id: i64,
    /// Display name, e.g. "Cambridge, Massachusetts".
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// ISO country code or name, if known.
    pub country: Option<String>,
    /// Whether this location is in the favorite set.
    pub is_favorite: bool,
    /// Whether this location was created from the device position.
    pub is_current_location: bool,
    /// Whether this is the active forecast target. At most one location
    /// has this set at any time.
    pub is_using: bool,
    /// Sort position among favorites.
    pub sort_order: i64,
    /// When the location was saved.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl StoredLocation {
    /// The location's coordinate pair.
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// A location to be inserted.
#[derive(Debug, Clone, Default)]
pub struct NewLocation {
    /// Display name.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// ISO country code or name, if known.
    pub country: Option<String>,
    /// Insert into the favorite set (subject to the cap).
    pub is_favorite: bool,
    /// Mark as created from the device position.
    pub is_current_location: bool,
    /// Mark as the active forecast target. The store clears the flag on all
    /// other rows in the same transaction.
    pub is_using: bool,
    /// Sort position among favorites.
    pub sort_order: i64,
}

impl NewLocation {
    /// Create a plain (non-favorite, non-using) location.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            ..Default::default()
        }
    }

    /// Set the country.
    pub fn country(mut self, country: Option<String>) -> Self {
        self.country = country;
        self
    }

    /// Mark as favorite.
    pub fn favorite(mut self, sort_order: i64) -> Self {
        self.is_favorite = true;
        self.sort_order = sort_order;
        self
    }

    /// Mark as the active forecast target.
    pub fn using(mut self) -> Self {
        self.is_using = true;
        self
    }

    /// Mark as created from the device position.
    pub fn current_location(mut self) -> Self {
        self.is_current_location = true;
        self
    }
}

/// A cached weather row.
///
/// Optional numeric fields hold `None` for "not reported", never a sentinel
/// value, so front ends can distinguish unknown from a measured zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredWeatherRecord {
    /// Database row ID.
    pub id: i64,
    /// Owning location.
    pub location_id: i64,
    /// Temperature in °C.
    pub temperature: f64,
    /// Perceived temperature in °C.
    pub feels_like: f64,
    /// Condition label, e.g. "Clouds". Empty when the API reported none.
    pub condition: String,
    /// Icon code from the API.
    pub condition_icon: Option<String>,
    /// Relative humidity percentage.
    pub humidity: u8,
    /// Wind speed in m/s.
    pub wind_speed: f64,
    /// Wind direction in degrees.
    pub wind_direction: Option<i32>,
    /// Atmospheric pressure in hPa.
    pub pressure: Option<f64>,
    /// UV index.
    pub uv_index: Option<f64>,
    /// Visibility in meters.
    pub visibility: Option<f64>,
    /// Observation or forecast time.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Which forecast horizon this row belongs to.
    pub kind: ForecastKind,
}

/// Keep a direction only when it is a valid compass angle.
fn direction_or_none(value: Option<i32>) -> Option<i32> {
    value.filter(|v| *v >= 0)
}

/// Keep a reading only when non-negative.
fn non_negative(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v >= 0.0)
}

/// Keep a pressure only when strictly positive; 0 hPa is not a measurement.
fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

impl StoredWeatherRecord {
    /// Build the single `current` row for a location from fetched conditions.
    ///
    /// A missing condition becomes an empty label rather than dropping the
    /// observation; temperature and wind are still worth caching.
    pub fn from_current(location_id: i64, current: &CurrentConditions) -> Self {
        let (condition, condition_icon) = match &current.condition {
            Some(c) => (c.label.clone(), c.icon.clone()),
            None => (String::new(), None),
        };

        Self {
            id: 0, // Will be set by database
            location_id,
            temperature: current.temperature,
            feels_like: current.feels_like,
            condition,
            condition_icon,
            humidity: current.humidity,
            wind_speed: current.wind_speed,
            wind_direction: direction_or_none(current.wind_direction),
            pressure: positive(current.pressure),
            uv_index: non_negative(current.uv_index),
            visibility: non_negative(current.visibility),
            timestamp: current.observed_at,
            kind: ForecastKind::Current,
        }
    }

    /// Build an `hourly` row, or `None` when the entry has no condition.
    ///
    /// Entries without a condition are not cached as partial rows; the
    /// caller logs and skips them.
    pub fn from_hourly(location_id: i64, entry: &HourlyEntry) -> Option<Self> {
        let condition = entry.condition.as_ref()?;

        Some(Self {
            id: 0,
            location_id,
            temperature: entry.temperature,
            feels_like: entry.feels_like,
            condition: condition.label.clone(),
            condition_icon: condition.icon.clone(),
            humidity: entry.humidity,
            wind_speed: entry.wind_speed,
            wind_direction: direction_or_none(entry.wind_direction),
            pressure: positive(entry.pressure),
            uv_index: non_negative(entry.uv_index),
            visibility: non_negative(entry.visibility),
            timestamp: entry.forecast_at,
            kind: ForecastKind::Hourly,
        })
    }

    /// Build a `daily` row, or `None` when the entry has no condition.
    ///
    /// Uses the day-bucket representative temperature and feels-like rather
    /// than the min/max range.
    pub fn from_daily(location_id: i64, entry: &DailyEntry) -> Option<Self> {
        let condition = entry.condition.as_ref()?;

        Some(Self {
            id: 0,
            location_id,
            temperature: entry.temperature,
            feels_like: entry.feels_like,
            condition: condition.label.clone(),
            condition_icon: condition.icon.clone(),
            humidity: entry.humidity,
            wind_speed: entry.wind_speed,
            wind_direction: direction_or_none(entry.wind_direction),
            pressure: positive(entry.pressure),
            uv_index: non_negative(entry.uv_index),
            visibility: None,
            timestamp: entry.forecast_at,
            kind: ForecastKind::Daily,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_types::Condition;

    fn test_current() -> CurrentConditions {
        CurrentConditions {
            observed_at: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
            temperature: 22.0,
            feels_like: 21.4,
            condition: Some(Condition {
                label: "Clouds".to_string(),
                icon: Some("03d".to_string()),
            }),
            humidity: 65,
            wind_speed: 3.2,
            wind_direction: Some(180),
            pressure: Some(1013.0),
            uv_index: Some(4.5),
            visibility: Some(10_000.0),
        }
    }

    #[test]
    fn test_from_current_maps_fields() {
        let record = StoredWeatherRecord::from_current(7, &test_current());

        assert_eq!(record.location_id, 7);
        assert_eq!(record.kind, ForecastKind::Current);
        assert_eq!(record.condition, "Clouds");
        assert_eq!(record.condition_icon.as_deref(), Some("03d"));
        assert_eq!(record.pressure, Some(1013.0));
    }

    #[test]
    fn test_from_current_without_condition_keeps_observation() {
        let mut current = test_current();
        current.condition = None;

        let record = StoredWeatherRecord::from_current(1, &current);
        assert_eq!(record.condition, "");
        assert!(record.condition_icon.is_none());
    }

    #[test]
    fn test_numeric_edge_policy() {
        let mut current = test_current();
        current.wind_direction = Some(-1);
        current.pressure = Some(0.0);
        current.uv_index = Some(-0.5);
        current.visibility = Some(0.0);

        let record = StoredWeatherRecord::from_current(1, &current);

        // Negative or sentinel values become absent, not zero
        assert!(record.wind_direction.is_none());
        assert!(record.pressure.is_none());
        assert!(record.uv_index.is_none());
        // A measured zero visibility is a real value (dense fog)
        assert_eq!(record.visibility, Some(0.0));
    }

    #[test]
    fn test_from_hourly_requires_condition() {
        let entry = HourlyEntry {
            forecast_at: OffsetDateTime::from_unix_timestamp(1_700_003_600).unwrap(),
            temperature: 21.0,
            feels_like: 20.5,
            condition: None,
            humidity: 70,
            wind_speed: 2.8,
            wind_direction: Some(175),
            pressure: Some(1012.0),
            uv_index: Some(3.0),
            visibility: Some(10_000.0),
            precipitation_chance: 0.4,
        };

        assert!(StoredWeatherRecord::from_hourly(1, &entry).is_none());

        let entry = HourlyEntry {
            condition: Some(Condition {
                label: "Rain".to_string(),
                icon: Some("10d".to_string()),
            }),
            ..entry
        };
        let record = StoredWeatherRecord::from_hourly(1, &entry).unwrap();
        assert_eq!(record.kind, ForecastKind::Hourly);
        assert_eq!(record.condition, "Rain");
    }

    #[test]
    fn test_from_daily_uses_representative_temperature() {
        let entry = DailyEntry {
            forecast_at: OffsetDateTime::from_unix_timestamp(1_700_043_200).unwrap(),
            temperature: 23.0,
            feels_like: 22.6,
            temperature_min: 18.0,
            temperature_max: 25.0,
            condition: Some(Condition {
                label: "Clear".to_string(),
                icon: Some("01d".to_string()),
            }),
            humidity: 60,
            wind_speed: 4.0,
            wind_direction: Some(190),
            pressure: Some(1014.0),
            uv_index: Some(6.0),
            precipitation_chance: 0.0,
        };

        let record = StoredWeatherRecord::from_daily(1, &entry).unwrap();
        assert_eq!(record.kind, ForecastKind::Daily);
        assert_eq!(record.temperature, 23.0);
        assert_eq!(record.feels_like, 22.6);
    }
}
