//! Weather API client.
//!
//! One HTTPS round trip against the one-call endpoint returns the full
//! forecast bundle for a coordinate pair: current conditions, the hourly and
//! daily forecasts, and any active alerts. Bundling all four sections is what
//! lets the refresh path treat "refresh weather" and "refresh alerts" as a
//! single operation.
//!
//! All values are requested in metric units; unit conversion is a display
//! concern and happens in the front end.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use time::OffsetDateTime;

use nimbus_types::{
    Condition, Coordinates, CurrentConditions, DailyEntry, ForecastBundle, HourlyEntry,
    WeatherAlert,
};

use crate::error::{normalize_base_url, Error, Result};

/// Default base URL for the weather service.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Request timeout for forecast fetches.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the one-call weather API.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    /// Create a client against the default service URL.
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL.
    ///
    /// Used by tests and self-hosted API proxies.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::invalid_config("weather API key must not be empty"));
        }

        let base_url = normalize_base_url(base_url)?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::invalid_config(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one complete forecast bundle for a coordinate pair.
    ///
    /// Current, hourly, daily, and alert sections all come from this single
    /// round trip. No pagination; the response size is bounded by the API
    /// contract.
    pub async fn fetch_forecast(&self, coordinates: Coordinates) -> Result<ForecastBundle> {
        let url = format!("{}/data/3.0/onecall", self.base_url);

        tracing::debug!(
            "Fetching forecast for {:.4}, {:.4}",
            coordinates.latitude,
            coordinates.longitude
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("units", "metric".to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| Error::from_reqwest(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(Error::Status {
                status: status.as_u16(),
                message,
            });
        }

        let wire: OneCallWire = response
            .json()
            .await
            .map_err(|e| Error::Decode(e.to_string()))?;

        wire.into_bundle()
    }
}

// ==========================================================================
// Wire types
// ==========================================================================

#[derive(Debug, Deserialize)]
struct OneCallWire {
    current: CurrentWire,
    #[serde(default)]
    hourly: Vec<HourlyWire>,
    #[serde(default)]
    daily: Vec<DailyWire>,
    #[serde(default)]
    alerts: Vec<AlertWire>,
}

#[derive(Debug, Deserialize)]
struct CurrentWire {
    dt: i64,
    temp: f64,
    feels_like: f64,
    humidity: u8,
    wind_speed: f64,
    wind_deg: Option<i32>,
    pressure: Option<f64>,
    uvi: Option<f64>,
    visibility: Option<f64>,
    #[serde(default)]
    weather: Vec<DescriptionWire>,
}

#[derive(Debug, Deserialize)]
struct HourlyWire {
    dt: i64,
    temp: f64,
    feels_like: f64,
    humidity: u8,
    wind_speed: f64,
    wind_deg: Option<i32>,
    pressure: Option<f64>,
    uvi: Option<f64>,
    visibility: Option<f64>,
    #[serde(default)]
    weather: Vec<DescriptionWire>,
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct DailyWire {
    dt: i64,
    temp: DayTempWire,
    feels_like: DayFeelsLikeWire,
    humidity: u8,
    wind_speed: f64,
    wind_deg: Option<i32>,
    pressure: Option<f64>,
    uvi: Option<f64>,
    #[serde(default)]
    weather: Vec<DescriptionWire>,
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct DayTempWire {
    day: f64,
    min: f64,
    max: f64,
}

#[derive(Debug, Deserialize)]
struct DayFeelsLikeWire {
    day: f64,
}

#[derive(Debug, Deserialize)]
struct DescriptionWire {
    main: String,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlertWire {
    sender_name: String,
    event: String,
    #[serde(default)]
    description: String,
    start: i64,
    end: i64,
}

// ==========================================================================
// Wire -> domain conversion
// ==========================================================================

fn timestamp(epoch_seconds: i64) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(epoch_seconds)
        .map_err(|_| Error::Decode(format!("timestamp out of range: {}", epoch_seconds)))
}

fn condition(weather: &[DescriptionWire]) -> Option<Condition> {
    weather.first().map(|w| Condition {
        label: w.main.clone(),
        icon: w.icon.clone(),
    })
}

impl OneCallWire {
    fn into_bundle(self) -> Result<ForecastBundle> {
        let current = CurrentConditions {
            observed_at: timestamp(self.current.dt)?,
            temperature: self.current.temp,
            feels_like: self.current.feels_like,
            condition: condition(&self.current.weather),
            humidity: self.current.humidity,
            wind_speed: self.current.wind_speed,
            wind_direction: self.current.wind_deg,
            pressure: self.current.pressure,
            uv_index: self.current.uvi,
            visibility: self.current.visibility,
        };

        let hourly = self
            .hourly
            .into_iter()
            .map(|h| {
                Ok(HourlyEntry {
                    forecast_at: timestamp(h.dt)?,
                    temperature: h.temp,
                    feels_like: h.feels_like,
                    condition: condition(&h.weather),
                    humidity: h.humidity,
                    wind_speed: h.wind_speed,
                    wind_direction: h.wind_deg,
                    pressure: h.pressure,
                    uv_index: h.uvi,
                    visibility: h.visibility,
                    precipitation_chance: h.pop,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let daily = self
            .daily
            .into_iter()
            .map(|d| {
                Ok(DailyEntry {
                    forecast_at: timestamp(d.dt)?,
                    temperature: d.temp.day,
                    feels_like: d.feels_like.day,
                    temperature_min: d.temp.min,
                    temperature_max: d.temp.max,
                    condition: condition(&d.weather),
                    humidity: d.humidity,
                    wind_speed: d.wind_speed,
                    wind_direction: d.wind_deg,
                    pressure: d.pressure,
                    uv_index: d.uvi,
                    precipitation_chance: d.pop,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let alerts = self
            .alerts
            .into_iter()
            .map(|a| WeatherAlert {
                sender: a.sender_name,
                event: a.event,
                description: a.description,
                starts_at: a.start,
                ends_at: a.end,
            })
            .collect();

        Ok(ForecastBundle {
            current,
            hourly,
            daily,
            alerts,
        })
    }
}
