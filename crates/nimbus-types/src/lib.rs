//! Platform-agnostic types for the Nimbus weather forecast core.
//!
//! This crate defines the domain model shared by every other Nimbus crate:
//! forecast bundles as returned by the weather API, weather alerts, geocoding
//! candidates, coordinates with proximity comparison, and the display units a
//! user can configure.
//!
//! It is deliberately free of I/O: the HTTP clients live in `nimbus-api` and
//! persistence lives in `nimbus-store`.

pub mod error;
pub mod types;
pub mod units;

pub use error::{ParseError, ParseResult};
pub use types::{
    Condition, Coordinates, CurrentConditions, DailyEntry, ForecastBundle, ForecastKind,
    GeoCandidate, HourlyEntry, WeatherAlert, PROXIMITY_THRESHOLD_DEG,
};
pub use units::{TemperatureUnit, ThemeMode, WindSpeedUnit};
