//! HTTP clients for the Nimbus weather and geocoding APIs.
//!
//! This crate provides the three network collaborators of the forecast core:
//!
//! - [`WeatherClient`]: one-call forecast bundles (current + hourly + daily +
//!   alerts) for a coordinate pair
//! - [`GeocodingClient`]: free-text place search and coordinate-to-name
//!   reverse lookup
//! - [`PositionProvider`]: one-shot device position discovery, with an
//!   IP-geolocation implementation for headless use
//!
//! All failures surface as the closed [`Error`] set so the application layer
//! can classify them exhaustively.
//!
//! # Example
//!
//! ```no_run
//! use nimbus_api::WeatherClient;
//! use nimbus_types::Coordinates;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = WeatherClient::new("my-api-key")?;
//! let bundle = client.fetch_forecast(Coordinates::new(22.3193, 114.1694)).await?;
//! println!("Now: {:.1}°C", bundle.current.temperature);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod geocode;
pub mod position;
pub mod weather;

pub use error::{Error, Result};
pub use geocode::GeocodingClient;
pub use position::{DevicePosition, IpPositionProvider, MockPositionProvider, PositionProvider};
pub use weather::WeatherClient;
