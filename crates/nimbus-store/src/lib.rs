//! Local forecast cache and location store for Nimbus.
//!
//! This crate provides SQLite-based storage for saved locations, cached
//! forecast rows, and user settings, enabling offline display and reactive
//! queries over the last fetched data.
//!
//! # Features
//!
//! - Saved locations with at most one marked "using" (the active forecast
//!   target) and a capped favorite set
//! - Cached weather rows partitioned by forecast kind, replaced wholesale on
//!   every refresh so two fetch times never mix
//! - Cascade delete: removing a location removes its cached weather
//! - Key-value settings with fall-back-to-default reads
//!
//! # Example
//!
//! ```no_run
//! use nimbus_store::Store;
//!
//! let store = Store::open_default()?;
//!
//! if let Some(active) = store.using_location()? {
//!     let current = store.current_weather(active.id)?;
//!     println!("{:?}", current);
//! }
//! # Ok::<(), nimbus_store::Error>(())
//! ```

mod error;
mod models;
mod queries;
mod schema;
mod store;

pub use error::{Error, Result};
pub use models::{NewLocation, StoredLocation, StoredWeatherRecord};
pub use queries::ForecastQuery;
pub use store::{Store, DEFAULT_MAX_FAVORITES};

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/nimbus/data.db`
/// - macOS: `~/Library/Application Support/nimbus/data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\nimbus\data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("nimbus")
        .join("data.db")
}
