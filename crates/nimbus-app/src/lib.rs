//! Refresh coordination and application state for Nimbus.
//!
//! This crate is the glue between the HTTP clients (`nimbus-api`) and the
//! local cache (`nimbus-store`):
//!
//! - [`AppState`]: shared state (the store, the in-memory alert set, the
//!   last surfaced error, change events, and settings snapshots)
//! - [`CacheRepository`]: fetch a forecast bundle and atomically replace the
//!   cached rows for one location
//! - [`RefreshCoordinator`]: the single-flight refresh of the active
//!   location, plus the bulk startup refresh
//! - [`LocationCoordinator`]: location search, add/remove/favorite/use, and
//!   the first-launch bootstrap from the device position
//! - [`classify`]: map the closed set of raw failures to the user-facing
//!   error taxonomy
//!
//! Low-level errors never cross this crate's boundary raw: every failure is
//! classified into an [`AppError`] before a front end sees it, and recovery
//! is always user-initiated.

pub mod classify;
pub mod locations;
pub mod refresh;
pub mod repository;
pub mod state;

pub use classify::{classify, AppError, ErrorKind, RawFailure};
pub use locations::LocationCoordinator;
pub use refresh::{RefreshCoordinator, RefreshOutcome};
pub use repository::CacheRepository;
pub use state::{AppEvent, AppState, SettingsSnapshot};
