//! Application state shared across coordinators and front ends.
//!
//! # Change Events
//!
//! The `events` broadcast channel is the push-based view of the cache: any
//! write to locations, weather rows, or settings emits an [`AppEvent`], so
//! observers re-read only when something actually changed. If a subscriber
//! falls behind and the buffer fills, old events are dropped without
//! blocking writers; observers treat a lagged receiver as "re-read
//! everything".
//!
//! # Settings Snapshots
//!
//! Settings are additionally published on a `watch` channel: every write
//! stores the value and immediately publishes the new snapshot, so there is
//! no polling anywhere between a settings write and its observers.

use std::sync::Arc;

use tokio::sync::{broadcast, watch, Mutex, RwLock};

use nimbus_store::Store;
use nimbus_types::{TemperatureUnit, ThemeMode, WeatherAlert, WindSpeedUnit};

use crate::classify::AppError;
use crate::refresh::RefreshState;

/// Buffer size for the change-event broadcast channel.
const EVENT_BUFFER: usize = 64;

/// A change notification for observers of the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The saved location set changed (add/remove/favorite/use).
    LocationsChanged,
    /// Cached weather for a location was replaced.
    WeatherUpdated {
        /// The location whose cache was replaced.
        location_id: i64,
    },
    /// The in-memory alert set was replaced.
    AlertsUpdated,
    /// A settings value changed.
    SettingsChanged,
}

/// A point-in-time copy of all user settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsSnapshot {
    /// Temperature display unit.
    pub temperature_unit: TemperatureUnit,
    /// Wind speed display unit.
    pub wind_speed_unit: WindSpeedUnit,
    /// Theme mode.
    pub theme_mode: ThemeMode,
}

/// Shared application state.
pub struct AppState {
    /// The data store (wrapped in Mutex for thread-safe access).
    pub store: Mutex<Store>,
    /// Single-flight refresh tracking.
    pub refresh: RefreshState,
    /// Broadcast channel for change events.
    events_tx: broadcast::Sender<AppEvent>,
    /// Alerts from the most recent successful refresh.
    alerts: RwLock<Vec<WeatherAlert>>,
    /// The last surfaced error, cleared on the next refresh attempt.
    error: RwLock<Option<AppError>>,
    /// Publish-on-change settings snapshots.
    settings_tx: watch::Sender<SettingsSnapshot>,
}

impl AppState {
    /// Create new application state around an opened store.
    ///
    /// The initial settings snapshot is read from the store so watchers see
    /// persisted values immediately.
    pub fn new(store: Store) -> Arc<Self> {
        let snapshot = read_settings(&store);
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);
        let (settings_tx, _) = watch::channel(snapshot);

        Arc::new(Self {
            store: Mutex::new(store),
            refresh: RefreshState::new(),
            events_tx,
            alerts: RwLock::new(Vec::new()),
            error: RwLock::new(None),
            settings_tx,
        })
    }

    /// Subscribe to change events.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.events_tx.subscribe()
    }

    /// Emit a change event to all observers.
    pub fn emit(&self, event: AppEvent) {
        // No subscribers is fine; send only fails when nobody listens
        let _ = self.events_tx.send(event);
    }

    /// The alerts from the most recent successful refresh.
    pub async fn alerts(&self) -> Vec<WeatherAlert> {
        self.alerts.read().await.clone()
    }

    /// Replace the in-memory alert set.
    pub async fn set_alerts(&self, alerts: Vec<WeatherAlert>) {
        *self.alerts.write().await = alerts;
        self.emit(AppEvent::AlertsUpdated);
    }

    /// The last surfaced error, if any.
    pub async fn last_error(&self) -> Option<AppError> {
        self.error.read().await.clone()
    }

    /// Store an error for display.
    pub async fn set_error(&self, error: AppError) {
        *self.error.write().await = Some(error);
    }

    /// Clear the displayed error.
    pub async fn clear_error(&self) {
        *self.error.write().await = None;
    }
}

// === Settings ===

impl AppState {
    /// The current settings snapshot.
    pub fn settings(&self) -> SettingsSnapshot {
        *self.settings_tx.borrow()
    }

    /// Subscribe to settings snapshots; the receiver sees every change.
    pub fn watch_settings(&self) -> watch::Receiver<SettingsSnapshot> {
        self.settings_tx.subscribe()
    }

    /// Persist and publish a new temperature unit.
    pub async fn set_temperature_unit(&self, unit: TemperatureUnit) -> Result<(), AppError> {
        {
            let store = self.store.lock().await;
            store
                .set_temperature_unit(unit)
                .map_err(|e| crate::classify::classify(e.into()))?;
        }
        self.settings_tx
            .send_modify(|s| s.temperature_unit = unit);
        self.emit(AppEvent::SettingsChanged);
        Ok(())
    }

    /// Persist and publish a new wind speed unit.
    pub async fn set_wind_speed_unit(&self, unit: WindSpeedUnit) -> Result<(), AppError> {
        {
            let store = self.store.lock().await;
            store
                .set_wind_speed_unit(unit)
                .map_err(|e| crate::classify::classify(e.into()))?;
        }
        self.settings_tx.send_modify(|s| s.wind_speed_unit = unit);
        self.emit(AppEvent::SettingsChanged);
        Ok(())
    }

    /// Persist and publish a new theme mode.
    pub async fn set_theme_mode(&self, mode: ThemeMode) -> Result<(), AppError> {
        {
            let store = self.store.lock().await;
            store
                .set_theme_mode(mode)
                .map_err(|e| crate::classify::classify(e.into()))?;
        }
        self.settings_tx.send_modify(|s| s.theme_mode = mode);
        self.emit(AppEvent::SettingsChanged);
        Ok(())
    }
}

fn read_settings(store: &Store) -> SettingsSnapshot {
    SettingsSnapshot {
        temperature_unit: store.temperature_unit().unwrap_or_default(),
        wind_speed_unit: store.wind_speed_unit().unwrap_or_default(),
        theme_mode: store.theme_mode().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ErrorKind;

    fn create_test_alert(event: &str) -> WeatherAlert {
        WeatherAlert {
            sender: "Test Observatory".to_string(),
            event: event.to_string(),
            description: "Test alert".to_string(),
            starts_at: 1_700_000_000,
            ends_at: 1_700_020_000,
        }
    }

    #[tokio::test]
    async fn test_app_state_new() {
        let store = Store::open_in_memory().unwrap();
        let state = AppState::new(store);

        assert!(state.alerts().await.is_empty());
        assert!(state.last_error().await.is_none());
        assert_eq!(state.settings(), SettingsSnapshot::default());
    }

    #[tokio::test]
    async fn test_initial_snapshot_reads_persisted_settings() {
        let store = Store::open_in_memory().unwrap();
        store
            .set_temperature_unit(TemperatureUnit::Fahrenheit)
            .unwrap();

        let state = AppState::new(store);
        assert_eq!(
            state.settings().temperature_unit,
            TemperatureUnit::Fahrenheit
        );
    }

    #[tokio::test]
    async fn test_alert_set_replacement() {
        let store = Store::open_in_memory().unwrap();
        let state = AppState::new(store);

        state
            .set_alerts(vec![create_test_alert("Flood Warning")])
            .await;
        assert_eq!(state.alerts().await.len(), 1);

        // Replaced wholesale, not appended
        state
            .set_alerts(vec![create_test_alert("Heat Advisory")])
            .await;
        let alerts = state.alerts().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].event, "Heat Advisory");
    }

    #[tokio::test]
    async fn test_error_cell() {
        let store = Store::open_in_memory().unwrap();
        let state = AppState::new(store);

        state.set_error(AppError::no_location_selected()).await;
        assert_eq!(
            state.last_error().await.unwrap().kind,
            ErrorKind::Location
        );

        state.clear_error().await;
        assert!(state.last_error().await.is_none());
    }

    #[tokio::test]
    async fn test_settings_write_publishes_snapshot() {
        let store = Store::open_in_memory().unwrap();
        let state = AppState::new(store);

        let mut rx = state.watch_settings();
        assert_eq!(
            rx.borrow().wind_speed_unit,
            WindSpeedUnit::MetersPerSecond
        );

        state
            .set_wind_speed_unit(WindSpeedUnit::MilesPerHour)
            .await
            .unwrap();

        // The change is observable without any polling loop
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().wind_speed_unit, WindSpeedUnit::MilesPerHour);

        // And it was persisted
        let store = state.store.lock().await;
        assert_eq!(
            store.wind_speed_unit().unwrap(),
            WindSpeedUnit::MilesPerHour
        );
    }

    #[tokio::test]
    async fn test_settings_write_emits_event() {
        let store = Store::open_in_memory().unwrap();
        let state = AppState::new(store);

        let mut rx = state.subscribe();
        state.set_theme_mode(ThemeMode::Dark).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), AppEvent::SettingsChanged);
    }

    #[tokio::test]
    async fn test_events_reach_multiple_subscribers() {
        let store = Store::open_in_memory().unwrap();
        let state = AppState::new(store);

        let mut rx1 = state.subscribe();
        let mut rx2 = state.subscribe();

        state.emit(AppEvent::WeatherUpdated { location_id: 3 });

        assert_eq!(
            rx1.recv().await.unwrap(),
            AppEvent::WeatherUpdated { location_id: 3 }
        );
        assert_eq!(
            rx2.recv().await.unwrap(),
            AppEvent::WeatherUpdated { location_id: 3 }
        );
    }

    #[tokio::test]
    async fn test_emit_without_subscribers_is_fine() {
        let store = Store::open_in_memory().unwrap();
        let state = AppState::new(store);

        // Must not panic or error
        state.emit(AppEvent::LocationsChanged);
    }
}
