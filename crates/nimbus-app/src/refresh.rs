//! Refresh coordination.
//!
//! One refresh of the active location may be in flight at a time,
//! process-wide: only one location is ever "using", so a global guard is
//! enough to keep the delete-then-insert sequence for a location from
//! interleaving with itself. A second call while one is outstanding is a
//! silent no-op, not queued.
//!
//! The guard is released by an RAII drop, so success, failure, and an
//! abandoned task all return the state to idle.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::classify::{classify, AppError};
use crate::repository::CacheRepository;
use crate::state::{AppEvent, AppState};

/// Single-flight tracking for refreshes.
pub struct RefreshState {
    in_flight: AtomicBool,
}

impl RefreshState {
    /// Create idle refresh state.
    pub fn new() -> Self {
        Self {
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a refresh is currently outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Try to begin a refresh.
    ///
    /// Returns `None` when one is already in flight. The returned guard
    /// releases the slot on drop.
    pub fn try_begin(&self) -> Option<RefreshGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| RefreshGuard { state: self })
    }
}

impl Default for RefreshState {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard holding the single-flight slot.
///
/// Dropping the guard releases the slot, whichever path the refresh took.
pub struct RefreshGuard<'a> {
    state: &'a RefreshState,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.state.in_flight.store(false, Ordering::SeqCst);
    }
}

/// What a refresh call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The cache was replaced and alerts updated.
    Refreshed,
    /// Another refresh was in flight; this call did nothing.
    AlreadyRunning,
    /// The refresh ran and failed; the error is stored for display.
    Failed,
}

/// Orchestrates "fetch for the active location, update cache, surface
/// errors".
#[derive(Debug, Clone)]
pub struct RefreshCoordinator {
    repository: CacheRepository,
}

impl RefreshCoordinator {
    /// Create a coordinator around a cache repository.
    pub fn new(repository: CacheRepository) -> Self {
        Self { repository }
    }

    /// Refresh the active location.
    ///
    /// Reads the "using" location; with none configured this surfaces a
    /// location error and performs no network call. On success the
    /// in-memory alert set is replaced; on failure the classified error is
    /// stored and the previous cache stays visible. Either way the state
    /// returns to idle.
    pub async fn refresh_active(&self, state: &AppState) -> RefreshOutcome {
        let Some(_guard) = state.refresh.try_begin() else {
            debug!("Refresh already in flight, ignoring");
            return RefreshOutcome::AlreadyRunning;
        };

        state.clear_error().await;

        let location = {
            let store = state.store.lock().await;
            match store.using_location() {
                Ok(location) => location,
                Err(e) => {
                    let error = classify(e.into());
                    state.set_error(error).await;
                    return RefreshOutcome::Failed;
                }
            }
        };

        let Some(location) = location else {
            state.set_error(AppError::no_location_selected()).await;
            return RefreshOutcome::Failed;
        };

        match self
            .repository
            .refresh(&state.store, location.id, location.coordinates())
            .await
        {
            Ok(alerts) => {
                info!("Refreshed weather for {}", location.name);
                state.set_alerts(alerts).await;
                state.emit(AppEvent::WeatherUpdated {
                    location_id: location.id,
                });
                RefreshOutcome::Refreshed
            }
            Err(failure) => {
                let error = classify(failure);
                warn!("Refresh failed for {}: {}", location.name, error);
                state.set_error(error).await;
                RefreshOutcome::Failed
            }
        }
    }

    /// Refresh every saved location, as done once at startup.
    ///
    /// Each location's refresh is isolated: one failure logs a warning and
    /// the rest continue. Holds the single-flight slot for the whole pass;
    /// returns the number of locations refreshed, or `None` when a refresh
    /// was already in flight.
    pub async fn refresh_all(&self, state: &AppState) -> Option<usize> {
        let Some(_guard) = state.refresh.try_begin() else {
            debug!("Refresh already in flight, skipping bulk refresh");
            return None;
        };

        let locations = {
            let store = state.store.lock().await;
            match store.list_locations() {
                Ok(locations) => locations,
                Err(e) => {
                    warn!("Could not list locations for bulk refresh: {}", e);
                    return Some(0);
                }
            }
        };

        let mut refreshed = 0;
        for location in locations {
            match self
                .repository
                .refresh(&state.store, location.id, location.coordinates())
                .await
            {
                Ok(_) => {
                    refreshed += 1;
                    state.emit(AppEvent::WeatherUpdated {
                        location_id: location.id,
                    });
                }
                Err(failure) => {
                    // Continue with other locations even if one fails
                    warn!(
                        "Startup refresh failed for {}: {}",
                        location.name,
                        classify(failure)
                    );
                }
            }
        }

        info!("Startup refresh complete: {} location(s)", refreshed);
        Some(refreshed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_begin_is_exclusive() {
        let state = RefreshState::new();
        assert!(!state.is_refreshing());

        let guard = state.try_begin().unwrap();
        assert!(state.is_refreshing());

        // Second begin is refused while the guard lives
        assert!(state.try_begin().is_none());

        drop(guard);
        assert!(!state.is_refreshing());
        assert!(state.try_begin().is_some());
    }

    #[test]
    fn test_guard_releases_on_drop_in_error_path() {
        let state = RefreshState::new();

        // Simulate a refresh path that bails early
        fn failing_path(state: &RefreshState) -> Result<(), ()> {
            let _guard = state.try_begin().ok_or(())?;
            Err(())
        }

        let _ = failing_path(&state);
        assert!(!state.is_refreshing());
    }
}
