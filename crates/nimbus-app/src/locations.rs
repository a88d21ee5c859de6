//! Location management.
//!
//! Search, add/remove/favorite, switching the active location, and the
//! first-launch bootstrap that seeds a location from the device position.
//!
//! Two invariants live here and in the store beneath:
//! - at most one location is "using" (every switch is clear-then-set)
//! - a place is saved at most once (coordinates within the proximity
//!   threshold reuse the existing row instead of inserting a duplicate)

use tracing::{debug, info, warn};

use nimbus_api::{GeocodingClient, PositionProvider};
use nimbus_store::{NewLocation, StoredLocation};
use nimbus_types::GeoCandidate;

use crate::classify::{classify, AppError, ErrorKind};
use crate::state::{AppEvent, AppState};

/// Default number of candidates requested from the geocoding service.
pub const SEARCH_LIMIT: u32 = 5;

/// Coordinates location search and the saved-location set.
#[derive(Debug, Clone)]
pub struct LocationCoordinator {
    geocoding: GeocodingClient,
}

impl LocationCoordinator {
    /// Create a coordinator around a geocoding client.
    pub fn new(geocoding: GeocodingClient) -> Self {
        Self { geocoding }
    }

    /// Search for locations by name.
    ///
    /// Blank queries come back empty without a network call; candidate
    /// order is the upstream relevance order.
    pub async fn search(&self, query: &str) -> Result<Vec<GeoCandidate>, AppError> {
        self.geocoding
            .search(query, SEARCH_LIMIT)
            .await
            .map_err(|e| classify(e.into()))
    }

    /// Add a location from a search candidate.
    ///
    /// Coordinates near an already-saved location reuse that row. A plain
    /// add goes into the favorite set (subject to the cap); `set_as_using`
    /// makes the new or existing row the active forecast target instead.
    pub async fn add_candidate(
        &self,
        state: &AppState,
        candidate: &GeoCandidate,
        set_as_using: bool,
    ) -> Result<StoredLocation, AppError> {
        let location = {
            let store = state.store.lock().await;

            if let Some(existing) = store
                .find_nearby(candidate.coordinates())
                .map_err(map_store_error)?
            {
                debug!(
                    "Reusing saved location {} for {}",
                    existing.id,
                    candidate.display_name()
                );
                if set_as_using {
                    store.set_using(existing.id).map_err(map_store_error)?;
                }
                store
                    .get_location(existing.id)
                    .map_err(map_store_error)?
                    .unwrap_or(existing)
            } else {
                let new_location = if set_as_using {
                    NewLocation::new(
                        candidate.display_name(),
                        candidate.latitude,
                        candidate.longitude,
                    )
                    .country(candidate.country.clone())
                    .using()
                } else {
                    let count = store.favorite_count().map_err(map_store_error)? as i64;
                    NewLocation::new(
                        candidate.display_name(),
                        candidate.latitude,
                        candidate.longitude,
                    )
                    .country(candidate.country.clone())
                    .favorite(count)
                };

                store.insert_location(&new_location).map_err(map_store_error)?
            }
        };

        state.emit(AppEvent::LocationsChanged);
        Ok(location)
    }

    /// Make a location the active forecast target.
    pub async fn set_using(&self, state: &AppState, id: i64) -> Result<(), AppError> {
        {
            let store = state.store.lock().await;
            store.set_using(id).map_err(map_store_error)?;
        }
        state.emit(AppEvent::LocationsChanged);
        Ok(())
    }

    /// Add or remove a location from the favorite set.
    pub async fn set_favorite(
        &self,
        state: &AppState,
        id: i64,
        favorite: bool,
    ) -> Result<(), AppError> {
        {
            let store = state.store.lock().await;
            store.set_favorite(id, favorite).map_err(map_store_error)?;
        }
        state.emit(AppEvent::LocationsChanged);
        Ok(())
    }

    /// Delete a location; its cached weather goes with it.
    pub async fn remove(&self, state: &AppState, id: i64) -> Result<(), AppError> {
        {
            let store = state.store.lock().await;
            store.delete_location(id).map_err(map_store_error)?;
        }
        state.emit(AppEvent::LocationsChanged);
        Ok(())
    }

    /// First-launch bootstrap: seed the active location from the device
    /// position.
    ///
    /// Skipped entirely when an active location already exists. The
    /// position is reverse-geocoded for a display name (falling back to the
    /// position's own name, then raw coordinates), deduplicated against
    /// saved locations by proximity, and marked both "using" and "device
    /// location".
    ///
    /// Returns the seeded location, or `None` when the bootstrap was
    /// skipped.
    pub async fn bootstrap(
        &self,
        state: &AppState,
        provider: &dyn PositionProvider,
    ) -> Result<Option<StoredLocation>, AppError> {
        {
            let store = state.store.lock().await;
            if store.using_location().map_err(map_store_error)?.is_some() {
                debug!("Active location already set, skipping bootstrap");
                return Ok(None);
            }
        }

        let position = provider.locate().await.map_err(|e| {
            warn!("Device position lookup failed: {}", e);
            AppError::position_unavailable()
        })?;

        // Name the location; reverse-geocode failures fall back rather than
        // aborting the bootstrap
        let name = match self.geocoding.reverse(position.coordinates).await {
            Ok(Some(candidate)) => candidate.display_name(),
            Ok(None) => position
                .name
                .clone()
                .unwrap_or_else(|| position.coordinates.to_string()),
            Err(e) => {
                warn!("Reverse geocoding failed: {}", e);
                position
                    .name
                    .clone()
                    .unwrap_or_else(|| position.coordinates.to_string())
            }
        };

        let location = {
            let store = state.store.lock().await;

            match store
                .find_nearby(position.coordinates)
                .map_err(map_store_error)?
            {
                Some(existing) => {
                    store.set_using(existing.id).map_err(map_store_error)?;
                    store
                        .set_current_location(existing.id)
                        .map_err(map_store_error)?;
                    store
                        .get_location(existing.id)
                        .map_err(map_store_error)?
                        .unwrap_or(existing)
                }
                None => store
                    .insert_location(
                        &NewLocation::new(
                            name,
                            position.coordinates.latitude,
                            position.coordinates.longitude,
                        )
                        .country(position.country.clone())
                        .using()
                        .current_location(),
                    )
                    .map_err(map_store_error)?,
            }
        };

        info!("Bootstrapped active location: {}", location.name);
        state.emit(AppEvent::LocationsChanged);
        Ok(Some(location))
    }
}

/// Map store errors, giving the favorite cap its dedicated message.
fn map_store_error(err: nimbus_store::Error) -> AppError {
    match err {
        nimbus_store::Error::FavoriteLimitReached { max } => AppError::new(
            ErrorKind::Unknown,
            "Maximum favorite locations reached",
            format!(
                "You can have up to {} favorite locations. Please remove one before adding another.",
                max
            ),
        ),
        other => classify(other.into()),
    }
}
