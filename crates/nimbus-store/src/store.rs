//! Main store implementation.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use nimbus_types::{
    Coordinates, ForecastBundle, ForecastKind, TemperatureUnit, ThemeMode, WindSpeedUnit,
};

use crate::error::{Error, Result};
use crate::models::{NewLocation, StoredLocation, StoredWeatherRecord};
use crate::queries::ForecastQuery;
use crate::schema;

/// Default cap on the number of favorite locations.
pub const DEFAULT_MAX_FAVORITES: usize = 5;

/// SQLite-based store for Nimbus locations, forecasts, and settings.
pub struct Store {
    conn: Connection,
    max_favorites: usize,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        // Enable foreign keys (cascade delete relies on them) and WAL mode
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        // Initialize schema
        schema::initialize(&conn)?;

        Ok(Self {
            conn,
            max_favorites: DEFAULT_MAX_FAVORITES,
        })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        schema::initialize(&conn)?;
        Ok(Self {
            conn,
            max_favorites: DEFAULT_MAX_FAVORITES,
        })
    }

    /// Override the favorite cap (default [`DEFAULT_MAX_FAVORITES`]).
    pub fn set_max_favorites(&mut self, max_favorites: usize) {
        self.max_favorites = max_favorites;
    }

    /// The configured favorite cap.
    pub fn max_favorites(&self) -> usize {
        self.max_favorites
    }
}

// === Location operations ===

impl Store {
    /// Insert a location.
    ///
    /// A favorite insert is rejected when the cap is already reached. When
    /// `is_using` is set, the flag is cleared on all other rows in the same
    /// transaction so at most one location is ever active.
    pub fn insert_location(&self, location: &NewLocation) -> Result<StoredLocation> {
        if location.is_favorite && self.favorite_count()? >= self.max_favorites {
            return Err(Error::FavoriteLimitReached {
                max: self.max_favorites,
            });
        }

        let now = OffsetDateTime::now_utc().unix_timestamp();

        let tx = self.conn.unchecked_transaction()?;
        if location.is_using {
            tx.execute("UPDATE locations SET is_using = 0", [])?;
        }
        tx.execute(
            "INSERT INTO locations
             (name, latitude, longitude, country, is_favorite, is_current_location,
              is_using, sort_order, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                location.name,
                location.latitude,
                location.longitude,
                location.country,
                location.is_favorite,
                location.is_current_location,
                location.is_using,
                location.sort_order,
                now,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        debug!("Inserted location {} ({})", id, location.name);

        self.get_location(id)?.ok_or(Error::LocationNotFound(id))
    }

    /// Get a location by ID.
    pub fn get_location(&self, id: i64) -> Result<Option<StoredLocation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, latitude, longitude, country, is_favorite,
             is_current_location, is_using, sort_order, created_at
             FROM locations WHERE id = ?",
        )?;

        let location = stmt.query_row([id], map_location).optional()?;
        Ok(location)
    }

    /// List all locations.
    ///
    /// Ordered with the device location first, then favorites by sort
    /// position, then everything else by name.
    pub fn list_locations(&self) -> Result<Vec<StoredLocation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, latitude, longitude, country, is_favorite,
             is_current_location, is_using, sort_order, created_at
             FROM locations
             ORDER BY is_current_location DESC, is_favorite DESC, sort_order ASC, name ASC",
        )?;

        let locations = stmt
            .query_map([], map_location)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(locations)
    }

    /// List favorite locations by sort position.
    pub fn favorite_locations(&self) -> Result<Vec<StoredLocation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, latitude, longitude, country, is_favorite,
             is_current_location, is_using, sort_order, created_at
             FROM locations WHERE is_favorite = 1
             ORDER BY sort_order ASC, name ASC",
        )?;

        let locations = stmt
            .query_map([], map_location)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(locations)
    }

    /// Count favorite locations.
    pub fn favorite_count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM locations WHERE is_favorite = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Get the active forecast target, if one is set.
    pub fn using_location(&self) -> Result<Option<StoredLocation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, latitude, longitude, country, is_favorite,
             is_current_location, is_using, sort_order, created_at
             FROM locations WHERE is_using = 1 LIMIT 1",
        )?;

        let location = stmt.query_row([], map_location).optional()?;
        Ok(location)
    }

    /// Find a saved location near the given coordinates.
    ///
    /// Proximity is the flat-delta comparison from
    /// [`Coordinates::is_near`]; the scan happens in Rust so the threshold
    /// semantics live in one place.
    pub fn find_nearby(&self, coordinates: Coordinates) -> Result<Option<StoredLocation>> {
        let locations = self.list_locations()?;
        Ok(locations
            .into_iter()
            .find(|l| l.coordinates().is_near(&coordinates)))
    }

    /// Mark a location as the active forecast target.
    ///
    /// Clears the flag on all rows, then sets it on the target, inside one
    /// transaction. This is the only writer path for the `is_using` flag.
    pub fn set_using(&self, id: i64) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute("UPDATE locations SET is_using = 0", [])?;
        let updated = tx.execute("UPDATE locations SET is_using = 1 WHERE id = ?", [id])?;

        if updated == 0 {
            return Err(Error::LocationNotFound(id));
        }

        tx.commit()?;
        debug!("Location {} is now the active forecast target", id);
        Ok(())
    }

    /// Mark a location as the device location.
    ///
    /// Clear-then-set like [`Store::set_using`]: only one row carries the
    /// flag.
    pub fn set_current_location(&self, id: i64) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute("UPDATE locations SET is_current_location = 0", [])?;
        let updated = tx.execute(
            "UPDATE locations SET is_current_location = 1 WHERE id = ?",
            [id],
        )?;

        if updated == 0 {
            return Err(Error::LocationNotFound(id));
        }

        tx.commit()?;
        Ok(())
    }

    /// Add or remove a location from the favorite set.
    ///
    /// Enabling is rejected when the cap is already reached; the new
    /// favorite is appended at the end of the sort order.
    pub fn set_favorite(&self, id: i64, favorite: bool) -> Result<()> {
        let current = self
            .get_location(id)?
            .ok_or(Error::LocationNotFound(id))?;

        if favorite && !current.is_favorite {
            let count = self.favorite_count()?;
            if count >= self.max_favorites {
                return Err(Error::FavoriteLimitReached {
                    max: self.max_favorites,
                });
            }
            self.conn.execute(
                "UPDATE locations SET is_favorite = 1, sort_order = ?2 WHERE id = ?1",
                rusqlite::params![id, count as i64],
            )?;
        } else if !favorite {
            self.conn
                .execute("UPDATE locations SET is_favorite = 0 WHERE id = ?", [id])?;
        }

        Ok(())
    }

    /// Delete a location.
    ///
    /// Cached weather rows go with it via the cascade.
    pub fn delete_location(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM locations WHERE id = ?", [id])?;
        Ok(())
    }
}

// === Forecast operations ===

impl Store {
    /// Replace all cached weather for a location with a fresh bundle.
    ///
    /// Deletes every existing row for the location, then inserts the new
    /// current/hourly/daily sets, all in one transaction, so the cache never
    /// mixes forecast horizons from two fetch times. Hourly and daily
    /// entries without a condition are skipped with a warning rather than
    /// cached as partial rows.
    ///
    /// Returns the number of rows inserted.
    pub fn replace_forecasts(&self, location_id: i64, bundle: &ForecastBundle) -> Result<usize> {
        if self.get_location(location_id)?.is_none() {
            return Err(Error::LocationNotFound(location_id));
        }

        let tx = self.conn.unchecked_transaction()?;

        // Clear previous data for this location before inserting new data
        let deleted = tx.execute(
            "DELETE FROM weather_records WHERE location_id = ?",
            [location_id],
        )?;

        let mut inserted = 0;

        insert_record(
            &tx,
            &StoredWeatherRecord::from_current(location_id, &bundle.current),
        )?;
        inserted += 1;

        for entry in &bundle.hourly {
            match StoredWeatherRecord::from_hourly(location_id, entry) {
                Some(record) => {
                    insert_record(&tx, &record)?;
                    inserted += 1;
                }
                None => {
                    warn!(
                        "Skipping hourly entry without condition at {}",
                        entry.forecast_at
                    );
                }
            }
        }

        for entry in &bundle.daily {
            match StoredWeatherRecord::from_daily(location_id, entry) {
                Some(record) => {
                    insert_record(&tx, &record)?;
                    inserted += 1;
                }
                None => {
                    warn!(
                        "Skipping daily entry without condition at {}",
                        entry.forecast_at
                    );
                }
            }
        }

        tx.commit()?;

        info!(
            "Replaced weather for location {}: {} rows out, {} rows in",
            location_id, deleted, inserted
        );

        Ok(inserted)
    }

    /// Get the cached current conditions for a location, if any.
    pub fn current_weather(&self, location_id: i64) -> Result<Option<StoredWeatherRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, location_id, temperature, feels_like, condition, condition_icon,
             humidity, wind_speed, wind_direction, pressure, uv_index, visibility,
             timestamp, forecast_kind
             FROM weather_records
             WHERE location_id = ? AND forecast_kind = 'current'
             ORDER BY timestamp DESC LIMIT 1",
        )?;

        let record = stmt.query_row([location_id], map_record).optional()?;
        Ok(record)
    }

    /// Get the cached hourly forecast for a location, chronological.
    pub fn hourly_forecast(&self, location_id: i64) -> Result<Vec<StoredWeatherRecord>> {
        self.query_forecasts(
            &ForecastQuery::new()
                .location(location_id)
                .kind(ForecastKind::Hourly),
        )
    }

    /// Get the cached daily forecast for a location, chronological.
    pub fn daily_forecast(&self, location_id: i64) -> Result<Vec<StoredWeatherRecord>> {
        self.query_forecasts(
            &ForecastQuery::new()
                .location(location_id)
                .kind(ForecastKind::Daily),
        )
    }

    /// Query cached forecast rows with filters.
    pub fn query_forecasts(&self, query: &ForecastQuery) -> Result<Vec<StoredWeatherRecord>> {
        let sql = query.build_sql();
        let (_, params) = query.build_where();

        debug!("Executing query: {}", sql);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params_ref.as_slice(), map_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Count cached forecast rows, optionally filtered.
    pub fn count_forecasts(
        &self,
        location_id: Option<i64>,
        kind: Option<ForecastKind>,
    ) -> Result<u64> {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(location_id) = location_id {
            conditions.push("location_id = ?");
            params.push(Box::new(location_id));
        }
        if let Some(kind) = kind {
            conditions.push("forecast_kind = ?");
            params.push(Box::new(kind.as_str()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!("SELECT COUNT(*) FROM weather_records {}", where_clause);
        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let count: i64 = self
            .conn
            .query_row(&sql, params_ref.as_slice(), |row| row.get(0))?;

        Ok(count as u64)
    }
}

// === Settings operations ===

impl Store {
    /// Get a raw setting value.
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a raw setting value.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    /// The configured temperature display unit (default on unknown values).
    pub fn temperature_unit(&self) -> Result<TemperatureUnit> {
        Ok(self
            .get_setting("temperature_unit")?
            .map(|v| TemperatureUnit::from_stored(&v))
            .unwrap_or_default())
    }

    /// Persist the temperature display unit.
    pub fn set_temperature_unit(&self, unit: TemperatureUnit) -> Result<()> {
        self.set_setting("temperature_unit", unit.as_str())
    }

    /// The configured wind speed display unit (default on unknown values).
    pub fn wind_speed_unit(&self) -> Result<WindSpeedUnit> {
        Ok(self
            .get_setting("wind_speed_unit")?
            .map(|v| WindSpeedUnit::from_stored(&v))
            .unwrap_or_default())
    }

    /// Persist the wind speed display unit.
    pub fn set_wind_speed_unit(&self, unit: WindSpeedUnit) -> Result<()> {
        self.set_setting("wind_speed_unit", unit.as_str())
    }

    /// The configured theme mode (default on unknown values).
    pub fn theme_mode(&self) -> Result<ThemeMode> {
        Ok(self
            .get_setting("theme_mode")?
            .map(|v| ThemeMode::from_stored(&v))
            .unwrap_or_default())
    }

    /// Persist the theme mode.
    pub fn set_theme_mode(&self, mode: ThemeMode) -> Result<()> {
        self.set_setting("theme_mode", mode.as_str())
    }
}

fn map_location(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredLocation> {
    Ok(StoredLocation {
        id: row.get(0)?,
        name: row.get(1)?,
        latitude: row.get(2)?,
        longitude: row.get(3)?,
        country: row.get(4)?,
        is_favorite: row.get(5)?,
        is_current_location: row.get(6)?,
        is_using: row.get(7)?,
        sort_order: row.get(8)?,
        created_at: OffsetDateTime::from_unix_timestamp(row.get(9)?).unwrap(),
    })
}

fn map_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredWeatherRecord> {
    Ok(StoredWeatherRecord {
        id: row.get(0)?,
        location_id: row.get(1)?,
        temperature: row.get(2)?,
        feels_like: row.get(3)?,
        condition: row.get(4)?,
        condition_icon: row.get(5)?,
        humidity: row.get::<_, i64>(6)? as u8,
        wind_speed: row.get(7)?,
        wind_direction: row.get::<_, Option<i64>>(8)?.map(|v| v as i32),
        pressure: row.get(9)?,
        uv_index: row.get(10)?,
        visibility: row.get(11)?,
        timestamp: from_millis(row.get(12)?),
        kind: ForecastKind::parse(&row.get::<_, String>(13)?).unwrap_or(ForecastKind::Current),
    })
}

fn insert_record(conn: &Connection, record: &StoredWeatherRecord) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO weather_records
         (location_id, temperature, feels_like, condition, condition_icon, humidity,
          wind_speed, wind_direction, pressure, uv_index, visibility, timestamp, forecast_kind)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        rusqlite::params![
            record.location_id,
            record.temperature,
            record.feels_like,
            record.condition,
            record.condition_icon,
            record.humidity,
            record.wind_speed,
            record.wind_direction,
            record.pressure,
            record.uv_index,
            record.visibility,
            to_millis(record.timestamp),
            record.kind.as_str(),
        ],
    )?;
    Ok(())
}

/// Timestamps are stored as epoch milliseconds.
fn to_millis(time: OffsetDateTime) -> i64 {
    (time.unix_timestamp_nanos() / 1_000_000) as i64
}

fn from_millis(millis: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_types::{Condition, CurrentConditions, DailyEntry, HourlyEntry};

    fn create_test_current(temp: f64, observed_at: i64) -> CurrentConditions {
        CurrentConditions {
            observed_at: OffsetDateTime::from_unix_timestamp(observed_at).unwrap(),
            temperature: temp,
            feels_like: temp - 0.5,
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

    fn create_test_hourly(temp: f64, forecast_at: i64, condition: Option<&str>) -> HourlyEntry {
        HourlyEntry {
            forecast_at: OffsetDateTime::from_unix_timestamp(forecast_at).unwrap(),
            temperature: temp,
            feels_like: temp - 0.5,
            condition: condition.map(|label| Condition {
                label: label.to_string(),
                icon: Some("10d".to_string()),
            }),
            humidity: 70,
            wind_speed: 2.8,
            wind_direction: Some(175),
            pressure: Some(1012.0),
            uv_index: Some(3.0),
            visibility: Some(10_000.0),
            precipitation_chance: 0.4,
        }
    }

    fn create_test_daily(temp: f64, forecast_at: i64) -> DailyEntry {
        DailyEntry {
            forecast_at: OffsetDateTime::from_unix_timestamp(forecast_at).unwrap(),
            temperature: temp,
            feels_like: temp - 0.4,
            temperature_min: temp - 5.0,
            temperature_max: temp + 2.0,
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
        }
    }

    fn create_test_bundle(temp: f64, base_time: i64) -> ForecastBundle {
        ForecastBundle {
            current: create_test_current(temp, base_time),
            hourly: vec![
                create_test_hourly(temp - 1.0, base_time + 3600, Some("Rain")),
                create_test_hourly(temp - 1.5, base_time + 7200, Some("Rain")),
            ],
            daily: vec![create_test_daily(temp + 1.0, base_time + 43_200)],
            alerts: Vec::new(),
        }
    }

    fn insert_test_location(store: &Store, name: &str, lat: f64, lon: f64) -> StoredLocation {
        store
            .insert_location(&NewLocation::new(name, lat, lon))
            .unwrap()
    }

    #[test]
    fn test_open_in_memory() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.list_locations().unwrap().is_empty());
    }

    #[test]
    fn test_open_on_disk_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.db");

        let store = Store::open(&path).unwrap();
        insert_test_location(&store, "Disk", 1.0, 2.0);
        drop(store);

        // Reopen and verify persistence
        let store = Store::open(&path).unwrap();
        assert_eq!(store.list_locations().unwrap().len(), 1);
    }

    #[test]
    fn test_insert_and_get_location() {
        let store = Store::open_in_memory().unwrap();

        let location = store
            .insert_location(
                &NewLocation::new("Hong Kong", 22.3193, 114.1694)
                    .country(Some("HK".to_string()))
                    .using(),
            )
            .unwrap();

        assert_eq!(location.name, "Hong Kong");
        assert!(location.is_using);
        assert!(!location.is_favorite);

        let fetched = store.get_location(location.id).unwrap().unwrap();
        assert_eq!(fetched.country.as_deref(), Some("HK"));
    }

    #[test]
    fn test_at_most_one_using_location() {
        let store = Store::open_in_memory().unwrap();

        let a = insert_test_location(&store, "A", 1.0, 1.0);
        let b = insert_test_location(&store, "B", 2.0, 2.0);
        let c = insert_test_location(&store, "C", 3.0, 3.0);

        for id in [a.id, b.id, c.id, b.id] {
            store.set_using(id).unwrap();

            let using: Vec<_> = store
                .list_locations()
                .unwrap()
                .into_iter()
                .filter(|l| l.is_using)
                .collect();
            assert_eq!(using.len(), 1);
            assert_eq!(using[0].id, id);
        }
    }

    #[test]
    fn test_insert_using_location_clears_previous() {
        let store = Store::open_in_memory().unwrap();

        store
            .insert_location(&NewLocation::new("A", 1.0, 1.0).using())
            .unwrap();
        let b = store
            .insert_location(&NewLocation::new("B", 2.0, 2.0).using())
            .unwrap();

        let using = store.using_location().unwrap().unwrap();
        assert_eq!(using.id, b.id);
    }

    #[test]
    fn test_set_using_unknown_location() {
        let store = Store::open_in_memory().unwrap();
        let err = store.set_using(42).unwrap_err();
        assert!(matches!(err, Error::LocationNotFound(42)));
    }

    #[test]
    fn test_favorite_cap_enforced_on_insert() {
        let store = Store::open_in_memory().unwrap();

        for i in 0..5 {
            store
                .insert_location(
                    &NewLocation::new(format!("Fav {}", i), i as f64, i as f64).favorite(i),
                )
                .unwrap();
        }
        assert_eq!(store.favorite_count().unwrap(), 5);

        // The sixth favorite is rejected and not persisted
        let err = store
            .insert_location(&NewLocation::new("Fav 5", 9.0, 9.0).favorite(5))
            .unwrap_err();
        assert!(matches!(err, Error::FavoriteLimitReached { max: 5 }));
        assert_eq!(store.favorite_count().unwrap(), 5);
        assert_eq!(store.list_locations().unwrap().len(), 5);
    }

    #[test]
    fn test_favorite_cap_enforced_on_toggle() {
        let store = Store::open_in_memory().unwrap();

        for i in 0..5 {
            store
                .insert_location(
                    &NewLocation::new(format!("Fav {}", i), i as f64, i as f64).favorite(i),
                )
                .unwrap();
        }
        let plain = insert_test_location(&store, "Plain", 9.0, 9.0);

        let err = store.set_favorite(plain.id, true).unwrap_err();
        assert!(matches!(err, Error::FavoriteLimitReached { .. }));

        // Unfavoriting one makes room
        let first = store.favorite_locations().unwrap()[0].id;
        store.set_favorite(first, false).unwrap();
        store.set_favorite(plain.id, true).unwrap();
        assert_eq!(store.favorite_count().unwrap(), 5);
    }

    #[test]
    fn test_find_nearby_uses_flat_delta() {
        let store = Store::open_in_memory().unwrap();
        insert_test_location(&store, "Hong Kong", 22.3193, 114.1694);

        let near = store
            .find_nearby(Coordinates::new(22.3199, 114.1690))
            .unwrap();
        assert!(near.is_some());

        let far = store
            .find_nearby(Coordinates::new(22.3205, 114.1694))
            .unwrap();
        assert!(far.is_none());
    }

    #[test]
    fn test_replace_forecasts_replaces_not_merges() {
        let store = Store::open_in_memory().unwrap();
        let location = insert_test_location(&store, "Hong Kong", 22.3193, 114.1694);

        // First refresh at t0, second at t0 + 1h with different timestamps
        store
            .replace_forecasts(location.id, &create_test_bundle(22.0, 1_700_000_000))
            .unwrap();
        store
            .replace_forecasts(location.id, &create_test_bundle(25.0, 1_700_003_600))
            .unwrap();

        // Only rows from the second fetch survive
        let current = store.current_weather(location.id).unwrap().unwrap();
        assert_eq!(current.temperature, 25.0);

        let count = store
            .count_forecasts(Some(location.id), Some(ForecastKind::Current))
            .unwrap();
        assert_eq!(count, 1);

        // No hourly rows from the first fetch's timestamps remain
        let hourly = store.hourly_forecast(location.id).unwrap();
        assert_eq!(hourly.len(), 2);
        for record in &hourly {
            assert!(record.timestamp.unix_timestamp() >= 1_700_003_600);
        }
    }

    #[test]
    fn test_replace_forecasts_drops_hourly_without_condition() {
        let store = Store::open_in_memory().unwrap();
        let location = insert_test_location(&store, "A", 1.0, 1.0);

        let bundle = ForecastBundle {
            current: create_test_current(20.0, 1_700_000_000),
            hourly: vec![
                create_test_hourly(19.0, 1_700_003_600, Some("Rain")),
                create_test_hourly(18.5, 1_700_007_200, None),
                create_test_hourly(18.0, 1_700_010_800, Some("Clouds")),
            ],
            daily: Vec::new(),
            alerts: Vec::new(),
        };

        store.replace_forecasts(location.id, &bundle).unwrap();

        // Exactly the conditionless entry is excluded
        let hourly = store.hourly_forecast(location.id).unwrap();
        assert_eq!(hourly.len(), 2);
        assert_eq!(hourly[0].condition, "Rain");
        assert_eq!(hourly[1].condition, "Clouds");
        assert_eq!(hourly[1].timestamp.unix_timestamp(), 1_700_010_800);
    }

    #[test]
    fn test_replace_forecasts_unknown_location() {
        let store = Store::open_in_memory().unwrap();
        let err = store
            .replace_forecasts(99, &create_test_bundle(20.0, 1_700_000_000))
            .unwrap_err();
        assert!(matches!(err, Error::LocationNotFound(99)));
    }

    #[test]
    fn test_forecasts_ordered_chronologically() {
        let store = Store::open_in_memory().unwrap();
        let location = insert_test_location(&store, "A", 1.0, 1.0);

        store
            .replace_forecasts(location.id, &create_test_bundle(20.0, 1_700_000_000))
            .unwrap();

        let hourly = store.hourly_forecast(location.id).unwrap();
        assert!(hourly[0].timestamp < hourly[1].timestamp);

        let daily = store.daily_forecast(location.id).unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].kind, ForecastKind::Daily);
    }

    #[test]
    fn test_query_forecasts_limit() {
        let store = Store::open_in_memory().unwrap();
        let location = insert_test_location(&store, "A", 1.0, 1.0);

        store
            .replace_forecasts(location.id, &create_test_bundle(20.0, 1_700_000_000))
            .unwrap();

        let rows = store
            .query_forecasts(
                &ForecastQuery::new()
                    .location(location.id)
                    .kind(ForecastKind::Hourly)
                    .limit(1),
            )
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_delete_location_cascades_to_weather() {
        let store = Store::open_in_memory().unwrap();
        let location = insert_test_location(&store, "A", 1.0, 1.0);

        store
            .replace_forecasts(location.id, &create_test_bundle(20.0, 1_700_000_000))
            .unwrap();
        assert!(store.count_forecasts(Some(location.id), None).unwrap() > 0);

        store.delete_location(location.id).unwrap();

        assert!(store.get_location(location.id).unwrap().is_none());
        assert_eq!(store.count_forecasts(Some(location.id), None).unwrap(), 0);
    }

    #[test]
    fn test_record_round_trip_preserves_optionals() {
        let store = Store::open_in_memory().unwrap();
        let location = insert_test_location(&store, "A", 1.0, 1.0);

        let mut bundle = create_test_bundle(20.0, 1_700_000_000);
        bundle.current.pressure = None;
        bundle.current.wind_direction = Some(-10);

        store.replace_forecasts(location.id, &bundle).unwrap();

        let current = store.current_weather(location.id).unwrap().unwrap();
        assert!(current.pressure.is_none());
        // Negative direction stored as absent, not as a sentinel
        assert!(current.wind_direction.is_none());
        assert_eq!(current.timestamp.unix_timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_settings_defaults_and_round_trip() {
        let store = Store::open_in_memory().unwrap();

        assert_eq!(store.temperature_unit().unwrap(), TemperatureUnit::Celsius);
        assert_eq!(
            store.wind_speed_unit().unwrap(),
            WindSpeedUnit::MetersPerSecond
        );
        assert_eq!(store.theme_mode().unwrap(), ThemeMode::System);

        store
            .set_temperature_unit(TemperatureUnit::Fahrenheit)
            .unwrap();
        store
            .set_wind_speed_unit(WindSpeedUnit::KilometersPerHour)
            .unwrap();
        store.set_theme_mode(ThemeMode::Dark).unwrap();

        assert_eq!(
            store.temperature_unit().unwrap(),
            TemperatureUnit::Fahrenheit
        );
        assert_eq!(
            store.wind_speed_unit().unwrap(),
            WindSpeedUnit::KilometersPerHour
        );
        assert_eq!(store.theme_mode().unwrap(), ThemeMode::Dark);
    }

    #[test]
    fn test_settings_unknown_value_falls_back_to_default() {
        let store = Store::open_in_memory().unwrap();

        store.set_setting("temperature_unit", "kelvin").unwrap();
        assert_eq!(store.temperature_unit().unwrap(), TemperatureUnit::Celsius);
    }
}
