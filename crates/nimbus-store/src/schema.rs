//! Database schema and migrations.

use rusqlite::Connection;

use crate::error::Result;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
pub fn initialize(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        // Fresh database - create all tables
        create_schema_v1(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if version < SCHEMA_VERSION {
        // Run migrations
        migrate(conn, version)?;
    }

    Ok(())
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> Result<i32> {
    // Check if the schema_version table exists
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 =
        conn.query_row("SELECT version FROM schema_version", [], |row| row.get(0))?;

    Ok(version)
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?)",
        [version],
    )?;
    Ok(())
}

/// Create the initial schema (version 1).
fn create_schema_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL
        );

        -- Saved locations
        CREATE TABLE IF NOT EXISTS locations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            country TEXT,
            is_favorite INTEGER NOT NULL DEFAULT 0,
            is_current_location INTEGER NOT NULL DEFAULT 0,
            is_using INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL
        );

        -- Cached forecast rows, partitioned per location and forecast kind.
        -- One slot per (location, timestamp, kind); re-inserting a slot
        -- replaces the previous row.
        CREATE TABLE IF NOT EXISTS weather_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            location_id INTEGER NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
            temperature REAL NOT NULL,
            feels_like REAL NOT NULL,
            condition TEXT NOT NULL,
            condition_icon TEXT,
            humidity INTEGER NOT NULL,
            wind_speed REAL NOT NULL,
            wind_direction INTEGER,
            pressure REAL,
            uv_index REAL,
            visibility REAL,
            timestamp INTEGER NOT NULL,
            forecast_kind TEXT NOT NULL,
            UNIQUE(location_id, timestamp, forecast_kind)
        );
        CREATE INDEX IF NOT EXISTS idx_weather_location
            ON weather_records(location_id);
        CREATE INDEX IF NOT EXISTS idx_weather_location_kind_time
            ON weather_records(location_id, forecast_kind, timestamp);

        -- User settings (key-value scalars)
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )?;

    Ok(())
}

/// Run migrations from old_version to current.
fn migrate(conn: &Connection, old_version: i32) -> Result<()> {
    // Add future migrations here
    // if old_version < 2 { migrate_to_v2(conn)?; }

    let _ = old_version; // Suppress unused warning
    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_fresh_database() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        // Verify tables exist
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"locations".to_string()));
        assert!(tables.contains(&"weather_records".to_string()));
        assert!(tables.contains(&"settings".to_string()));
        assert!(tables.contains(&"schema_version".to_string()));
    }

    #[test]
    fn test_schema_version_tracking() {
        let conn = Connection::open_in_memory().unwrap();

        // Fresh database should have version 0
        assert_eq!(get_schema_version(&conn).unwrap(), 0);

        // After initialization, should have current version
        initialize(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_weather_slot_uniqueness() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        conn.execute(
            "INSERT INTO locations (name, latitude, longitude, created_at) VALUES ('A', 0, 0, 0)",
            [],
        )
        .unwrap();

        let insert = "INSERT OR REPLACE INTO weather_records
            (location_id, temperature, feels_like, condition, humidity, wind_speed, timestamp, forecast_kind)
            VALUES (1, ?1, ?1, 'Clear', 50, 1.0, 1000, 'current')";
        conn.execute(insert, [22.0]).unwrap();
        conn.execute(insert, [25.0]).unwrap();

        let (count, temp): (i64, f64) = conn
            .query_row(
                "SELECT COUNT(*), MAX(temperature) FROM weather_records",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();

        // Same slot replaced, not duplicated
        assert_eq!(count, 1);
        assert_eq!(temp, 25.0);
    }
}
