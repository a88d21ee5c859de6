//! Query builder for cached forecast rows.
//!
//! [`ForecastQuery`] follows the builder pattern for filtering cached
//! weather by location, forecast kind, and time range, with pagination.
//!
//! # Example
//!
//! ```
//! use nimbus_store::{ForecastQuery, Store};
//! use nimbus_types::ForecastKind;
//!
//! let store = Store::open_in_memory()?;
//!
//! // The next 24 cached forecast hours for a location
//! let query = ForecastQuery::new()
//!     .location(1)
//!     .kind(ForecastKind::Hourly)
//!     .limit(24);
//!
//! let rows = store.query_forecasts(&query)?;
//! assert!(rows.is_empty());
//! # Ok::<(), nimbus_store::Error>(())
//! ```

use time::OffsetDateTime;

use nimbus_types::ForecastKind;

/// Fluent query builder for cached forecast rows.
///
/// Use this to construct queries for
/// [`Store::query_forecasts`](crate::Store::query_forecasts). All filter
/// methods are optional and can be chained in any order.
///
/// By default, results are ordered by `timestamp` ascending (chronological),
/// which is the display order for forecasts.
#[derive(Debug, Default, Clone)]
pub struct ForecastQuery {
    /// Filter by owning location.
    pub location_id: Option<i64>,
    /// Filter by forecast kind.
    pub kind: Option<ForecastKind>,
    /// Filter rows at or after this time.
    pub since: Option<OffsetDateTime>,
    /// Filter rows at or before this time.
    pub until: Option<OffsetDateTime>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Order by timestamp descending (newest first).
    pub newest_first: bool,
}

impl ForecastQuery {
    /// Create a new query with default settings (chronological order,
    /// no filters).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by owning location.
    pub fn location(mut self, location_id: i64) -> Self {
        self.location_id = Some(location_id);
        self
    }

    /// Filter by forecast kind.
    pub fn kind(mut self, kind: ForecastKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Filter to rows at or after this time.
    pub fn since(mut self, time: OffsetDateTime) -> Self {
        self.since = Some(time);
        self
    }

    /// Filter to rows at or before this time.
    pub fn until(mut self, time: OffsetDateTime) -> Self {
        self.until = Some(time);
        self
    }

    /// Limit the maximum number of results returned.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Order results by newest first (descending by `timestamp`).
    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    /// Build the SQL WHERE clause and parameters.
    pub(crate) fn build_where(&self) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(location_id) = self.location_id {
            conditions.push("location_id = ?");
            params.push(Box::new(location_id));
        }

        if let Some(kind) = self.kind {
            conditions.push("forecast_kind = ?");
            params.push(Box::new(kind.as_str()));
        }

        if let Some(since) = self.since {
            conditions.push("timestamp >= ?");
            params.push(Box::new(
                (since.unix_timestamp_nanos() / 1_000_000) as i64,
            ));
        }

        if let Some(until) = self.until {
            conditions.push("timestamp <= ?");
            params.push(Box::new(
                (until.unix_timestamp_nanos() / 1_000_000) as i64,
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self) -> String {
        let (where_clause, _) = self.build_where();
        let order = if self.newest_first { "DESC" } else { "ASC" };

        let mut sql = format!(
            "SELECT id, location_id, temperature, feels_like, condition, condition_icon,
             humidity, wind_speed, wind_direction, pressure, uv_index, visibility,
             timestamp, forecast_kind
             FROM weather_records {} ORDER BY timestamp {}",
            where_clause, order
        );

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        sql
    }
}
