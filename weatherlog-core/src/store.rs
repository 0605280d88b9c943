//! SQLite-backed persistence for daily weather records.
//!
//! Raw rows never leave this module: every read and write goes through the
//! single `row_to_record` mapping. A store assumes one writer at a time;
//! callers needing concurrency must funnel mutations through one owner.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, Row, params};
use std::path::Path;
use tracing::debug;

use crate::{
    error::{Error, Result},
    location::{LocationKind, LocationSpec},
    model::{DailyWeather, WeatherRecord},
};

const SELECT_COLUMNS: &str = "id, label, location_type, location, start_date, end_date, \
     temp, temp_min, temp_max, feels_like, description, icon, \
     wind_speed, pop, local_time, created_at, updated_at";

pub struct WeatherStore {
    conn: Connection,
}

impl WeatherStore {
    /// Open (and initialize if needed) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Transient store, used in tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS weather_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                label TEXT NOT NULL,
                location_type TEXT NOT NULL,
                location TEXT NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                temp REAL NOT NULL,
                temp_min REAL NOT NULL,
                temp_max REAL NOT NULL,
                feels_like REAL NOT NULL,
                description TEXT NOT NULL,
                icon TEXT NOT NULL,
                wind_speed REAL NOT NULL,
                pop INTEGER NOT NULL,
                local_time TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );",
        )?;
        Ok(Self { conn })
    }

    /// Persist one day's summary under `label`. Returns the new record id.
    pub fn create(&self, label: &str, location: &LocationSpec, day: &DailyWeather) -> Result<i64> {
        if label.trim().is_empty() {
            return Err(Error::InvalidInput("Label cannot be empty".to_string()));
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO weather_records
                 (label, location_type, location, start_date, end_date,
                  temp, temp_min, temp_max, feels_like, description, icon,
                  wind_speed, pop, local_time, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                label,
                location.kind().as_str(),
                location.normalized(),
                day.date.to_string(),
                day.date.to_string(),
                day.temp,
                day.temp_min,
                day.temp_max,
                day.feels_like,
                day.description,
                day.icon,
                day.wind_speed,
                day.pop,
                day.local_time,
                now,
                now,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(id, label, "persisted weather record");
        Ok(id)
    }

    /// All records, most recently created first.
    pub fn read_all(&self) -> Result<Vec<WeatherRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM weather_records ORDER BY created_at DESC, id DESC"
        ))?;
        let records = stmt
            .query_map([], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    pub fn read_by_id(&self, id: i64) -> Result<Option<WeatherRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM weather_records WHERE id = ?1"
        ))?;
        let mut rows = stmt.query_map(params![id], row_to_record)?;
        rows.next().transpose().map_err(Error::from)
    }

    /// Rename a record, refreshing `updated_at`. False if `id` is unknown.
    pub fn update_label(&self, id: i64, new_label: &str) -> Result<bool> {
        if new_label.trim().is_empty() {
            return Err(Error::InvalidInput("Label cannot be empty".to_string()));
        }

        let now = Utc::now().to_rfc3339();
        let affected = self.conn.execute(
            "UPDATE weather_records SET label = ?1, updated_at = ?2 WHERE id = ?3",
            params![new_label, now, id],
        )?;
        Ok(affected > 0)
    }

    /// Remove a record. False if `id` is unknown.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM weather_records WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}

/// The only place a storage row becomes a typed record.
fn row_to_record(row: &Row<'_>) -> rusqlite::Result<WeatherRecord> {
    Ok(WeatherRecord {
        id: row.get(0)?,
        label: row.get(1)?,
        location_type: parse_column(row, 2, |s| LocationKind::try_from(s.as_str()))?,
        location: row.get(3)?,
        start_date: parse_column(row, 4, |s| s.parse::<NaiveDate>())?,
        end_date: parse_column(row, 5, |s| s.parse::<NaiveDate>())?,
        temp: row.get(6)?,
        temp_min: row.get(7)?,
        temp_max: row.get(8)?,
        feels_like: row.get(9)?,
        description: row.get(10)?,
        icon: row.get(11)?,
        wind_speed: row.get(12)?,
        pop: row.get(13)?,
        local_time: row.get(14)?,
        created_at: parse_column(row, 15, |s| s.parse::<DateTime<Utc>>())?,
        updated_at: parse_column(row, 16, |s| s.parse::<DateTime<Utc>>())?,
    })
}

fn parse_column<T, E, F>(row: &Row<'_>, idx: usize, parse: F) -> rusqlite::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
    F: FnOnce(String) -> std::result::Result<T, E>,
{
    let raw: String = row.get(idx)?;
    parse(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
