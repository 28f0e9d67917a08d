// SPDX-License-Identifier: Apache-2.0

use crate::{RecordStore, StoreError, StoreErrorCode};
use appfit_model::{AppRecord, PackageId};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::Mutex;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS app_records (
    package           TEXT PRIMARY KEY,
    display_name      TEXT NOT NULL,
    installed_version TEXT,
    installed_from    TEXT,
    is_installed      INTEGER NOT NULL,
    is_favorite       INTEGER NOT NULL,
    in_directory      INTEGER NOT NULL,
    ratings_loaded    INTEGER NOT NULL,
    ratings_json      TEXT NOT NULL,
    aggregates_json   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_app_records_name ON app_records(display_name);
";

const SELECT_COLUMNS: &str = "package, display_name, installed_version, installed_from, \
     is_installed, is_favorite, in_directory, ratings_loaded, ratings_json, aggregates_json";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::new(StoreErrorCode::Internal, "store mutex poisoned"))
    }
}

struct RawRow {
    package: String,
    display_name: String,
    installed_version: Option<String>,
    installed_from: Option<String>,
    is_installed: bool,
    is_favorite: bool,
    in_directory: bool,
    ratings_loaded: bool,
    ratings_json: String,
    aggregates_json: String,
}

fn decode_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        package: row.get(0)?,
        display_name: row.get(1)?,
        installed_version: row.get(2)?,
        installed_from: row.get(3)?,
        is_installed: row.get::<_, i64>(4)? != 0,
        is_favorite: row.get::<_, i64>(5)? != 0,
        in_directory: row.get::<_, i64>(6)? != 0,
        ratings_loaded: row.get::<_, i64>(7)? != 0,
        ratings_json: row.get(8)?,
        aggregates_json: row.get(9)?,
    })
}

fn finish_row(raw: RawRow) -> Result<AppRecord, StoreError> {
    let package = PackageId::parse(&raw.package).map_err(|e| {
        StoreError::new(
            StoreErrorCode::Validation,
            format!("corrupt package id in store: {e}"),
        )
    })?;
    let mut record = AppRecord::from_directory(package, raw.display_name);
    record.installed_version = raw.installed_version;
    record.installed_from = raw.installed_from;
    record.is_installed = raw.is_installed;
    record.is_favorite = raw.is_favorite;
    record.in_directory = raw.in_directory;
    record.ratings_loaded = raw.ratings_loaded;
    record.ratings = serde_json::from_str(&raw.ratings_json)
        .map_err(|e| StoreError::new(StoreErrorCode::Validation, e.to_string()))?;
    record.status_aggregate = serde_json::from_str(&raw.aggregates_json)
        .map_err(|e| StoreError::new(StoreErrorCode::Validation, e.to_string()))?;
    Ok(record)
}

/// Escape `!`, `%`, and `_` so a user-typed fragment matches literally
/// inside a LIKE pattern.
pub(crate) fn escape_like_fragment(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        match c {
            '!' | '%' | '_' => {
                out.push('!');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

impl RecordStore for SqliteStore {
    fn get(&self, package: &PackageId) -> Result<Option<AppRecord>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM app_records WHERE package = ?1"
            ))
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        let mut rows = stmt
            .query_map(params![package.as_str()], decode_row)
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        match rows.next() {
            None => Ok(None),
            Some(row) => {
                let raw = row.map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
                Ok(Some(finish_row(raw)?))
            }
        }
    }

    fn upsert(&self, record: &AppRecord) -> Result<(), StoreError> {
        let ratings_json = serde_json::to_string(&record.ratings)
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        let aggregates_json = serde_json::to_string(&record.status_aggregate)
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO app_records (package, display_name, installed_version, installed_from, \
             is_installed, is_favorite, in_directory, ratings_loaded, ratings_json, aggregates_json) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
             ON CONFLICT(package) DO UPDATE SET \
             display_name = excluded.display_name, \
             installed_version = excluded.installed_version, \
             installed_from = excluded.installed_from, \
             is_installed = excluded.is_installed, \
             is_favorite = excluded.is_favorite, \
             in_directory = excluded.in_directory, \
             ratings_loaded = excluded.ratings_loaded, \
             ratings_json = excluded.ratings_json, \
             aggregates_json = excluded.aggregates_json",
            params![
                record.package.as_str(),
                record.display_name,
                record.installed_version,
                record.installed_from,
                i64::from(record.is_installed),
                i64::from(record.is_favorite),
                i64::from(record.in_directory),
                i64::from(record.ratings_loaded),
                ratings_json,
                aggregates_json,
            ],
        )
        .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        Ok(())
    }

    fn set_favorite(&self, package: &PackageId, favorite: bool) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE app_records SET is_favorite = ?2 WHERE package = ?1",
                params![package.as_str(), i64::from(favorite)],
            )
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        if changed == 0 {
            return Err(StoreError::new(
                StoreErrorCode::NotFound,
                format!("no record for {package}"),
            ));
        }
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<AppRecord>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {SELECT_COLUMNS} FROM app_records"))
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        let rows = stmt
            .query_map([], decode_row)
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        let mut out = Vec::new();
        for row in rows {
            let raw = row.map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
            out.push(finish_row(raw)?);
        }
        Ok(out)
    }

    fn search(&self, name_fragment: &str) -> Result<Vec<AppRecord>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM app_records \
                 WHERE display_name LIKE '%' || ?1 || '%' ESCAPE '!' \
                 ORDER BY display_name, package"
            ))
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        let rows = stmt
            .query_map(params![escape_like_fragment(name_fragment)], decode_row)
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        let mut out = Vec::new();
        for row in rows {
            let raw = row.map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
            out.push(finish_row(raw)?);
        }
        Ok(out)
    }

    fn delete(&self, package: &PackageId) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM app_records WHERE package = ?1",
            params![package.as_str()],
        )
        .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        Ok(())
    }
}
