mod connection;
mod schema;

pub use connection::{ConnectionManager, StoreConfig, DEFAULT_DATABASE_NAME};

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::*;

/// Shared handle to the cats and logs tables.
///
/// Cloning is cheap and every clone talks to the same connection.
#[derive(Clone, Debug)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    name: Arc<str>,
}

impl Database {
    pub fn open(path: PathBuf, name: &str) -> StoreResult<Self> {
        let location = path.display().to_string();
        let not_reachable = |source: rusqlite::Error| StoreError::Connectivity {
            location: location.clone(),
            source,
        };

        let conn = Connection::open(&path).map_err(not_reachable)?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(not_reachable)?;

        let db = Self::from_connection(conn, name);
        db.ping().map_err(|e| match e {
            StoreError::Storage(source) => not_reachable(source),
            other => other,
        })?;
        Ok(db)
    }

    pub fn open_memory() -> StoreResult<Self> {
        Self::open_memory_named(DEFAULT_DATABASE_NAME)
    }

    pub(crate) fn open_memory_named(name: &str) -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Connectivity {
            location: ":memory:".to_string(),
            source,
        })?;
        Ok(Self::from_connection(conn, name))
    }

    fn from_connection(conn: Connection, name: &str) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            name: Arc::from(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn migrate(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        schema::run_migrations(&conn)
    }

    /// Check that the database answers a trivial query.
    pub fn ping(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    /// Names of the user tables, for diagnostics.
    pub fn table_names(&self) -> StoreResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    // ============================================================
    // Cat operations
    // ============================================================

    /// All cats, oldest first.
    pub fn list_cats(&self) -> StoreResult<Vec<Cat>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, status, intake_date, gender, notes, personality, photo, created_at
             FROM cats ORDER BY created_at, rowid",
        )?;

        let cats = stmt
            .query_map([], |row| {
                Ok(Cat {
                    id: uuid_column(row, 0)?,
                    name: row.get(1)?,
                    status: row.get(2)?,
                    intake_date: row.get(3)?,
                    gender: row.get(4)?,
                    notes: row.get(5)?,
                    personality: json_column(row, 6)?,
                    photo: row.get(7)?,
                    created_at: datetime_column(row, 8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cats)
    }

    pub fn create_cat(&self, input: CreateCatInput) -> StoreResult<Cat> {
        let cat = Cat {
            id: Uuid::new_v4(),
            name: or_default(input.name, ""),
            status: or_default(input.status, DEFAULT_STATUS),
            intake_date: or_default(input.intake_date, ""),
            gender: or_default(input.gender, DEFAULT_GENDER),
            notes: or_default(input.notes, ""),
            personality: input.personality,
            photo: input.photo.unwrap_or_default(),
            created_at: Utc::now(),
        };

        let personality = serde_json::to_string(&cat.personality)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO cats (id, name, status, intake_date, gender, notes, personality, photo, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                cat.id.to_string(),
                &cat.name,
                &cat.status,
                &cat.intake_date,
                &cat.gender,
                &cat.notes,
                &personality,
                &cat.photo,
                timestamp(cat.created_at),
            ),
        )?;

        Ok(cat)
    }

    /// Delete a cat and every log that references it.
    ///
    /// Logs are removed whether or not the cat row existed. Both deletes run
    /// in one transaction, so a failure leaves neither applied.
    pub fn delete_cat(&self, id: &str) -> StoreResult<DeleteCatResult> {
        let cat_id = parse_id("cat", id)?.to_string();

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let deleted = tx.execute("DELETE FROM cats WHERE id = ?", [&cat_id])?;
        let logs = tx.execute("DELETE FROM logs WHERE cat_id = ?", [&cat_id])?;
        tx.commit()?;

        tracing::debug!(cat_id = %cat_id, cats = deleted, logs, "Deleted cat");

        Ok(DeleteCatResult {
            deleted_count: deleted as u64,
        })
    }

    // ============================================================
    // Care log operations
    // ============================================================

    /// Logs for one cat, newest `date` first, then newest entry first.
    ///
    /// An id that does not parse matches nothing.
    pub fn list_logs_for_cat(&self, cat_id: &str) -> StoreResult<Vec<CareLog>> {
        let Ok(cat_id) = Uuid::parse_str(cat_id) else {
            return Ok(Vec::new());
        };

        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, cat_id, date, mood, medication, medication_details, notes, created_at
             FROM logs WHERE cat_id = ? ORDER BY date DESC, created_at DESC, rowid DESC",
        )?;

        let logs = stmt
            .query_map([cat_id.to_string()], care_log_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    /// Every stored log, in insertion order.
    pub fn list_all_logs(&self) -> StoreResult<Vec<CareLog>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, cat_id, date, mood, medication, medication_details, notes, created_at
             FROM logs ORDER BY created_at, rowid",
        )?;

        let logs = stmt
            .query_map([], care_log_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    /// Store a log under `cat_id`. The cat is not required to exist.
    pub fn create_log(&self, cat_id: &str, input: CreateLogInput) -> StoreResult<CareLog> {
        let log = CareLog {
            id: Uuid::new_v4(),
            cat_id: parse_id("cat", cat_id)?,
            date: input.date.unwrap_or_default(),
            mood: input.mood.unwrap_or_default(),
            medication: input.medication.unwrap_or_default(),
            medication_details: input.medication_details.unwrap_or_default(),
            notes: input.notes.unwrap_or_default(),
            created_at: Utc::now(),
        };

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO logs (id, cat_id, date, mood, medication, medication_details, notes, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            (
                log.id.to_string(),
                log.cat_id.to_string(),
                &log.date,
                &log.mood,
                &log.medication,
                &log.medication_details,
                &log.notes,
                timestamp(log.created_at),
            ),
        )?;

        Ok(log)
    }

    /// Overwrite the editable fields of a log. `cat_id` and `created_at` stay.
    pub fn update_log(&self, id: &str, input: UpdateLogInput) -> StoreResult<UpdateAck> {
        let log_id = parse_id("log", id)?;

        let conn = self.lock()?;
        let rows = conn.execute(
            "UPDATE logs SET date = ?, mood = ?, medication = ?, medication_details = ?, notes = ?
             WHERE id = ?",
            (
                input.date.unwrap_or_default(),
                input.mood.unwrap_or_default(),
                input.medication.unwrap_or_default(),
                input.medication_details.unwrap_or_default(),
                input.notes.unwrap_or_default(),
                log_id.to_string(),
            ),
        )?;

        if rows == 0 {
            return Err(StoreError::NotFound {
                resource: "log",
                id: id.to_string(),
            });
        }

        Ok(UpdateAck { ok: true })
    }
}

fn care_log_from_row(row: &Row<'_>) -> rusqlite::Result<CareLog> {
    Ok(CareLog {
        id: uuid_column(row, 0)?,
        cat_id: uuid_column(row, 1)?,
        date: row.get(2)?,
        mood: row.get(3)?,
        medication: row.get(4)?,
        medication_details: row.get(5)?,
        notes: row.get(6)?,
        created_at: datetime_column(row, 7)?,
    })
}

/// Fixed-width RFC 3339 so that text order matches time order.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn datetime_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn json_column<T: serde::de::DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
