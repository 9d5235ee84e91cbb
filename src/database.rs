//! SQLite persistence layer
//!
//! One `Database` handle shared across the whole app. Every statement runs
//! as a single unit against the shared connection; the plant cascade delete
//! is the only multi-statement write and runs inside a transaction. Dates
//! are stored as canonical `YYYY-MM-DD` text, so SQL never does calendar
//! arithmetic — only plain comparisons and ordering.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use crate::auth::{SessionUser, UserRecord};
use crate::features::photos::GrowthPhoto;
use crate::features::plants::{NewPlant, Plant, UpdatePlant};
use crate::features::reminders::due::DueTaskRow;
use crate::features::reminders::Reminder;

/// Shared handle to the application database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database file and bring the schema up to date.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let db = Self::from_connection(conn)?;
        debug!("Database ready at {}", path.display());
        Ok(db)
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        let db = Database {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();
        let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS users (
                    user_id INTEGER PRIMARY KEY AUTOINCREMENT,
                    email TEXT UNIQUE NOT NULL,
                    password_hash TEXT NOT NULL,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                );

                CREATE TABLE IF NOT EXISTS sessions (
                    token TEXT PRIMARY KEY,
                    user_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
                    expires_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS plants (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
                    name TEXT NOT NULL,
                    scientific_name TEXT,
                    common_name TEXT,
                    image_url TEXT,
                    notes TEXT,
                    identification_data TEXT,
                    trefle_id TEXT,
                    date_added TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                );

                CREATE TABLE IF NOT EXISTS reminders (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    plant_id INTEGER NOT NULL REFERENCES plants(id) ON DELETE CASCADE,
                    type TEXT NOT NULL,
                    frequency_days INTEGER NOT NULL,
                    last_completed TEXT NOT NULL,
                    next_due TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS growth_photos (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    plant_id INTEGER NOT NULL REFERENCES plants(id) ON DELETE CASCADE,
                    image_url TEXT NOT NULL,
                    date_taken TEXT NOT NULL,
                    notes TEXT
                );

                CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
                CREATE INDEX IF NOT EXISTS idx_plants_user ON plants(user_id);
                CREATE INDEX IF NOT EXISTS idx_reminders_plant ON reminders(plant_id);
                CREATE INDEX IF NOT EXISTS idx_reminders_next_due ON reminders(next_due);
                CREATE INDEX IF NOT EXISTS idx_photos_plant ON growth_photos(plant_id);

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    /// Cheap liveness probe for the health endpoint.
    pub fn health_check(&self) -> rusqlite::Result<()> {
        let conn = self.conn.lock();
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Users & sessions
    // ------------------------------------------------------------------

    pub fn insert_user(&self, email: &str, password_hash: &str) -> rusqlite::Result<i64> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO users (email, password_hash) VALUES (?1, ?2)",
            params![email, password_hash],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_user_by_email(&self, email: &str) -> rusqlite::Result<Option<UserRecord>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT user_id, email, password_hash FROM users WHERE email = ?1",
            params![email],
            |row| {
                Ok(UserRecord {
                    user_id: row.get(0)?,
                    email: row.get(1)?,
                    password_hash: row.get(2)?,
                })
            },
        )
        .optional()
    }

    pub fn insert_session(
        &self,
        token: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> rusqlite::Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO sessions (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
            params![token, user_id, expires_at],
        )?;
        Ok(())
    }

    /// Resolve a bearer token to its user. Expiry is checked by the caller.
    pub fn session_user(&self, token: &str) -> rusqlite::Result<Option<SessionUser>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT u.user_id, u.email, s.expires_at
             FROM sessions s
             JOIN users u ON s.user_id = u.user_id
             WHERE s.token = ?1",
            params![token],
            |row| {
                Ok(SessionUser {
                    user_id: row.get(0)?,
                    email: row.get(1)?,
                    expires_at: row.get(2)?,
                })
            },
        )
        .optional()
    }

    /// Drop sessions whose expiry has passed. Returns how many were removed.
    pub fn delete_expired_sessions(&self, now: DateTime<Utc>) -> rusqlite::Result<usize> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])
    }

    // ------------------------------------------------------------------
    // Plants
    // ------------------------------------------------------------------

    pub fn insert_plant(&self, user_id: i64, plant: &NewPlant) -> rusqlite::Result<i64> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO plants
                (user_id, name, scientific_name, common_name, image_url, notes,
                 identification_data, trefle_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user_id,
                plant.name,
                plant.scientific_name,
                plant.common_name,
                plant.image_url,
                plant.notes,
                plant.identification_data,
                plant.trefle_id,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn plants_for_user(&self, user_id: i64) -> rusqlite::Result<Vec<Plant>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, name, scientific_name, common_name, image_url, notes,
                    identification_data, trefle_id, date_added
             FROM plants WHERE user_id = ?1
             ORDER BY date_added DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![user_id], row_to_plant)?;
        rows.collect()
    }

    pub fn plant_for_user(&self, plant_id: i64, user_id: i64) -> rusqlite::Result<Option<Plant>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, user_id, name, scientific_name, common_name, image_url, notes,
                    identification_data, trefle_id, date_added
             FROM plants WHERE id = ?1 AND user_id = ?2",
            params![plant_id, user_id],
            row_to_plant,
        )
        .optional()
    }

    /// Ownership check used before reminder and photo writes.
    pub fn user_owns_plant(&self, plant_id: i64, user_id: i64) -> rusqlite::Result<bool> {
        let conn = self.conn.lock();
        let found = conn
            .query_row(
                "SELECT 1 FROM plants WHERE id = ?1 AND user_id = ?2",
                params![plant_id, user_id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Selective update: NULL parameters keep the stored value.
    pub fn update_plant(
        &self,
        plant_id: i64,
        user_id: i64,
        update: &UpdatePlant,
    ) -> rusqlite::Result<usize> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE plants SET
                name = COALESCE(?1, name),
                scientific_name = COALESCE(?2, scientific_name),
                common_name = COALESCE(?3, common_name),
                image_url = COALESCE(?4, image_url),
                notes = COALESCE(?5, notes)
             WHERE id = ?6 AND user_id = ?7",
            params![
                update.name,
                update.scientific_name,
                update.common_name,
                update.image_url,
                update.notes,
                plant_id,
                user_id,
            ],
        )
    }

    /// Delete a plant and everything that hangs off it, in one transaction.
    ///
    /// Returns false when the plant does not exist or is not owned by the
    /// caller — the two cases are not distinguished.
    pub fn delete_plant_cascade(&self, plant_id: i64, user_id: i64) -> rusqlite::Result<bool> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM plants WHERE id = ?1 AND user_id = ?2",
            params![plant_id, user_id],
        )?;
        if removed == 0 {
            return Ok(false);
        }
        tx.execute(
            "DELETE FROM reminders WHERE plant_id = ?1",
            params![plant_id],
        )?;
        tx.execute(
            "DELETE FROM growth_photos WHERE plant_id = ?1",
            params![plant_id],
        )?;
        tx.commit()?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Reminders
    // ------------------------------------------------------------------

    pub fn insert_reminder(
        &self,
        plant_id: i64,
        task_type: &str,
        frequency_days: i64,
        last_completed: NaiveDate,
        next_due: NaiveDate,
    ) -> rusqlite::Result<i64> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO reminders (plant_id, type, frequency_days, last_completed, next_due)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![plant_id, task_type, frequency_days, last_completed, next_due],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch a reminder through the ownership join.
    pub fn reminder_for_user(
        &self,
        reminder_id: i64,
        user_id: i64,
    ) -> rusqlite::Result<Option<Reminder>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT r.id, r.plant_id, r.type, r.frequency_days, r.last_completed, r.next_due
             FROM reminders r
             JOIN plants p ON r.plant_id = p.id
             WHERE r.id = ?1 AND p.user_id = ?2",
            params![reminder_id, user_id],
            row_to_reminder,
        )
        .optional()
    }

    /// Write the `last_completed`/`next_due` pair. Always set together so the
    /// stored pair can never disagree.
    pub fn update_reminder_schedule(
        &self,
        reminder_id: i64,
        last_completed: NaiveDate,
        next_due: NaiveDate,
    ) -> rusqlite::Result<usize> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE reminders SET last_completed = ?1, next_due = ?2 WHERE id = ?3",
            params![last_completed, next_due, reminder_id],
        )
    }

    /// Ownership check folded into the delete: zero rows means missing or
    /// not owned, and the caller treats both the same.
    pub fn delete_reminder(&self, reminder_id: i64, user_id: i64) -> rusqlite::Result<bool> {
        let conn = self.conn.lock();
        let removed = conn.execute(
            "DELETE FROM reminders
             WHERE id = ?1
             AND plant_id IN (SELECT id FROM plants WHERE user_id = ?2)",
            params![reminder_id, user_id],
        )?;
        Ok(removed > 0)
    }

    pub fn reminders_for_plant(&self, plant_id: i64) -> rusqlite::Result<Vec<Reminder>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, plant_id, type, frequency_days, last_completed, next_due
             FROM reminders WHERE plant_id = ?1
             ORDER BY next_due ASC, type ASC",
        )?;
        let rows = stmt.query_map(params![plant_id], row_to_reminder)?;
        rows.collect()
    }

    /// All of a user's reminders due on or before `today`, most overdue
    /// first, with the plant name joined in for presentation.
    pub fn due_reminders(
        &self,
        user_id: i64,
        today: NaiveDate,
    ) -> rusqlite::Result<Vec<DueTaskRow>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT r.id, r.plant_id, r.type, r.next_due, r.frequency_days, p.name
             FROM reminders r
             JOIN plants p ON r.plant_id = p.id
             WHERE p.user_id = ?1
               AND r.next_due <= ?2
             ORDER BY r.next_due ASC, r.type ASC",
        )?;
        let rows = stmt.query_map(params![user_id, today], |row| {
            Ok(DueTaskRow {
                reminder_id: row.get(0)?,
                plant_id: row.get(1)?,
                task_type: row.get(2)?,
                next_due: row.get(3)?,
                frequency_days: row.get(4)?,
                plant_name: row.get(5)?,
            })
        })?;
        rows.collect()
    }

    // ------------------------------------------------------------------
    // Growth photos
    // ------------------------------------------------------------------

    pub fn insert_photo(
        &self,
        plant_id: i64,
        image_url: &str,
        date_taken: NaiveDate,
        notes: Option<&str>,
    ) -> rusqlite::Result<i64> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO growth_photos (plant_id, image_url, date_taken, notes)
             VALUES (?1, ?2, ?3, ?4)",
            params![plant_id, image_url, date_taken, notes],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn photos_for_plant(&self, plant_id: i64) -> rusqlite::Result<Vec<GrowthPhoto>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, plant_id, image_url, date_taken, notes
             FROM growth_photos WHERE plant_id = ?1
             ORDER BY date_taken DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![plant_id], |row| {
            Ok(GrowthPhoto {
                id: row.get(0)?,
                plant_id: row.get(1)?,
                image_url: row.get(2)?,
                date_taken: row.get(3)?,
                notes: row.get(4)?,
            })
        })?;
        rows.collect()
    }
}

fn row_to_plant(row: &rusqlite::Row<'_>) -> rusqlite::Result<Plant> {
    Ok(Plant {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        scientific_name: row.get(3)?,
        common_name: row.get(4)?,
        image_url: row.get(5)?,
        notes: row.get(6)?,
        identification_data: row.get(7)?,
        trefle_id: row.get(8)?,
        date_added: row.get(9)?,
    })
}

fn row_to_reminder(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reminder> {
    Ok(Reminder {
        id: row.get(0)?,
        plant_id: row.get(1)?,
        task_type: row.get(2)?,
        frequency_days: row.get(3)?,
        last_completed: row.get(4)?,
        next_due: row.get(5)?,
    })
}
