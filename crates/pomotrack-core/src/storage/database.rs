//! SQLite-based persistence store.
//!
//! Provides persistent storage for:
//! - The active Pomodoro settings (JSON under the `settings` kv key)
//! - Completed sessions, append-only, timestamps as RFC 3339 text
//! - Per-day aggregates keyed by `YYYY-MM-DD`

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{data_dir, migrations, SessionStore, SETTINGS_KEY};
use crate::error::StoreError;
use crate::settings::PomodoroSettings;
use crate::stats::{record_completion, session_day, DailyStats};
use crate::timer::{PomodoroSession, SessionKind};

/// SQLite database for settings, sessions and daily stats.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/pomotrack.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Self::open_at(&dir.join("pomotrack.db"))
    }

    /// Open (or create) a database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        migrations::migrate(&conn).map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn read_day(&self, date: NaiveDate) -> Result<Option<DailyStats>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT completed_sessions, total_work_time, total_break_time
                 FROM daily_stats WHERE date = ?1",
                params![date.to_string()],
                |row| {
                    Ok((
                        row.get::<_, u32>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, u32>(2)?,
                    ))
                },
            )
            .optional()?;
        Ok(row.map(|(completed, work, brk)| DailyStats {
            date,
            completed_sessions: completed,
            total_work_time: work,
            total_break_time: brk,
        }))
    }
}

fn parse_time(key: &str, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            message: format!("bad timestamp '{raw}': {e}"),
        })
}

impl SessionStore for Database {
    fn load_settings(&self) -> Result<Option<PomodoroSettings>, StoreError> {
        let Some(json) = self.kv_get(SETTINGS_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                key: SETTINGS_KEY.to_string(),
                message: e.to_string(),
            })
    }

    fn save_settings(&mut self, settings: &PomodoroSettings) -> Result<(), StoreError> {
        let json = serde_json::to_string(settings).map_err(|e| StoreError::Corrupt {
            key: SETTINGS_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.kv_set(SETTINGS_KEY, &json)
    }

    fn load_sessions(&self) -> Result<Vec<PomodoroSession>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_type, duration_min, start_time, end_time, completed
             FROM sessions
             ORDER BY seq",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, bool>(5)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, kind, duration, start, end, completed) = row?;
            let kind = SessionKind::parse(&kind).ok_or_else(|| StoreError::Corrupt {
                key: format!("sessions/{id}"),
                message: format!("unknown session type '{kind}'"),
            })?;
            let start_time = parse_time(&id, &start)?;
            let end_time = end.as_deref().map(|e| parse_time(&id, e)).transpose()?;
            sessions.push(PomodoroSession {
                id,
                kind,
                duration,
                start_time,
                end_time,
                completed,
            });
        }
        Ok(sessions)
    }

    fn append_session(&mut self, session: &PomodoroSession) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO sessions (id, session_type, duration_min, start_time, end_time, completed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                session.id,
                session.kind.as_str(),
                session.duration,
                session.start_time.to_rfc3339(),
                session.end_time.map(|t| t.to_rfc3339()),
                session.completed,
            ],
        )?;
        Ok(())
    }

    fn load_daily_stats(&self) -> Result<Vec<DailyStats>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, completed_sessions, total_work_time, total_break_time
             FROM daily_stats
             ORDER BY date",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, u32>(3)?,
            ))
        })?;

        let mut days = Vec::new();
        for row in rows {
            let (date, completed, work, brk) = row?;
            let date = date.parse::<NaiveDate>().map_err(|e| StoreError::Corrupt {
                key: format!("daily_stats/{date}"),
                message: e.to_string(),
            })?;
            days.push(DailyStats {
                date,
                completed_sessions: completed,
                total_work_time: work,
                total_break_time: brk,
            });
        }
        Ok(days)
    }

    fn daily_stats_for(&self, date: NaiveDate) -> Result<Option<DailyStats>, StoreError> {
        self.read_day(date)
    }

    fn record_daily_stats(&mut self, session: &PomodoroSession) -> Result<(), StoreError> {
        let date = session_day(session);
        let mut days: Vec<DailyStats> = self.read_day(date)?.into_iter().collect();
        let Some(day) = record_completion(&mut days, session) else {
            return Ok(());
        };
        self.conn.execute(
            "INSERT OR REPLACE INTO daily_stats
                (date, completed_sessions, total_work_time, total_break_time)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                day.date.to_string(),
                day.completed_sessions,
                day.total_work_time,
                day.total_break_time,
            ],
        )?;
        Ok(())
    }

    fn clear_all(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "DELETE FROM sessions;
             DELETE FROM daily_stats;
             DELETE FROM kv;",
        )?;
        Ok(())
    }
}
