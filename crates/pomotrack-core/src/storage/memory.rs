//! In-process key-value store.
//!
//! Records are kept as JSON strings under the store's logical keys, so
//! encoding behaves like a persistent store. Reads and writes can be made
//! to fail on demand.

use std::collections::HashMap;

use super::{SessionStore, DAILY_STATS_KEY, SESSIONS_KEY, SETTINGS_KEY};
use crate::error::StoreError;
use crate::settings::PomodoroSettings;
use crate::stats::{record_completion, DailyStats};
use crate::timer::PomodoroSession;

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    kv: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read fail.
    pub fn fail_reads(mut self, fail: bool) -> Self {
        self.fail_reads = fail;
        self
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(mut self, fail: bool) -> Self {
        self.fail_writes = fail;
        self
    }

    fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::QueryFailed(format!("read of '{key}' refused")));
        }
        self.kv
            .get(key)
            .map(|raw| {
                serde_json::from_str(raw).map_err(|e| StoreError::Corrupt {
                    key: key.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    fn put<T: serde::Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::QueryFailed(format!("write of '{key}' refused")));
        }
        let raw = serde_json::to_string(value).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.kv.insert(key.to_string(), raw);
        Ok(())
    }
}

impl SessionStore for MemoryStore {
    fn load_settings(&self) -> Result<Option<PomodoroSettings>, StoreError> {
        self.get(SETTINGS_KEY)
    }

    fn save_settings(&mut self, settings: &PomodoroSettings) -> Result<(), StoreError> {
        self.put(SETTINGS_KEY, settings)
    }

    fn load_sessions(&self) -> Result<Vec<PomodoroSession>, StoreError> {
        Ok(self.get(SESSIONS_KEY)?.unwrap_or_default())
    }

    fn append_session(&mut self, session: &PomodoroSession) -> Result<(), StoreError> {
        let mut sessions = self.load_sessions()?;
        sessions.push(session.clone());
        self.put(SESSIONS_KEY, &sessions)
    }

    fn load_daily_stats(&self) -> Result<Vec<DailyStats>, StoreError> {
        let mut days: Vec<DailyStats> = self.get(DAILY_STATS_KEY)?.unwrap_or_default();
        days.sort_by_key(|d| d.date);
        Ok(days)
    }

    fn record_daily_stats(&mut self, session: &PomodoroSession) -> Result<(), StoreError> {
        let mut days = self.load_daily_stats()?;
        if record_completion(&mut days, session).is_some() {
            self.put(DAILY_STATS_KEY, &days)?;
        }
        Ok(())
    }

    fn clear_all(&mut self) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::QueryFailed("clear refused".into()));
        }
        self.kv.clear();
        Ok(())
    }
}
