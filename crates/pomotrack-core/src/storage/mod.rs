mod config;
pub mod database;
pub mod memory;
pub mod migrations;

pub use config::{Config, NotificationsConfig, PowerConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::StoreError;
use crate::settings::PomodoroSettings;
use crate::stats::DailyStats;
use crate::timer::PomodoroSession;

/// Logical keys of the persisted records.
pub const SETTINGS_KEY: &str = "settings";
pub const SESSIONS_KEY: &str = "sessions";
pub const DAILY_STATS_KEY: &str = "daily_stats";

/// Durable home of settings, session history and per-day stats.
///
/// Only the controller writes sessions and stats, and only for sessions
/// that ran to completion.
pub trait SessionStore {
    /// Stored settings, or `None` if none were ever saved.
    fn load_settings(&self) -> Result<Option<PomodoroSettings>, StoreError>;

    fn save_settings(&mut self, settings: &PomodoroSettings) -> Result<(), StoreError>;

    /// All recorded sessions in the order they were appended.
    fn load_sessions(&self) -> Result<Vec<PomodoroSession>, StoreError>;

    fn append_session(&mut self, session: &PomodoroSession) -> Result<(), StoreError>;

    /// Every stored day, ascending by date.
    fn load_daily_stats(&self) -> Result<Vec<DailyStats>, StoreError>;

    fn daily_stats_for(&self, date: NaiveDate) -> Result<Option<DailyStats>, StoreError> {
        Ok(self.load_daily_stats()?.into_iter().find(|d| d.date == date))
    }

    /// Fold a completed session into its day's aggregate.
    fn record_daily_stats(&mut self, session: &PomodoroSession) -> Result<(), StoreError>;

    /// Wipe settings, sessions and stats.
    fn clear_all(&mut self) -> Result<(), StoreError>;
}

/// Returns the data directory, creating it if needed.
///
/// `POMOTRACK_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/pomotrack[-dev]/`, where `POMOTRACK_ENV=dev` selects the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("POMOTRACK_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOTRACK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomotrack-dev")
            } else {
                base_dir.join("pomotrack")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
