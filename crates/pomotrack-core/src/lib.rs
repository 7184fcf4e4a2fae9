//! # Pomotrack Core Library
//!
//! Core logic for the pomotrack Pomodoro timer: alternating work and break
//! intervals with a long break every N work sessions, plus local history.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a pure, tick-driven state machine over [`TimerState`]
//! - **Timer Controller**: the single owner of timer state; turns
//!   [`Command`]s into transitions and drives the platform [`services`]
//! - **Stats**: folds completed sessions into per-day aggregates
//! - **Storage**: SQLite session store and TOML application configuration
//!
//! ## Key Components
//!
//! - [`TimerController`]: intents, ticks, completion handling
//! - [`PomodoroSettings`]: validated durations and cycle length
//! - [`Database`]: settings, session and daily-stats persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod services;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{CollaboratorError, ConfigError, StoreError, ValidationError};
pub use events::Event;
pub use services::Services;
pub use settings::PomodoroSettings;
pub use stats::{DailyStats, StatsPeriod, Totals};
pub use storage::{Config, Database, MemoryStore, SessionStore};
pub use timer::{
    format_time, Command, PomodoroSession, SessionKind, SessionType, TimerController, TimerEngine,
    TimerState, TimerStatus,
};
