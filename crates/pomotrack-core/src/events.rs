use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::PomodoroSettings;
use crate::timer::{PomodoroSession, SessionType};

/// Every transition of the timer produces an Event.
/// The presentation layer renders from these or from the watched state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        session_id: String,
        session_type: SessionType,
        duration_min: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero; the completion handler runs next.
    TimerExpired {
        session_type: SessionType,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        /// The finished record, absent only if the state carried no session.
        session: Option<PomodoroSession>,
        session_type: SessionType,
        next_type: SessionType,
        at: DateTime<Utc>,
    },
    TimerSkipped {
        from: SessionType,
        to: SessionType,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        settings: PomodoroSettings,
        /// Whether the idle countdown was recomputed.
        resized: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerExpired { .. } => "timer_expired",
            Event::SessionCompleted { .. } => "session_completed",
            Event::TimerSkipped { .. } => "timer_skipped",
            Event::TimerReset { .. } => "timer_reset",
            Event::SettingsUpdated { .. } => "settings_updated",
        }
    }
}
