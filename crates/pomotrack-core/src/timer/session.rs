use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::PomodoroSettings;

/// Kind of interval the timer is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionType {
    Work,
    Break,
    LongBreak,
}

impl SessionType {
    pub fn label(self) -> &'static str {
        match self {
            SessionType::Work => "Work Time",
            SessionType::Break => "Short Break",
            SessionType::LongBreak => "Long Break",
        }
    }

    pub fn completion_title(self) -> &'static str {
        match self {
            SessionType::Work => "Work session completed!",
            SessionType::Break => "Break time is over!",
            SessionType::LongBreak => "Long break finished!",
        }
    }

    pub fn completion_body(self) -> &'static str {
        match self {
            SessionType::Work => "Great job! Time for a well-deserved break.",
            SessionType::Break => "Ready to get back to work? Let's stay focused!",
            SessionType::LongBreak => "Feeling refreshed? Time to start a new work session!",
        }
    }
}

/// Type recorded on a stored session. Long breaks are stored as breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Work,
    Break,
}

impl SessionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionKind::Work => "work",
            SessionKind::Break => "break",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "work" => Some(SessionKind::Work),
            "break" => Some(SessionKind::Break),
            _ => None,
        }
    }
}

impl From<SessionType> for SessionKind {
    fn from(t: SessionType) -> Self {
        match t {
            SessionType::Work => SessionKind::Work,
            SessionType::Break | SessionType::LongBreak => SessionKind::Break,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    /// Transient: drained by the completion handler in the same event.
    Completed,
}

/// One work or break interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSession {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    /// Intended length in minutes, fixed when the session starts.
    pub duration: u32,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub completed: bool,
}

impl PomodoroSession {
    /// Open a new session for `session_type` with `remaining_secs` left on the clock.
    pub fn begin(session_type: SessionType, remaining_secs: u64, now: DateTime<Utc>) -> Self {
        Self {
            id: new_session_id(),
            kind: session_type.into(),
            duration: u32::try_from(remaining_secs.div_ceil(60)).unwrap_or(u32::MAX),
            start_time: now,
            end_time: None,
            completed: false,
        }
    }

    /// Completed copy with `end_time` set.
    pub fn finish(self, now: DateTime<Utc>) -> Self {
        Self {
            end_time: Some(now),
            completed: true,
            ..self
        }
    }
}

/// The state machine's current configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub current_session: Option<PomodoroSession>,
    /// Seconds left in the current interval.
    pub remaining_time: u64,
    pub status: TimerStatus,
    pub session_type: SessionType,
    /// Completed work sessions since the last reset.
    pub session_count: u32,
}

impl TimerState {
    /// Idle at the start of a work session.
    pub fn initial(settings: &PomodoroSettings) -> Self {
        Self {
            current_session: None,
            remaining_time: settings.duration_secs(SessionType::Work),
            status: TimerStatus::Idle,
            session_type: SessionType::Work,
            session_count: 0,
        }
    }

    /// 0.0 .. 1.0 progress through an interval of `total_secs`.
    pub fn progress(&self, total_secs: u64) -> f64 {
        if total_secs == 0 {
            return 0.0;
        }
        let remaining = self.remaining_time.min(total_secs);
        1.0 - (remaining as f64 / total_secs as f64)
    }

    /// Remaining time rendered as `MM:SS`.
    pub fn formatted_remaining(&self) -> String {
        format_time(self.remaining_time)
    }

    /// Whether the documented state invariants hold.
    pub fn is_consistent(&self) -> bool {
        let zero_ok = self.remaining_time > 0
            || matches!(self.status, TimerStatus::Completed | TimerStatus::Idle);
        let session_ok = self.current_session.is_none()
            || matches!(self.status, TimerStatus::Running | TimerStatus::Paused);
        zero_ok && session_ok
    }
}

/// Session type that follows `current`.
///
/// `upcoming_ordinal` is the completed-work count plus one and `cycle_len`
/// is the number of work sessions between long breaks.
pub fn next_session_type(current: SessionType, upcoming_ordinal: u32, cycle_len: u32) -> SessionType {
    match current {
        SessionType::Work => {
            if upcoming_ordinal % cycle_len.max(1) == 0 {
                SessionType::LongBreak
            } else {
                SessionType::Break
            }
        }
        SessionType::Break | SessionType::LongBreak => SessionType::Work,
    }
}

/// Configured minutes for `session_type`.
pub fn duration_for(session_type: SessionType, settings: &PomodoroSettings) -> u32 {
    match session_type {
        SessionType::Work => settings.work_duration,
        SessionType::Break => settings.break_duration,
        SessionType::LongBreak => settings.long_break_duration,
    }
}

/// Render seconds as zero-padded `MM:SS`.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
