//! User-configurable Pomodoro durations and cycle length.
//!
//! Settings are validated before they ever replace the active copy held by
//! the controller. Durations are whole minutes.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timer::SessionType;

/// Longest allowed run of work sessions before a long break.
pub const MAX_SESSIONS_UNTIL_LONG_BREAK: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSettings {
    #[serde(default = "default_work_duration")]
    pub work_duration: u32,
    #[serde(default = "default_break_duration")]
    pub break_duration: u32,
    #[serde(default = "default_long_break_duration")]
    pub long_break_duration: u32,
    #[serde(default = "default_sessions_until_long_break")]
    pub sessions_until_long_break: u32,
}

fn default_work_duration() -> u32 {
    25
}
fn default_break_duration() -> u32 {
    5
}
fn default_long_break_duration() -> u32 {
    15
}
fn default_sessions_until_long_break() -> u32 {
    4
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_duration: default_work_duration(),
            break_duration: default_break_duration(),
            long_break_duration: default_long_break_duration(),
            sessions_until_long_break: default_sessions_until_long_break(),
        }
    }
}

impl PomodoroSettings {
    pub fn new(
        work_duration: u32,
        break_duration: u32,
        long_break_duration: u32,
        sessions_until_long_break: u32,
    ) -> Self {
        Self {
            work_duration,
            break_duration,
            long_break_duration,
            sessions_until_long_break,
        }
    }

    /// Build a candidate from raw text fields, the way a settings form
    /// submits them. Non-numeric input becomes 0, which `validate` rejects.
    pub fn from_inputs(
        work_duration: &str,
        break_duration: &str,
        long_break_duration: &str,
        sessions_until_long_break: &str,
    ) -> Self {
        Self::new(
            parse_field(work_duration),
            parse_field(break_duration),
            parse_field(long_break_duration),
            parse_field(sessions_until_long_break),
        )
    }

    /// Check every field against its bounds and hand the settings back unchanged.
    ///
    /// # Errors
    /// Returns the first field that is below 1, or `sessions_until_long_break`
    /// above [`MAX_SESSIONS_UNTIL_LONG_BREAK`].
    pub fn validate(self) -> Result<Self, ValidationError> {
        let fields = [
            ("work_duration", self.work_duration),
            ("break_duration", self.break_duration),
            ("long_break_duration", self.long_break_duration),
            ("sessions_until_long_break", self.sessions_until_long_break),
        ];
        for (field, value) in fields {
            if value < 1 {
                return Err(ValidationError::BelowMinimum {
                    field,
                    value,
                    min: 1,
                });
            }
        }
        if self.sessions_until_long_break > MAX_SESSIONS_UNTIL_LONG_BREAK {
            return Err(ValidationError::AboveMaximum {
                field: "sessions_until_long_break",
                value: self.sessions_until_long_break,
                max: MAX_SESSIONS_UNTIL_LONG_BREAK,
            });
        }
        Ok(self)
    }

    /// Minutes configured for a session type.
    pub fn duration_min(&self, session_type: SessionType) -> u32 {
        crate::timer::duration_for(session_type, self)
    }

    /// Seconds configured for a session type.
    pub fn duration_secs(&self, session_type: SessionType) -> u64 {
        u64::from(self.duration_min(session_type)).saturating_mul(60)
    }
}

/// Parse the leading whole number of a text field, so `"12abc"` is 12 and
/// `"25.5"` is 25. Anything without leading digits, a negative number or a
/// value past `u32::MAX` becomes 0.
pub fn parse_field(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    unsigned[..end].parse().unwrap_or(0)
}
