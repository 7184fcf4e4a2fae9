//! Timer engine implementation.
//!
//! The engine is a pure, tick-driven state machine. It owns the
//! [`TimerState`] and nothing else: no clock, no store, no platform
//! services. The caller feeds it one `tick()` per elapsed second and a
//! timestamp for every transition that records one.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> Completed -> Idle
//!   any  --reset/skip-->  Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(&settings);
//! engine.start(Utc::now());
//! // Once per second:
//! if let Some(Event::TimerExpired { .. }) = engine.tick(Utc::now()) {
//!     engine.complete(Utc::now(), &settings);
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session::{
    next_session_type, PomodoroSession, SessionType, TimerState, TimerStatus,
};
use crate::events::Event;
use crate::settings::PomodoroSettings;

/// Core timer engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEngine {
    state: TimerState,
}

impl TimerEngine {
    /// Idle, at the start of a work session.
    pub fn new(settings: &PomodoroSettings) -> Self {
        Self {
            state: TimerState::initial(settings),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status
    }

    pub fn session_type(&self) -> SessionType {
        self.state.session_type
    }

    pub fn remaining_secs(&self) -> u64 {
        self.state.remaining_time
    }

    pub fn session_count(&self) -> u32 {
        self.state.session_count
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Open a fresh session and begin counting down.
    ///
    /// Valid from `Idle` and `Paused`; a no-op otherwise.
    pub fn start(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.state.status {
            TimerStatus::Idle | TimerStatus::Paused => {
                let session =
                    PomodoroSession::begin(self.state.session_type, self.state.remaining_time, now);
                let event = Event::TimerStarted {
                    session_id: session.id.clone(),
                    session_type: self.state.session_type,
                    duration_min: session.duration,
                    at: now,
                };
                self.state.current_session = Some(session);
                self.state.status = TimerStatus::Running;
                Some(event)
            }
            TimerStatus::Running | TimerStatus::Completed => None,
        }
    }

    /// One elapsed second. Returns `TimerExpired` when the countdown hits zero.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state.status != TimerStatus::Running {
            return None;
        }
        self.state.remaining_time = self.state.remaining_time.saturating_sub(1);
        if self.state.remaining_time == 0 {
            self.state.status = TimerStatus::Completed;
            return Some(Event::TimerExpired {
                session_type: self.state.session_type,
                at: now,
            });
        }
        None
    }

    /// Freeze the countdown. Valid only while running.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.state.status {
            TimerStatus::Running => {
                self.state.status = TimerStatus::Paused;
                Some(Event::TimerPaused {
                    remaining_secs: self.state.remaining_time,
                    at: now,
                })
            }
            _ => None,
        }
    }

    /// Back to an idle work session with the cycle counter cleared.
    /// The in-flight session, if any, is dropped unrecorded.
    pub fn reset(&mut self, now: DateTime<Utc>, settings: &PomodoroSettings) -> Event {
        self.state = TimerState::initial(settings);
        Event::TimerReset { at: now }
    }

    /// Abandon the current interval and move to its successor, idle.
    pub fn skip(&mut self, now: DateTime<Utc>, settings: &PomodoroSettings) -> Event {
        let from = self.state.session_type;
        self.state.current_session = None;
        self.advance(settings);
        Event::TimerSkipped {
            from,
            to: self.state.session_type,
            at: now,
        }
    }

    /// Drain the `Completed` state: finish the session record, advance to
    /// the next interval and go idle. `None` unless the countdown expired.
    pub fn complete(&mut self, now: DateTime<Utc>, settings: &PomodoroSettings) -> Option<Event> {
        if self.state.status != TimerStatus::Completed {
            return None;
        }
        let finished = self.state.session_type;
        let session = self.state.current_session.take().map(|s| s.finish(now));
        self.advance(settings);
        Some(Event::SessionCompleted {
            session,
            session_type: finished,
            next_type: self.state.session_type,
            at: now,
        })
    }

    /// Adopt new settings. Only an idle countdown is resized; returns
    /// whether it was.
    pub fn apply_settings(&mut self, settings: &PomodoroSettings) -> bool {
        if self.state.status != TimerStatus::Idle {
            return false;
        }
        self.state.remaining_time = settings.duration_secs(self.state.session_type);
        true
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self, settings: &PomodoroSettings) {
        let next = next_session_type(
            self.state.session_type,
            self.state.session_count + 1,
            settings.sessions_until_long_break,
        );
        if next == SessionType::Work {
            self.state.session_count += 1;
        }
        self.state.session_type = next;
        self.state.remaining_time = settings.duration_secs(next);
        self.state.status = TimerStatus::Idle;
    }
}
