mod controller;
mod engine;
mod session;

pub use controller::{Command, TimerController};
pub use engine::TimerEngine;
pub use session::{
    duration_for, format_time, new_session_id, next_session_type, PomodoroSession, SessionKind,
    SessionType, TimerState, TimerStatus,
};
