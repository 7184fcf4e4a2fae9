//! Statistics for completed Pomodoro sessions.
//!
//! Completed sessions are folded into one [`DailyStats`] per local calendar
//! day. The read side fills gaps with zero-valued days and reduces arbitrary
//! session collections to totals.

mod daily;

pub use daily::{
    list_daily_stats, recent_sessions, record_completion, session_day, totals, DailyStats,
    StatsPeriod, Totals,
};
