use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::timer::{PomodoroSession, SessionKind};

/// Aggregate of the sessions completed on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub completed_sessions: u32,
    /// Minutes.
    pub total_work_time: u32,
    /// Minutes.
    pub total_break_time: u32,
}

impl DailyStats {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            completed_sessions: 0,
            total_work_time: 0,
            total_break_time: 0,
        }
    }

    /// Add one completed session to this day's counters.
    pub fn absorb(&mut self, session: &PomodoroSession) {
        self.completed_sessions = self.completed_sessions.saturating_add(1);
        match session.kind {
            SessionKind::Work => {
                self.total_work_time = self.total_work_time.saturating_add(session.duration);
            }
            SessionKind::Break => {
                self.total_break_time = self.total_break_time.saturating_add(session.duration);
            }
        }
    }
}

/// Local calendar day a session belongs to, taken from its start time.
pub fn session_day(session: &PomodoroSession) -> NaiveDate {
    session.start_time.with_timezone(&Local).date_naive()
}

/// Fold a completed session into `stats`, creating its day on first use.
///
/// Sessions that did not complete are ignored and `None` is returned.
/// There is no deduplication by session id: call once per completion.
pub fn record_completion<'a>(
    stats: &'a mut Vec<DailyStats>,
    session: &PomodoroSession,
) -> Option<&'a DailyStats> {
    if !session.completed {
        tracing::warn!(session_id = %session.id, "refusing to aggregate an incomplete session");
        return None;
    }
    let date = session_day(session);
    let idx = match stats.iter().position(|d| d.date == date) {
        Some(idx) => idx,
        None => {
            stats.push(DailyStats::empty(date));
            stats.len() - 1
        }
    };
    stats[idx].absorb(session);
    Some(&stats[idx])
}

/// One entry per day in `start..=end`, ascending, with zero-valued entries
/// for days that have no recorded activity. Empty if `start > end`.
pub fn list_daily_stats(stats: &[DailyStats], start: NaiveDate, end: NaiveDate) -> Vec<DailyStats> {
    let mut days = Vec::new();
    let mut date = start;
    while date <= end {
        let day = stats
            .iter()
            .find(|d| d.date == date)
            .cloned()
            .unwrap_or_else(|| DailyStats::empty(date));
        days.push(day);
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    days
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub completed_sessions: u32,
    pub total_work_time: u32,
    pub total_break_time: u32,
}

/// Sum the completed sessions in `sessions`.
pub fn totals<'a, I>(sessions: I) -> Totals
where
    I: IntoIterator<Item = &'a PomodoroSession>,
{
    sessions
        .into_iter()
        .filter(|s| s.completed)
        .fold(Totals::default(), |mut acc, s| {
            acc.completed_sessions = acc.completed_sessions.saturating_add(1);
            match s.kind {
                SessionKind::Work => acc.total_work_time = acc.total_work_time.saturating_add(s.duration),
                SessionKind::Break => {
                    acc.total_break_time = acc.total_break_time.saturating_add(s.duration)
                }
            }
            acc
        })
}

/// The last `limit` sessions, oldest first.
pub fn recent_sessions(sessions: &[PomodoroSession], limit: usize) -> &[PomodoroSession] {
    &sessions[sessions.len().saturating_sub(limit)..]
}

/// Reporting windows offered by the history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Week,
    Month,
}

impl StatsPeriod {
    pub fn days(self) -> i64 {
        match self {
            StatsPeriod::Week => 7,
            StatsPeriod::Month => 30,
        }
    }

    /// Inclusive range of `days()` days ending on `today`.
    pub fn range(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (today - Duration::days(self.days() - 1), today)
    }
}
