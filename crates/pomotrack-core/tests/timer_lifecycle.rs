//! Integration tests for the timer controller.
//!
//! Drives the controller with explicit commands and a fixed clock, and
//! checks the side effects on collaborators and the store.

mod common;

use chrono::{Duration, TimeZone, Utc};
use common::{Call, CallLog};
use pomotrack_core::stats::session_day;
use pomotrack_core::{
    Command, Event, MemoryStore, PomodoroSettings, SessionKind, SessionStore, SessionType,
    TimerController, TimerState, TimerStatus,
};

fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap()
}

fn controller_with(settings: PomodoroSettings, log: &CallLog) -> TimerController {
    let mut store = MemoryStore::new();
    store.save_settings(&settings).unwrap();
    TimerController::new(Box::new(store), log.services())
}

/// Tick until the running session finishes; returns the last event.
fn run_out(c: &mut TimerController) -> Option<Event> {
    let mut at = t0();
    let mut last = None;
    while c.state().status == TimerStatus::Running {
        at += Duration::seconds(1);
        last = c.handle_at(Command::Tick, at).unwrap();
    }
    last
}

#[test]
fn start_schedules_and_subscribes() {
    let log = CallLog::new();
    let mut c = controller_with(PomodoroSettings::default(), &log);

    let event = c.handle_at(Command::Start, t0()).unwrap();
    assert!(matches!(
        event,
        Some(Event::TimerStarted {
            session_type: SessionType::Work,
            duration_min: 25,
            ..
        })
    ));
    assert_eq!(
        log.calls(),
        vec![Call::Schedule(SessionType::Work, 25), Call::Acquire, Call::Subscribe]
    );
    let session = c.state().current_session.clone().unwrap();
    assert_eq!(session.kind, SessionKind::Work);
    assert_eq!(session.start_time, t0());
    assert!(!session.completed);
}

#[test]
fn start_while_running_is_noop() {
    let log = CallLog::new();
    let mut c = controller_with(PomodoroSettings::default(), &log);
    c.handle_at(Command::Start, t0()).unwrap();
    log.clear();
    assert!(c.handle_at(Command::Start, t0()).unwrap().is_none());
    assert!(log.calls().is_empty());
}

#[test]
fn pause_cancels_everything_and_keeps_time() {
    let log = CallLog::new();
    let mut c = controller_with(PomodoroSettings::default(), &log);
    c.handle_at(Command::Start, t0()).unwrap();
    for _ in 0..10 {
        c.handle_at(Command::Tick, t0()).unwrap();
    }
    log.clear();

    c.handle_at(Command::Pause, t0()).unwrap();
    assert_eq!(
        log.calls(),
        vec![
            Call::CancelTicks,
            Call::CancelNotification("n1".into()),
            Call::Release
        ]
    );
    assert_eq!(c.state().status, TimerStatus::Paused);
    assert_eq!(c.state().remaining_time, 1490);
    assert!(!log.ticking());

    // A stray tick after pause must not move the clock.
    c.handle_at(Command::Tick, t0()).unwrap();
    assert_eq!(c.state().remaining_time, 1490);
}

#[test]
fn resume_schedules_for_remaining_minutes() {
    let log = CallLog::new();
    let mut c = controller_with(PomodoroSettings::default(), &log);
    c.handle_at(Command::Start, t0()).unwrap();
    for _ in 0..90 {
        c.handle_at(Command::Tick, t0()).unwrap();
    }
    c.handle_at(Command::Pause, t0()).unwrap();
    log.clear();

    c.handle_at(Command::Start, t0()).unwrap();
    assert_eq!(log.calls()[0], Call::Schedule(SessionType::Work, 24));
    assert_eq!(c.state().current_session.as_ref().unwrap().duration, 24);
}

#[test]
fn reset_always_returns_to_initial_state() {
    let settings = PomodoroSettings::new(30, 5, 15, 2);
    let log = CallLog::new();
    let mut c = controller_with(settings, &log);

    // Build up some history: one full work+break cycle, then a running session.
    c.handle_at(Command::Start, t0()).unwrap();
    run_out(&mut c);
    c.handle_at(Command::Start, t0()).unwrap();
    run_out(&mut c);
    c.handle_at(Command::Start, t0()).unwrap();
    assert_eq!(c.state().session_count, 1);
    let recorded = c.store().load_sessions().unwrap().len();

    c.handle_at(Command::Reset, t0()).unwrap();
    assert_eq!(c.state(), &TimerState::initial(&settings));
    assert!(!log.ticking());
    assert_eq!(c.store().load_sessions().unwrap().len(), recorded);

    // From idle and from paused as well.
    c.handle_at(Command::Reset, t0()).unwrap();
    assert_eq!(c.state(), &TimerState::initial(&settings));
    c.handle_at(Command::Start, t0()).unwrap();
    c.handle_at(Command::Pause, t0()).unwrap();
    c.handle_at(Command::Reset, t0()).unwrap();
    assert_eq!(c.state(), &TimerState::initial(&settings));
}

#[test]
fn reset_cancels_pending_notification() {
    let log = CallLog::new();
    let mut c = controller_with(PomodoroSettings::default(), &log);
    c.handle_at(Command::Start, t0()).unwrap();
    c.handle_at(Command::Reset, t0()).unwrap();
    assert_eq!(log.count(&Call::CancelNotification("n1".into())), 1);
    assert_eq!(log.count(&Call::CancelTicks), 1);
}

#[test]
fn skip_while_running_pauses_then_discards() {
    let log = CallLog::new();
    let mut c = controller_with(PomodoroSettings::default(), &log);
    c.handle_at(Command::Start, t0()).unwrap();
    c.handle_at(Command::Tick, t0()).unwrap();
    log.clear();

    let event = c.handle_at(Command::Skip, t0()).unwrap();
    assert!(matches!(
        event,
        Some(Event::TimerSkipped {
            from: SessionType::Work,
            to: SessionType::Break,
            ..
        })
    ));
    assert_eq!(
        log.calls(),
        vec![
            Call::CancelTicks,
            Call::CancelNotification("n1".into()),
            Call::Release
        ]
    );
    assert_eq!(c.state().status, TimerStatus::Idle);
    assert!(c.state().current_session.is_none());
    assert_eq!(c.state().remaining_time, 300);
    assert!(c.store().load_sessions().unwrap().is_empty());
    assert!(c.store().load_daily_stats().unwrap().is_empty());
}

#[test]
fn skip_from_idle_has_no_side_effects() {
    let log = CallLog::new();
    let mut c = controller_with(PomodoroSettings::default(), &log);
    c.handle_at(Command::Skip, t0()).unwrap();
    assert!(log.calls().is_empty());
    assert_eq!(c.state().session_type, SessionType::Break);
}

#[test]
fn completion_records_session_exactly_once() {
    let log = CallLog::new();
    let mut c = controller_with(PomodoroSettings::new(2, 1, 3, 4), &log);
    c.handle_at(Command::Start, t0()).unwrap();
    log.clear();

    let last = run_out(&mut c);
    let finished_at = t0() + Duration::seconds(120);
    match last {
        Some(Event::SessionCompleted {
            session: Some(session),
            session_type: SessionType::Work,
            next_type: SessionType::Break,
            at,
        }) => {
            assert_eq!(at, finished_at);
            assert_eq!(session.end_time, Some(finished_at));
            assert!(session.completed);
        }
        other => panic!("Expected SessionCompleted, got {other:?}"),
    }
    assert_eq!(
        log.calls(),
        vec![
            Call::CancelTicks,
            Call::ShowImmediate(SessionType::Work),
            Call::Release,
            Call::Pulse
        ]
    );

    let sessions = c.store().load_sessions().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].duration, 2);
    assert!(sessions[0].completed);

    let day = c
        .store()
        .daily_stats_for(session_day(&sessions[0]))
        .unwrap()
        .unwrap();
    assert_eq!(day.completed_sessions, 1);
    assert_eq!(day.total_work_time, 2);
    assert_eq!(day.total_break_time, 0);

    // Extra ticks after completion do nothing.
    c.handle_at(Command::Tick, finished_at).unwrap();
    assert_eq!(c.store().load_sessions().unwrap().len(), 1);
    assert_eq!(c.state().remaining_time, 60);
}

#[test]
fn long_break_recorded_as_break() {
    let log = CallLog::new();
    let mut c = controller_with(PomodoroSettings::new(1, 1, 2, 1), &log);
    c.handle_at(Command::Start, t0()).unwrap();
    run_out(&mut c);
    assert_eq!(c.state().session_type, SessionType::LongBreak);
    c.handle_at(Command::Start, t0()).unwrap();
    run_out(&mut c);

    let sessions = c.store().load_sessions().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[1].kind, SessionKind::Break);
    assert_eq!(sessions[1].duration, 2);
}

#[test]
fn four_pomodoros_earn_a_long_break() {
    let log = CallLog::new();
    let mut c = controller_with(PomodoroSettings::new(25, 5, 15, 4), &log);

    let mut successors = Vec::new();
    for cycle in 1..=4 {
        c.handle_at(Command::Start, t0()).unwrap();
        if let Some(Event::SessionCompleted { next_type, .. }) = run_out(&mut c) {
            successors.push(next_type);
        }
        c.handle_at(Command::Start, t0()).unwrap();
        run_out(&mut c);
        assert_eq!(c.state().session_count, cycle);
        assert_eq!(c.state().session_type, SessionType::Work);
    }
    assert_eq!(successors.last(), Some(&SessionType::LongBreak));
    assert_eq!(&successors[..3], &[SessionType::Break; 3]);
    assert_eq!(c.state().session_count, 4);

    let sessions = c.store().load_sessions().unwrap();
    assert_eq!(sessions.len(), 8);
    let stats = c.store().load_daily_stats().unwrap();
    let total: u32 = stats.iter().map(|d| d.completed_sessions).sum();
    assert_eq!(total, 8);
    let work: u32 = stats.iter().map(|d| d.total_work_time).sum();
    let brk: u32 = stats.iter().map(|d| d.total_break_time).sum();
    assert_eq!(work, 100);
    assert_eq!(brk, 5 * 3 + 15);
}

#[test]
fn collaborator_failures_never_stop_the_timer() {
    let log = CallLog::failing();
    let mut c = controller_with(PomodoroSettings::new(1, 1, 1, 4), &log);
    assert!(c.handle_at(Command::Start, t0()).unwrap().is_some());
    assert_eq!(c.state().status, TimerStatus::Running);
    c.handle_at(Command::Pause, t0()).unwrap();
    c.handle_at(Command::Start, t0()).unwrap();

    let last = run_out(&mut c);
    assert!(matches!(last, Some(Event::SessionCompleted { .. })));
    assert_eq!(c.store().load_sessions().unwrap().len(), 1);
}

#[test]
fn store_failures_are_swallowed() {
    let log = CallLog::new();
    let store = MemoryStore::new().fail_writes(true);
    let mut c = TimerController::new(Box::new(store), log.services());

    let longer = PomodoroSettings::new(1, 1, 1, 4);
    assert!(c.update_settings(longer).is_ok());
    assert_eq!(c.settings(), &longer);

    c.handle_at(Command::Start, t0()).unwrap();
    let last = run_out(&mut c);
    assert!(matches!(last, Some(Event::SessionCompleted { .. })));
    assert_eq!(c.state().status, TimerStatus::Idle);
    assert_eq!(c.state().session_type, SessionType::Break);
}

#[test]
fn settings_resize_idle_timer_only() {
    let log = CallLog::new();
    let mut c = controller_with(PomodoroSettings::default(), &log);

    let event = c
        .handle_at(Command::UpdateSettings(PomodoroSettings::new(40, 5, 15, 4)), t0())
        .unwrap();
    assert!(matches!(event, Some(Event::SettingsUpdated { resized: true, .. })));
    assert_eq!(c.state().remaining_time, 2400);
    assert_eq!(
        c.store().load_settings().unwrap(),
        Some(PomodoroSettings::new(40, 5, 15, 4))
    );

    c.handle_at(Command::Start, t0()).unwrap();
    let event = c
        .handle_at(Command::UpdateSettings(PomodoroSettings::new(10, 5, 15, 4)), t0())
        .unwrap();
    assert!(matches!(event, Some(Event::SettingsUpdated { resized: false, .. })));
    assert_eq!(c.state().remaining_time, 2400);

    // Next reset picks up the new work duration.
    c.handle_at(Command::Reset, t0()).unwrap();
    assert_eq!(c.state().remaining_time, 600);
}

#[test]
fn rejected_settings_change_nothing() {
    let log = CallLog::new();
    let mut c = controller_with(PomodoroSettings::default(), &log);
    let err = c
        .handle_at(Command::UpdateSettings(PomodoroSettings::new(0, 5, 15, 4)), t0())
        .unwrap_err();
    assert!(err.to_string().contains("work_duration"));
    assert_eq!(c.settings(), &PomodoroSettings::default());
    assert_eq!(
        c.store().load_settings().unwrap(),
        Some(PomodoroSettings::default())
    );
}

#[test]
fn state_invariants_hold_throughout() {
    let log = CallLog::new();
    let mut c = controller_with(PomodoroSettings::new(1, 1, 1, 2), &log);
    let script = [
        Command::Start,
        Command::Tick,
        Command::Pause,
        Command::Skip,
        Command::Start,
        Command::Reset,
        Command::Start,
    ];
    for cmd in script {
        c.handle_at(cmd, t0()).unwrap();
        assert!(c.state().is_consistent(), "{:?}", c.state());
    }
    for _ in 0..200 {
        c.handle_at(Command::Tick, t0()).unwrap();
        assert!(c.state().is_consistent(), "{:?}", c.state());
        if c.state().status == TimerStatus::Idle {
            c.handle_at(Command::Start, t0()).unwrap();
        }
    }
}
