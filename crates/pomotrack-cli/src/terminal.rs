//! Terminal renditions of the timer's platform collaborators.

use std::collections::HashSet;
use std::io::Write;

use notify_rust::Notification;
use pomotrack_core::services::{FlagTicker, Haptics, NotificationHandle, Notifier, WakeLock};
use pomotrack_core::{
    CollaboratorError, Config, PomodoroSettings, SessionType, Services, TimerState, TimerStatus,
};

/// Completion alerts shown as desktop notifications.
///
/// Desktop notification daemons cannot deliver an alert at a later time, so
/// scheduled completions are only tracked; the alert itself is shown when the
/// session completes. When no daemon answers, the alert is written to stderr.
#[derive(Debug, Default)]
pub struct TerminalNotifier {
    pending: HashSet<String>,
    next_id: u64,
}

impl TerminalNotifier {
    fn desktop_alert(session_type: SessionType) -> Result<(), CollaboratorError> {
        Notification::new()
            .summary(session_type.completion_title())
            .body(session_type.completion_body())
            .appname("pomotrack")
            .icon("alarm-clock")
            .show()
            .map(|_| ())
            .map_err(|e| CollaboratorError::new("notifier", e.to_string()))
    }

    fn stderr_alert(session_type: SessionType) -> Result<(), CollaboratorError> {
        let mut err = std::io::stderr().lock();
        writeln!(
            err,
            "\n{}\n{}",
            session_type.completion_title(),
            session_type.completion_body()
        )
        .map_err(|e| CollaboratorError::new("notifier", e.to_string()))
    }
}

impl Notifier for TerminalNotifier {
    fn schedule_completion(
        &mut self,
        session_type: SessionType,
        duration_min: u32,
    ) -> Result<NotificationHandle, CollaboratorError> {
        self.next_id += 1;
        let id = format!("{}-{}", session_type.label(), self.next_id);
        tracing::debug!(%id, duration_min, "tracking completion alert");
        self.pending.insert(id.clone());
        Ok(NotificationHandle(id))
    }

    fn cancel(&mut self, handle: &NotificationHandle) -> Result<(), CollaboratorError> {
        self.pending.remove(&handle.0);
        Ok(())
    }

    fn show_immediate(&mut self, session_type: SessionType) -> Result<(), CollaboratorError> {
        self.pending.clear();
        if let Err(e) = Self::desktop_alert(session_type) {
            tracing::warn!("desktop notification failed, falling back to stderr: {e}");
            return Self::stderr_alert(session_type);
        }
        Ok(())
    }
}

/// Rings the terminal bell in place of a vibration.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl Haptics for TerminalBell {
    fn pulse_success(&mut self) -> Result<(), CollaboratorError> {
        let mut err = std::io::stderr().lock();
        err.write_all(b"\x07")
            .and_then(|_| err.flush())
            .map_err(|e| CollaboratorError::new("haptics", e.to_string()))
    }
}

/// Tracks the keep-awake request. Terminals expose no sleep inhibitor, so
/// this only records and logs the hold.
#[derive(Debug, Default)]
pub struct LoggedWakeLock {
    held: bool,
}

impl WakeLock for LoggedWakeLock {
    fn acquire(&mut self) -> Result<(), CollaboratorError> {
        if !self.held {
            self.held = true;
            tracing::debug!("keep-awake requested");
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), CollaboratorError> {
        if self.held {
            self.held = false;
            tracing::debug!("keep-awake released");
        }
        Ok(())
    }
}

/// Collaborators for the foreground timer, honouring the config toggles.
pub fn services(config: &Config) -> Services {
    let mut services = Services::noop().with_ticker(FlagTicker::new());
    if config.notifications.enabled {
        services = services.with_notifier(TerminalNotifier::default());
    }
    if config.notifications.haptics {
        services = services.with_haptics(TerminalBell);
    }
    if config.power.keep_awake {
        services = services.with_wake_lock(LoggedWakeLock::default());
    }
    services
}

/// One-line status: `Work Time 12:30 [running] 50% session #1`.
pub fn status_line(state: &TimerState, settings: &PomodoroSettings) -> String {
    let status = match state.status {
        TimerStatus::Idle => "idle",
        TimerStatus::Running => "running",
        TimerStatus::Paused => "paused",
        TimerStatus::Completed => "completed",
    };
    let total = settings.duration_secs(state.session_type);
    let percent = (state.progress(total) * 100.0).round() as u32;
    format!(
        "{} {} [{}] {}% session #{}",
        state.session_type.label(),
        state.formatted_remaining(),
        status,
        percent,
        state.session_count
    )
}

/// Redraw the status line in place.
pub fn render(state: &TimerState, settings: &PomodoroSettings) {
    let mut out = std::io::stdout().lock();
    let _ = write!(out, "\r\x1b[2K{}", status_line(state, settings));
    let _ = out.flush();
}
