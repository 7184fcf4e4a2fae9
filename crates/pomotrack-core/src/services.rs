//! Platform capabilities the timer drives at transition points.
//!
//! Every collaborator is best-effort. The controller logs and swallows any
//! [`CollaboratorError`] so a missing notification daemon or a failed
//! wake-lock never interrupts a session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::CollaboratorError;
use crate::timer::SessionType;

/// Opaque id of a scheduled notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationHandle(pub String);

/// Source of the 1 Hz tick while a session runs.
///
/// The owner of the event loop forwards a `Command::Tick` to the controller
/// once per second for as long as the subscription is active.
pub trait Ticker {
    fn subscribe(&mut self) -> Result<(), CollaboratorError>;

    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}

pub trait Notifier {
    /// Schedule a completion alert `duration_min` minutes from now.
    fn schedule_completion(
        &mut self,
        session_type: SessionType,
        duration_min: u32,
    ) -> Result<NotificationHandle, CollaboratorError>;

    fn cancel(&mut self, handle: &NotificationHandle) -> Result<(), CollaboratorError>;

    /// Show the completion alert right away.
    fn show_immediate(&mut self, session_type: SessionType) -> Result<(), CollaboratorError>;
}

/// Keeps the device awake. Both calls are idempotent.
pub trait WakeLock {
    fn acquire(&mut self) -> Result<(), CollaboratorError>;

    fn release(&mut self) -> Result<(), CollaboratorError>;
}

pub trait Haptics {
    fn pulse_success(&mut self) -> Result<(), CollaboratorError>;
}

/// Ticker backed by a shared flag. Clone it to hand the event loop a view
/// of whether ticks should currently be delivered.
#[derive(Debug, Clone, Default)]
pub struct FlagTicker {
    active: Arc<AtomicBool>,
}

impl FlagTicker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Ticker for FlagTicker {
    fn subscribe(&mut self) -> Result<(), CollaboratorError> {
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn cancel(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn schedule_completion(
        &mut self,
        _session_type: SessionType,
        _duration_min: u32,
    ) -> Result<NotificationHandle, CollaboratorError> {
        Ok(NotificationHandle(String::new()))
    }

    fn cancel(&mut self, _handle: &NotificationHandle) -> Result<(), CollaboratorError> {
        Ok(())
    }

    fn show_immediate(&mut self, _session_type: SessionType) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NoopWakeLock;

impl WakeLock for NoopWakeLock {
    fn acquire(&mut self) -> Result<(), CollaboratorError> {
        Ok(())
    }

    fn release(&mut self) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NoopHaptics;

impl Haptics for NoopHaptics {
    fn pulse_success(&mut self) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// The full set of collaborators handed to the controller.
pub struct Services {
    pub ticker: Box<dyn Ticker>,
    pub notifier: Box<dyn Notifier>,
    pub wake_lock: Box<dyn WakeLock>,
    pub haptics: Box<dyn Haptics>,
}

impl Services {
    /// Flag ticker and no-op everything else.
    pub fn noop() -> Self {
        Self {
            ticker: Box::new(FlagTicker::new()),
            notifier: Box::new(NoopNotifier),
            wake_lock: Box::new(NoopWakeLock),
            haptics: Box::new(NoopHaptics),
        }
    }

    pub fn with_ticker(mut self, ticker: impl Ticker + 'static) -> Self {
        self.ticker = Box::new(ticker);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn with_wake_lock(mut self, wake_lock: impl WakeLock + 'static) -> Self {
        self.wake_lock = Box::new(wake_lock);
        self
    }

    pub fn with_haptics(mut self, haptics: impl Haptics + 'static) -> Self {
        self.haptics = Box::new(haptics);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_ticker_clones_share_state() {
        let mut ticker = FlagTicker::new();
        let view = ticker.clone();
        assert!(!view.is_active());
        ticker.subscribe().unwrap();
        assert!(view.is_active());
        ticker.cancel();
        assert!(!view.is_active());
    }
}
