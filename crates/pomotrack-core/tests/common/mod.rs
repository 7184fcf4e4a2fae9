//! Recording collaborators shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use pomotrack_core::services::{Haptics, NotificationHandle, Notifier, Ticker, WakeLock};
use pomotrack_core::{CollaboratorError, SessionType, Services};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Subscribe,
    CancelTicks,
    Schedule(SessionType, u32),
    CancelNotification(String),
    ShowImmediate(SessionType),
    Acquire,
    Release,
    Pulse,
}

/// Shared call log. Clones observe the same calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<Call>>>,
    active: Rc<RefCell<bool>>,
    next_handle: Rc<RefCell<u32>>,
    failing: bool,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every collaborator built from this log errors after recording.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    pub fn ticking(&self) -> bool {
        *self.active.borrow()
    }

    pub fn services(&self) -> Services {
        Services {
            ticker: Box::new(self.clone()),
            notifier: Box::new(self.clone()),
            wake_lock: Box::new(self.clone()),
            haptics: Box::new(self.clone()),
        }
    }

    fn record(&self, call: Call, service: &'static str) -> Result<(), CollaboratorError> {
        self.calls.borrow_mut().push(call);
        if self.failing {
            Err(CollaboratorError::new(service, "unavailable"))
        } else {
            Ok(())
        }
    }
}

impl Ticker for CallLog {
    fn subscribe(&mut self) -> Result<(), CollaboratorError> {
        *self.active.borrow_mut() = true;
        self.record(Call::Subscribe, "ticker")
    }

    fn cancel(&mut self) {
        *self.active.borrow_mut() = false;
        self.calls.borrow_mut().push(Call::CancelTicks);
    }

    fn is_active(&self) -> bool {
        self.ticking()
    }
}

impl Notifier for CallLog {
    fn schedule_completion(
        &mut self,
        session_type: SessionType,
        duration_min: u32,
    ) -> Result<NotificationHandle, CollaboratorError> {
        self.record(Call::Schedule(session_type, duration_min), "notifier")?;
        let mut next = self.next_handle.borrow_mut();
        *next += 1;
        Ok(NotificationHandle(format!("n{next}")))
    }

    fn cancel(&mut self, handle: &NotificationHandle) -> Result<(), CollaboratorError> {
        self.record(Call::CancelNotification(handle.0.clone()), "notifier")
    }

    fn show_immediate(&mut self, session_type: SessionType) -> Result<(), CollaboratorError> {
        self.record(Call::ShowImmediate(session_type), "notifier")
    }
}

impl WakeLock for CallLog {
    fn acquire(&mut self) -> Result<(), CollaboratorError> {
        self.record(Call::Acquire, "wake-lock")
    }

    fn release(&mut self) -> Result<(), CollaboratorError> {
        self.record(Call::Release, "wake-lock")
    }
}

impl Haptics for CallLog {
    fn pulse_success(&mut self) -> Result<(), CollaboratorError> {
        self.record(Call::Pulse, "haptics")
    }
}
