//! Timer controller.
//!
//! Owns the [`TimerEngine`], the active settings, the session store and the
//! platform collaborators. It is the only thing that mutates timer state:
//! every intent and every tick arrives as a [`Command`] and is handled to
//! completion before the next one.
//!
//! Side effects follow the engine's transitions:
//!
//! | transition | ticker    | notification        | wake-lock | store            |
//! |------------|-----------|---------------------|-----------|------------------|
//! | start      | subscribe | schedule completion | acquire   |                  |
//! | pause      | cancel    | cancel pending      | release   |                  |
//! | reset      | cancel    | cancel pending      | release   |                  |
//! | skip       | (pause first if running)                    |                  |
//! | complete   | cancel    | show immediately    | release   | session + stats  |
//!
//! Store and collaborator failures are logged and swallowed; the in-memory
//! transition always goes through.

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::engine::TimerEngine;
use super::session::{TimerState, TimerStatus};
use crate::error::ValidationError;
use crate::events::Event;
use crate::services::{NotificationHandle, Services};
use crate::settings::PomodoroSettings;
use crate::storage::SessionStore;

/// Everything that can change timer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tick,
    Start,
    Pause,
    Reset,
    Skip,
    UpdateSettings(PomodoroSettings),
}

pub struct TimerController {
    engine: TimerEngine,
    settings: PomodoroSettings,
    store: Box<dyn SessionStore>,
    services: Services,
    pending_notification: Option<NotificationHandle>,
    state_tx: watch::Sender<TimerState>,
}

impl TimerController {
    /// Build a controller idle at the start of a work session, using the
    /// stored settings (or defaults if none are stored or they are unreadable).
    pub fn new(store: Box<dyn SessionStore>, services: Services) -> Self {
        let settings = match store.load_settings() {
            Ok(Some(settings)) => match settings.validate() {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("stored settings invalid, using defaults: {e}");
                    PomodoroSettings::default()
                }
            },
            Ok(None) => PomodoroSettings::default(),
            Err(e) => {
                tracing::warn!("failed to load settings, using defaults: {e}");
                PomodoroSettings::default()
            }
        };
        let engine = TimerEngine::new(&settings);
        let (state_tx, _) = watch::channel(engine.state().clone());
        Self {
            engine,
            settings,
            store,
            services,
            pending_notification: None,
            state_tx,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        self.engine.state()
    }

    pub fn settings(&self) -> &PomodoroSettings {
        &self.settings
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.state_tx.subscribe()
    }

    /// Whether the event loop should currently deliver ticks.
    pub fn is_ticking(&self) -> bool {
        self.services.ticker.is_active()
    }

    // ── Intents ──────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        self.dispatch(Command::Start)
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.dispatch(Command::Pause)
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.dispatch(Command::Reset)
    }

    pub fn skip(&mut self) -> Option<Event> {
        self.dispatch(Command::Skip)
    }

    pub fn tick(&mut self) -> Option<Event> {
        self.dispatch(Command::Tick)
    }

    /// Validate, persist and adopt new settings.
    ///
    /// # Errors
    /// Returns the validation failure; nothing is changed in that case.
    pub fn update_settings(&mut self, candidate: PomodoroSettings) -> Result<Event, ValidationError> {
        let at = Utc::now();
        let event = self.apply_settings(candidate, at)?;
        self.publish();
        Ok(event)
    }

    /// Handle one command with the current wall-clock time.
    ///
    /// # Errors
    /// Only `UpdateSettings` can fail, with the validation error.
    pub fn handle(&mut self, command: Command) -> Result<Option<Event>, ValidationError> {
        self.handle_at(command, Utc::now())
    }

    /// Handle one command as if it happened at `now`.
    ///
    /// # Errors
    /// Only `UpdateSettings` can fail, with the validation error.
    pub fn handle_at(
        &mut self,
        command: Command,
        now: DateTime<Utc>,
    ) -> Result<Option<Event>, ValidationError> {
        let event = match command {
            Command::Tick => self.on_tick(now),
            Command::Start => self.on_start(now),
            Command::Pause => self.on_pause(now),
            Command::Reset => Some(self.on_reset(now)),
            Command::Skip => Some(self.on_skip(now)),
            Command::UpdateSettings(candidate) => Some(self.apply_settings(candidate, now)?),
        };
        if let Some(ref event) = event {
            tracing::trace!(event = event.name(), "timer transition");
        }
        self.publish();
        Ok(event)
    }

    fn dispatch(&mut self, command: Command) -> Option<Event> {
        match self.handle(command) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("command rejected: {e}");
                None
            }
        }
    }

    // ── Transitions ──────────────────────────────────────────────────

    fn on_start(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let event = self.engine.start(now)?;
        if let Event::TimerStarted {
            ref session_id,
            session_type,
            duration_min,
            ..
        } = event
        {
            tracing::info!(%session_id, ?session_type, duration_min, "session started");
            match self
                .services
                .notifier
                .schedule_completion(session_type, duration_min)
            {
                Ok(handle) => {
                    tracing::debug!(handle = %handle.0, "completion notification scheduled");
                    self.pending_notification = Some(handle);
                }
                Err(e) => tracing::warn!("{e}"),
            }
        }
        if let Err(e) = self.services.wake_lock.acquire() {
            tracing::warn!("{e}");
        }
        if let Err(e) = self.services.ticker.subscribe() {
            tracing::warn!("{e}");
        }
        Some(event)
    }

    fn on_tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.engine.tick(now)? {
            Event::TimerExpired { .. } => self.on_complete(now),
            other => Some(other),
        }
    }

    fn on_pause(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let event = self.engine.pause(now)?;
        self.release_resources();
        tracing::debug!(remaining = self.engine.remaining_secs(), "session paused");
        Some(event)
    }

    fn on_reset(&mut self, now: DateTime<Utc>) -> Event {
        self.release_resources();
        if let Some(session) = &self.engine.state().current_session {
            tracing::info!(session_id = %session.id, "session discarded by reset");
        }
        self.engine.reset(now, &self.settings)
    }

    fn on_skip(&mut self, now: DateTime<Utc>) -> Event {
        if self.engine.status() == TimerStatus::Running {
            self.on_pause(now);
        }
        let event = self.engine.skip(now, &self.settings);
        if let Event::TimerSkipped { from, to, .. } = event {
            tracing::info!(?from, ?to, "session skipped");
        }
        event
    }

    /// Drain `Completed`: stop auxiliary effects, record the session and
    /// line up the next one.
    fn on_complete(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let finished = self.engine.session_type();
        self.services.ticker.cancel();
        // The scheduled alert has fired by now; drop the handle without cancelling.
        self.pending_notification = None;
        if let Err(e) = self.services.notifier.show_immediate(finished) {
            tracing::warn!("{e}");
        }
        if let Err(e) = self.services.wake_lock.release() {
            tracing::warn!("{e}");
        }
        if let Err(e) = self.services.haptics.pulse_success() {
            tracing::warn!("{e}");
        }

        let event = self.engine.complete(now, &self.settings)?;
        if let Event::SessionCompleted {
            session: Some(ref session),
            next_type,
            ..
        } = event
        {
            tracing::info!(
                session_id = %session.id,
                kind = session.kind.as_str(),
                duration = session.duration,
                ?next_type,
                "session completed"
            );
            if let Err(e) = self.store.append_session(session) {
                tracing::warn!("failed to save session {}: {e}", session.id);
            }
            if let Err(e) = self.store.record_daily_stats(session) {
                tracing::warn!("failed to update daily stats for {}: {e}", session.id);
            }
        }
        Some(event)
    }

    fn apply_settings(
        &mut self,
        candidate: PomodoroSettings,
        now: DateTime<Utc>,
    ) -> Result<Event, ValidationError> {
        let settings = candidate.validate()?;
        if let Err(e) = self.store.save_settings(&settings) {
            tracing::warn!("failed to save settings: {e}");
        }
        self.settings = settings;
        let resized = self.engine.apply_settings(&settings);
        tracing::info!(?settings, resized, "settings updated");
        Ok(Event::SettingsUpdated {
            settings,
            resized,
            at: now,
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Cancel the tick subscription and pending alert, release the wake-lock.
    fn release_resources(&mut self) {
        self.services.ticker.cancel();
        if let Some(handle) = self.pending_notification.take() {
            if let Err(e) = self.services.notifier.cancel(&handle) {
                tracing::warn!("{e}");
            }
        }
        if let Err(e) = self.services.wake_lock.release() {
            tracing::warn!("{e}");
        }
    }

    fn publish(&self) {
        let current = self.engine.state();
        self.state_tx.send_if_modified(|state| {
            if state != current {
                *state = current.clone();
                true
            } else {
                false
            }
        });
    }
}
