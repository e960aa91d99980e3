//! Simulated playback engine
//!
//! Stands in for a real player: holds the current audio session id and
//! reports session changes through the coordinator's event queue.

use eqbridge_core::{PlaybackEngine, SessionEventSender, SessionId};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct EngineState {
    session: SessionId,
    events: Option<SessionEventSender>,
    released: bool,
}

/// Cloneable handle to one simulated engine
///
/// One clone goes to the coordinator; the runner keeps another to drive it.
#[derive(Debug, Clone, Default)]
pub struct SimulatedEngine {
    state: Arc<Mutex<EngineState>>,
}

impl SimulatedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start rendering on `session` and report it
    ///
    /// Returns `false` if the event could not be queued.
    pub fn start_session(&self, session: SessionId) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.released {
            tracing::warn!("Engine released, ignoring session {}", session);
            return false;
        }
        state.session = session;
        state
            .events
            .as_ref()
            .is_some_and(|events| events.session_id_changed(session))
    }

    /// Stop rendering and report it
    pub fn stop(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.released {
            return false;
        }
        state.session = SessionId::NONE;
        state
            .events
            .as_ref()
            .is_some_and(SessionEventSender::audio_disabled)
    }

    pub fn is_released(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .released
    }
}

impl PlaybackEngine for SimulatedEngine {
    fn audio_session_id(&self) -> SessionId {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .session
    }

    fn subscribe_session_events(&mut self, events: SessionEventSender) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .events = Some(events);
    }

    fn release(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.released = true;
        state.session = SessionId::NONE;
        state.events = None;
        tracing::debug!("Simulated engine released");
    }
}
