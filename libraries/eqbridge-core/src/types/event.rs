//! Session lifecycle events
//!
//! Engines report audio session changes through a [`SessionEventSender`]
//! handed to them once, when the coordinator is built. Events are queued and
//! drained by the coordinator on the engine's callback thread.

use super::{config::EqualizerConfig, session::SessionId};
use crossbeam_channel::{Sender, TrySendError};

/// Audio session lifecycle events emitted by a playback engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Audio rendering started on a (non-sentinel) session
    SessionIdChanged(SessionId),

    /// Audio rendering stopped (track change, stop, release)
    AudioDisabled,
}

/// Everything the coordinator consumes from its queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorEvent {
    /// Lifecycle event from the engine
    Session(SessionEvent),

    /// Configuration marshalled from a host thread
    ConfigChanged(EqualizerConfig),
}

/// Engine-side handle for reporting session events
///
/// Sending never blocks. The coordinator keeps this queue unbounded, so an
/// event is only dropped (reporting `false`) once the coordinator is gone.
#[derive(Debug, Clone)]
pub struct SessionEventSender {
    tx: Sender<CoordinatorEvent>,
}

impl SessionEventSender {
    pub fn new(tx: Sender<CoordinatorEvent>) -> Self {
        Self { tx }
    }

    /// Report a new audio session
    pub fn session_id_changed(&self, session_id: SessionId) -> bool {
        self.send(SessionEvent::SessionIdChanged(session_id))
    }

    /// Report that audio rendering stopped
    pub fn audio_disabled(&self) -> bool {
        self.send(SessionEvent::AudioDisabled)
    }

    /// Report an arbitrary session event
    pub fn send(&self, event: SessionEvent) -> bool {
        match self.tx.try_send(CoordinatorEvent::Session(event)) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn forwards_session_events() {
        let (tx, rx) = bounded(4);
        let sender = SessionEventSender::new(tx);

        assert!(sender.session_id_changed(SessionId::new(9)));
        assert!(sender.audio_disabled());

        assert_eq!(
            rx.try_recv().unwrap(),
            CoordinatorEvent::Session(SessionEvent::SessionIdChanged(SessionId::new(9)))
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            CoordinatorEvent::Session(SessionEvent::AudioDisabled)
        );
    }

    #[test]
    fn full_or_closed_queue_drops_events() {
        let (tx, rx) = bounded(1);
        let sender = SessionEventSender::new(tx);

        assert!(sender.audio_disabled());
        assert!(!sender.audio_disabled());

        drop(rx);
        assert!(!sender.session_id_changed(SessionId::new(1)));
    }
}
