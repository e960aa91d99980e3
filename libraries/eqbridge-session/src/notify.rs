//! Outbound notifications
//!
//! The coordinator reports to two audiences through one injected sink:
//! - the host application (new audio session ids)
//! - the platform audio-effect subsystem (system equalizer open/close)

use crossbeam_channel::{Sender, TrySendError};
use eqbridge_core::SessionId;
use serde::{Deserialize, Serialize};

/// Notifications emitted by the coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum EqualizerNotification {
    /// A new audio session started rendering
    AudioSessionId { session_id: SessionId },

    /// Hand the session to the system equalizer
    OpenAudioEffectControlSession {
        session_id: SessionId,
        package_id: String,
    },

    /// Take the session back from the system equalizer
    CloseAudioEffectControlSession {
        session_id: SessionId,
        package_id: String,
    },
}

impl EqualizerNotification {
    /// Host-facing event name
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::AudioSessionId { .. } => "audio-session-id",
            Self::OpenAudioEffectControlSession { .. } => "open-audio-effect-control-session",
            Self::CloseAudioEffectControlSession { .. } => "close-audio-effect-control-session",
        }
    }

    /// Session the notification refers to
    pub fn session_id(&self) -> SessionId {
        match self {
            Self::AudioSessionId { session_id }
            | Self::OpenAudioEffectControlSession { session_id, .. }
            | Self::CloseAudioEffectControlSession { session_id, .. } => *session_id,
        }
    }
}

/// Destination for coordinator notifications
///
/// Delivery is synchronous and must not block the engine thread.
pub trait NotificationSink: Send {
    fn notify(&mut self, notification: EqualizerNotification);
}

/// Sink that forwards notifications over a channel
///
/// Uses `try_send`; a full or disconnected channel drops the notification.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<EqualizerNotification>,
}

impl ChannelSink {
    pub fn new(tx: Sender<EqualizerNotification>) -> Self {
        Self { tx }
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&mut self, notification: EqualizerNotification) {
        match self.tx.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(n)) => {
                tracing::warn!("Notification queue full, dropping {}", n.event_name());
            }
            Err(TrySendError::Disconnected(n)) => {
                tracing::warn!("Notification receiver gone, dropping {}", n.event_name());
            }
        }
    }
}

impl<F> NotificationSink for F
where
    F: FnMut(EqualizerNotification) + Send,
{
    fn notify(&mut self, notification: EqualizerNotification) {
        self(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn serializes_with_event_tag() {
        let n = EqualizerNotification::OpenAudioEffectControlSession {
            session_id: SessionId::new(5),
            package_id: "app".to_string(),
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["event"], "open-audio-effect-control-session");
        assert_eq!(json["session_id"], 5);
        assert_eq!(json["package_id"], "app");
        assert_eq!(n.event_name(), "open-audio-effect-control-session");
    }

    #[test]
    fn channel_sink_drops_when_full() {
        let (tx, rx) = bounded(1);
        let mut sink = ChannelSink::new(tx);
        sink.notify(EqualizerNotification::AudioSessionId {
            session_id: SessionId::new(1),
        });
        sink.notify(EqualizerNotification::AudioSessionId {
            session_id: SessionId::new(2),
        });

        assert_eq!(rx.try_recv().unwrap().session_id(), SessionId::new(1));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closure_sink_receives_notifications() {
        let mut seen = Vec::new();
        {
            let mut sink = |n: EqualizerNotification| seen.push(n.session_id());
            sink.notify(EqualizerNotification::AudioSessionId {
                session_id: SessionId::new(4),
            });
        }
        assert_eq!(seen, vec![SessionId::new(4)]);
    }
}
