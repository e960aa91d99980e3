/// Core error types for eqbridge
use thiserror::Error;

use crate::types::SessionId;

/// Result type alias using `EqError`
pub type Result<T> = std::result::Result<T, EqError>;

/// Core error type for eqbridge
#[derive(Error, Debug)]
pub enum EqError {
    /// The effect backend could not provide an equalizer for the session
    #[error("Equalizer unavailable for session {session}: {reason}")]
    EffectUnavailable { session: SessionId, reason: String },

    /// An operation on a live equalizer failed
    #[error("Equalizer operation failed: {0}")]
    EffectOperation(String),

    /// Settings payload is malformed or incompatible with the equalizer
    #[error("Invalid equalizer settings: {0}")]
    InvalidSettings(String),

    /// The playback engine has already been released
    #[error("Playback engine released")]
    EngineReleased,

    /// The coordinator's event queue rejected an event
    #[error("Event queue error: {0}")]
    EventQueue(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl EqError {
    /// Create an effect unavailable error
    pub fn effect_unavailable(session: SessionId, reason: impl Into<String>) -> Self {
        Self::EffectUnavailable {
            session,
            reason: reason.into(),
        }
    }

    /// Create an effect operation error
    pub fn effect_operation(msg: impl Into<String>) -> Self {
        Self::EffectOperation(msg.into())
    }

    /// Create an invalid settings error
    pub fn invalid_settings(msg: impl Into<String>) -> Self {
        Self::InvalidSettings(msg.into())
    }

    /// Create an event queue error
    pub fn event_queue(msg: impl Into<String>) -> Self {
        Self::EventQueue(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
