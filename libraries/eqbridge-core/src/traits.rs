/// Collaborator traits for eqbridge
use crate::error::Result;
use crate::types::{EqualizerSettings, SessionEventSender, SessionId};

/// The slice of a playback engine the equalizer coordinator needs
///
/// Engines keep their full playback API to themselves; the coordinator only
/// queries the current session and listens for session lifecycle events.
pub trait PlaybackEngine: Send {
    /// Current audio session id, or [`SessionId::NONE`] when no audio is rendered
    fn audio_session_id(&self) -> SessionId;

    /// Register the session event listener
    ///
    /// Called exactly once, when the coordinator is constructed. The engine
    /// must keep reporting through this sender across re-preparation.
    fn subscribe_session_events(&mut self, events: SessionEventSender);

    /// Release engine resources
    fn release(&mut self);
}

/// Live in-process equalizer bound to one audio session
///
/// # Resource rules
/// - `release()` must disable the effect and free the underlying resource
/// - `release()` must be idempotent
/// - After release, property calls may fail with an error
pub trait EqualizerEffect: Send {
    /// Session this effect is attached to
    fn session_id(&self) -> SessionId;

    /// Apply settings (preset and band levels)
    fn set_properties(&mut self, settings: &EqualizerSettings) -> Result<()>;

    /// Snapshot of the current settings
    fn properties(&self) -> EqualizerSettings;

    /// Enable/disable the effect
    fn set_enabled(&mut self, enabled: bool) -> Result<()>;

    /// Check if the effect is enabled
    fn is_enabled(&self) -> bool;

    /// Disable and free the effect
    fn release(&mut self);
}

/// Source of in-process equalizers
pub trait EqualizerFactory: Send {
    /// Acquire an equalizer attached to `session`
    ///
    /// # Errors
    /// Returns an error if the backend cannot provide an effect (for example
    /// when its instance pool is exhausted). Callers do not retry.
    fn create(&mut self, priority: i32, session: SessionId) -> Result<Box<dyn EqualizerEffect>>;
}
