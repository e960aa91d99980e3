//! eqbridge - Equalizer Session Coordinator
//!
//! Sits beside a playback engine and keeps an equalizer attached to its
//! current audio session:
//! - **Custom** mode: an in-process equalizer acquired from an [`EqualizerFactory`]
//! - **System** mode: open/close notifications so the platform equalizer attaches instead
//!
//! The coordinator observes session lifecycle events, owns the choice of mode,
//! and migrates cleanly between modes when the host reconfigures it at runtime.
//!
//! # Architecture
//!
//! Collaborators are injected at construction:
//! - [`PlaybackEngine`]: current session id + session event subscription
//! - [`EqualizerFactory`]: source of in-process equalizers
//! - [`NotificationSink`]: host and platform notifications
//!
//! # Example
//!
//! ```rust
//! use eqbridge_core::{
//!     EqualizerEffect, EqualizerFactory, PlaybackEngine, Result,
//!     SessionEventSender, SessionId,
//! };
//! use eqbridge_session::{CoordinatorConfig, EqualizerCoordinator, EqualizerNotification};
//!
//! struct Engine;
//!
//! impl PlaybackEngine for Engine {
//!     fn audio_session_id(&self) -> SessionId {
//!         SessionId::new(5)
//!     }
//!     fn subscribe_session_events(&mut self, _events: SessionEventSender) {}
//!     fn release(&mut self) {}
//! }
//!
//! struct NoEffects;
//!
//! impl EqualizerFactory for NoEffects {
//!     fn create(&mut self, _priority: i32, session: SessionId) -> Result<Box<dyn EqualizerEffect>> {
//!         Err(eqbridge_core::EqError::effect_unavailable(session, "no effects"))
//!     }
//! }
//!
//! let mut coordinator = EqualizerCoordinator::new(
//!     Engine,
//!     NoEffects,
//!     |n: EqualizerNotification| println!("{}", n.event_name()),
//!     CoordinatorConfig::for_package("com.example.player"),
//! )
//! .unwrap();
//!
//! // Before any configuration, sessions go to the system equalizer
//! coordinator.on_session_created(SessionId::new(5)).unwrap();
//! assert_eq!(coordinator.system_session(), Some(SessionId::new(5)));
//! ```

mod config;
mod coordinator;
mod notify;

pub use config::{CoordinatorConfig, SystemEqualizerPolicy};
pub use coordinator::{ConfigHandle, EqualizerCoordinator};
pub use notify::{ChannelSink, EqualizerNotification, NotificationSink};

pub use eqbridge_core::{
    BindingMode, EqError, EqualizerConfig, EqualizerEffect, EqualizerFactory, EqualizerSettings,
    PlaybackEngine, Result, SessionId,
};
