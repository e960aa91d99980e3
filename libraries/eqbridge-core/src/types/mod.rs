//! Core domain types

mod config;
mod event;
mod session;
mod settings;

pub use config::{BindingMode, EqualizerConfig};
pub use event::{CoordinatorEvent, SessionEvent, SessionEventSender};
pub use session::SessionId;
pub use settings::EqualizerSettings;
