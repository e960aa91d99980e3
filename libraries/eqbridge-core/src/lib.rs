//! eqbridge - Core
//!
//! Shared vocabulary for the equalizer session bridge:
//! - Audio session ids (with the "no session" sentinel)
//! - Equalizer settings and configuration
//! - Binding modes (system-wide vs in-process equalizer)
//! - Collaborator traits implemented by playback engines and effect backends
//!
//! This crate has no knowledge of any particular playback engine or audio
//! platform. Engines report session lifecycle through [`SessionEventSender`],
//! effect backends hand out [`EqualizerEffect`] handles through an
//! [`EqualizerFactory`].

pub mod error;
pub mod traits;
pub mod types;

pub use error::{EqError, Result};
pub use traits::{EqualizerEffect, EqualizerFactory, PlaybackEngine};
pub use types::*;
