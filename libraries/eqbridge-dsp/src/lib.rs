//! eqbridge - In-process equalizer
//!
//! Software implementation of the "custom" equalizer binding:
//! - [`BandEqualizer`]: peaking-biquad band EQ with platform-style presets
//! - [`EffectRegistry`]: live equalizers keyed by audio session, shared with the audio path
//! - [`SoftwareEqualizerFactory`]: hands out [`SoftwareEqualizer`] handles to the coordinator
//!
//! # Example
//!
//! ```rust
//! use eqbridge_core::{EqualizerEffect, EqualizerFactory, SessionId};
//! use eqbridge_dsp::{BandLayout, SoftwareEqualizerFactory};
//!
//! let mut factory = SoftwareEqualizerFactory::new(BandLayout::Five, 4);
//! let registry = factory.registry();
//!
//! let mut eq = factory.create(0, SessionId::new(7)).unwrap();
//! eq.set_enabled(true).unwrap();
//!
//! // Audio thread: run the session's equalizer over interleaved stereo samples
//! let mut buffer = vec![0.25f32; 512];
//! registry.process(SessionId::new(7), &mut buffer, 44100);
//!
//! eq.release();
//! assert_eq!(registry.active_count(), 0);
//! ```

pub mod effects;
mod registry;
mod software;

pub use effects::{
    AudioEffect, BandEqualizer, BandLayout, EqualizerPreset, BAND_LEVEL_RANGE_MB,
    FIVE_BAND_FREQUENCIES, ISO_10_BAND_FREQUENCIES,
};
pub use registry::{EffectRegistry, SharedRegistry};
pub use software::{SoftwareEqualizer, SoftwareEqualizerFactory};
