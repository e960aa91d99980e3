//! Audio effects processing
//!
//! All effects operate on interleaved stereo f32 samples in [-1.0, 1.0] range.

mod band_eq;
mod effect;

pub use band_eq::{
    BandEqualizer, BandLayout, EqualizerPreset, BAND_LEVEL_RANGE_MB, FIVE_BAND_FREQUENCIES,
    ISO_10_BAND_FREQUENCIES,
};
pub use effect::AudioEffect;
