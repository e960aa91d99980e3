//! Band Equalizer
//!
//! Fixed-frequency peaking-band equalizer mirroring the control surface of
//! platform equalizers:
//! - 5-band (platform default centres) or 10-band (ISO octaves)
//! - Per-band level in millibels, clamped to [`BAND_LEVEL_RANGE_MB`]
//! - Indexed presets
//! - Settings snapshot/restore via [`EqualizerSettings`]

use super::effect::AudioEffect;
use eqbridge_core::{EqError, EqualizerSettings, Result};
use std::f32::consts::PI;

/// Centre frequencies of the 5-band layout (Hz)
pub const FIVE_BAND_FREQUENCIES: [f32; 5] = [60.0, 230.0, 910.0, 3600.0, 14000.0];

/// 10-band ISO standard frequencies (Hz)
pub const ISO_10_BAND_FREQUENCIES: [f32; 10] = [
    31.5, 63.0, 125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0, 8000.0, 16000.0,
];

/// Supported band level range in millibels (inclusive)
pub const BAND_LEVEL_RANGE_MB: (i16, i16) = (-1500, 1500);

/// Built-in presets, in index order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualizerPreset {
    Normal,
    Classical,
    Dance,
    Flat,
    Folk,
    HeavyMetal,
    HipHop,
    Jazz,
    Pop,
    Rock,
}

impl EqualizerPreset {
    /// All presets in index order
    pub const ALL: [EqualizerPreset; 10] = [
        Self::Normal,
        Self::Classical,
        Self::Dance,
        Self::Flat,
        Self::Folk,
        Self::HeavyMetal,
        Self::HipHop,
        Self::Jazz,
        Self::Pop,
        Self::Rock,
    ];

    /// Look up a preset by index
    pub fn from_index(index: u16) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Preset index
    pub fn index(self) -> u16 {
        Self::ALL.iter().position(|p| *p == self).unwrap_or_default() as u16
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Classical => "Classical",
            Self::Dance => "Dance",
            Self::Flat => "Flat",
            Self::Folk => "Folk",
            Self::HeavyMetal => "Heavy Metal",
            Self::HipHop => "Hip Hop",
            Self::Jazz => "Jazz",
            Self::Pop => "Pop",
            Self::Rock => "Rock",
        }
    }

    /// Curve for the 5-band layout (millibels)
    pub fn levels_5(self) -> [i16; 5] {
        match self {
            Self::Normal => [300, 0, 0, 0, 300],
            Self::Classical => [500, 300, -200, 400, 400],
            Self::Dance => [600, 0, 200, 400, 100],
            Self::Flat => [0; 5],
            Self::Folk => [300, 0, 0, 200, -100],
            Self::HeavyMetal => [400, 100, 900, 300, 0],
            Self::HipHop => [500, 300, 0, 100, 300],
            Self::Jazz => [400, 200, -200, 200, 500],
            Self::Pop => [-100, 200, 500, 100, -200],
            Self::Rock => [500, 300, -100, 300, 500],
        }
    }

    /// Curve for an arbitrary layout
    ///
    /// Bands take the level of the nearest 5-band centre on a log scale.
    pub fn levels_for(self, layout: BandLayout) -> Vec<i16> {
        let base = self.levels_5();
        layout
            .frequencies()
            .iter()
            .map(|&freq| {
                let mut nearest = 0;
                let mut nearest_dist = f32::MAX;
                for (i, &centre) in FIVE_BAND_FREQUENCIES.iter().enumerate() {
                    let dist = (freq.log2() - centre.log2()).abs();
                    if dist < nearest_dist {
                        nearest_dist = dist;
                        nearest = i;
                    }
                }
                base[nearest]
            })
            .collect()
    }
}

/// Band layout of a [`BandEqualizer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandLayout {
    /// 5 bands at the platform default centres
    #[default]
    Five,
    /// 10-band octave EQ
    Ten,
}

impl BandLayout {
    /// Get the number of bands
    pub fn count(self) -> usize {
        self.frequencies().len()
    }

    /// Get the frequencies for this layout
    pub fn frequencies(self) -> &'static [f32] {
        match self {
            Self::Five => &FIVE_BAND_FREQUENCIES,
            Self::Ten => &ISO_10_BAND_FREQUENCIES,
        }
    }

    /// Get the Q factor for this layout
    pub fn q_factor(self) -> f32 {
        match self {
            Self::Five => 0.9,
            Self::Ten => 1.41,
        }
    }
}

/// Peaking biquad for one band
#[derive(Debug, Clone)]
struct BiquadBand {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    // State (stereo)
    x1_l: f32,
    x2_l: f32,
    y1_l: f32,
    y2_l: f32,
    x1_r: f32,
    x2_r: f32,
    y1_r: f32,
    y2_r: f32,

    frequency: f32,
    level_mb: i16,
    q: f32,
}

impl BiquadBand {
    fn new(frequency: f32, q: f32) -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1_l: 0.0,
            x2_l: 0.0,
            y1_l: 0.0,
            y2_l: 0.0,
            x1_r: 0.0,
            x2_r: 0.0,
            y1_r: 0.0,
            y2_r: 0.0,
            frequency,
            level_mb: 0,
            q,
        }
    }

    fn set_level(&mut self, level_mb: i16) {
        self.level_mb = level_mb.clamp(BAND_LEVEL_RANGE_MB.0, BAND_LEVEL_RANGE_MB.1);
    }

    fn update_coefficients(&mut self, sample_rate: f32) {
        if sample_rate < 1.0 {
            return;
        }

        if self.level_mb == 0 {
            self.b0 = 1.0;
            self.b1 = 0.0;
            self.b2 = 0.0;
            self.a1 = 0.0;
            self.a2 = 0.0;
            return;
        }

        let gain_db = f32::from(self.level_mb) / 100.0;
        let a = 10.0_f32.powf(gain_db / 40.0);
        // Keep the centre away from Nyquist
        let clamped_freq = self.frequency.min(sample_rate * 0.45);
        let omega = 2.0 * PI * clamped_freq / sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / (2.0 * self.q);

        let b0 = 1.0 + alpha * a;
        let b1 = -2.0 * cos_omega;
        let b2 = 1.0 - alpha * a;
        let a0 = 1.0 + alpha / a;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha / a;

        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = a1 / a0;
        self.a2 = a2 / a0;
    }

    #[inline]
    fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        let mut out_l = self.b0 * left + self.b1 * self.x1_l + self.b2 * self.x2_l
            - self.a1 * self.y1_l
            - self.a2 * self.y2_l;
        // Flush denormals
        if out_l.abs() < 1e-15 {
            out_l = 0.0;
        }
        self.x2_l = self.x1_l;
        self.x1_l = left;
        self.y2_l = self.y1_l;
        self.y1_l = out_l;

        let mut out_r = self.b0 * right + self.b1 * self.x1_r + self.b2 * self.x2_r
            - self.a1 * self.y1_r
            - self.a2 * self.y2_r;
        if out_r.abs() < 1e-15 {
            out_r = 0.0;
        }
        self.x2_r = self.x1_r;
        self.x1_r = right;
        self.y2_r = self.y1_r;
        self.y1_r = out_r;

        (out_l, out_r)
    }

    fn reset(&mut self) {
        self.x1_l = 0.0;
        self.x2_l = 0.0;
        self.y1_l = 0.0;
        self.y2_l = 0.0;
        self.x1_r = 0.0;
        self.x2_r = 0.0;
        self.y1_r = 0.0;
        self.y2_r = 0.0;
    }
}

/// Peaking-band equalizer
pub struct BandEqualizer {
    bands: Vec<BiquadBand>,
    layout: BandLayout,
    current_preset: Option<EqualizerPreset>,
    enabled: bool,
    sample_rate: u32,
    needs_update: bool,
}

impl BandEqualizer {
    /// Create a flat equalizer with the given layout
    ///
    /// New equalizers start disabled.
    pub fn new(layout: BandLayout) -> Self {
        let q = layout.q_factor();
        let bands = layout
            .frequencies()
            .iter()
            .map(|&freq| BiquadBand::new(freq, q))
            .collect();

        Self {
            bands,
            layout,
            current_preset: None,
            enabled: false,
            sample_rate: 44100,
            needs_update: true,
        }
    }

    /// Band layout
    pub fn layout(&self) -> BandLayout {
        self.layout
    }

    /// Number of bands
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Centre frequency of a band
    pub fn band_frequency(&self, band: usize) -> Option<f32> {
        self.bands.get(band).map(|b| b.frequency)
    }

    /// Level of a band in millibels
    pub fn band_level(&self, band: usize) -> Option<i16> {
        self.bands.get(band).map(|b| b.level_mb)
    }

    /// Set the level of one band; switches to a custom curve
    pub fn set_band_level(&mut self, band: usize, level_mb: i16) -> Result<()> {
        let count = self.bands.len();
        let target = self
            .bands
            .get_mut(band)
            .ok_or_else(|| EqError::effect_operation(format!("band {} out of range (0..{})", band, count)))?;
        target.set_level(level_mb);
        target.reset();
        self.current_preset = None;
        self.needs_update = true;
        Ok(())
    }

    /// Active preset, if the curve came from one
    pub fn current_preset(&self) -> Option<EqualizerPreset> {
        self.current_preset
    }

    /// Load a preset curve
    pub fn use_preset(&mut self, preset: EqualizerPreset) {
        let levels = preset.levels_for(self.layout);
        self.set_levels(&levels);
        self.current_preset = Some(preset);
    }

    /// Restore a settings snapshot
    ///
    /// # Errors
    /// Fails without touching the curve if the band count differs from this
    /// equalizer's layout or the preset index is unknown.
    pub fn apply_settings(&mut self, settings: &EqualizerSettings) -> Result<()> {
        if settings.band_count() != self.bands.len() {
            return Err(EqError::invalid_settings(format!(
                "settings carry {} bands, equalizer has {}",
                settings.band_count(),
                self.bands.len()
            )));
        }

        let preset = match settings.current_preset {
            Some(index) => Some(EqualizerPreset::from_index(index).ok_or_else(|| {
                EqError::invalid_settings(format!("unknown preset index {}", index))
            })?),
            None => None,
        };

        self.set_levels(&settings.band_levels);
        self.current_preset = preset;
        Ok(())
    }

    /// Snapshot the current curve
    pub fn settings(&self) -> EqualizerSettings {
        EqualizerSettings {
            current_preset: self.current_preset.map(EqualizerPreset::index),
            band_levels: self.bands.iter().map(|b| b.level_mb).collect(),
        }
    }

    fn set_levels(&mut self, levels: &[i16]) {
        for (band, &level) in self.bands.iter_mut().zip(levels) {
            band.set_level(level);
            band.reset();
        }
        self.needs_update = true;
    }

    fn update_coefficients(&mut self) {
        if self.needs_update {
            let sr = self.sample_rate as f32;
            for band in &mut self.bands {
                band.update_coefficients(sr);
            }
            self.needs_update = false;
        }
    }
}

impl Default for BandEqualizer {
    fn default() -> Self {
        Self::new(BandLayout::default())
    }
}

impl AudioEffect for BandEqualizer {
    fn process(&mut self, buffer: &mut [f32], sample_rate: u32) {
        if !self.enabled {
            return;
        }

        if self.sample_rate != sample_rate {
            self.sample_rate = sample_rate;
            for band in &mut self.bands {
                band.reset();
            }
            self.needs_update = true;
        }

        self.update_coefficients();

        for chunk in buffer.chunks_exact_mut(2) {
            let mut left = chunk[0];
            let mut right = chunk[1];

            for band in &mut self.bands {
                (left, right) = band.process(left, right);
            }

            chunk[0] = left;
            chunk[1] = right;
        }
    }

    fn reset(&mut self) {
        for band in &mut self.bands {
            band.reset();
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        match self.layout {
            BandLayout::Five => "5-Band Equalizer",
            BandLayout::Ten => "10-Band Equalizer",
        }
    }
}
