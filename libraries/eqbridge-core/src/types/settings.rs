//! Equalizer settings payload
//!
//! The coordinator treats settings as opaque and only hands them to the
//! equalizer. The text form matches the settings string used by platform
//! equalizers so hosts can persist and exchange it unchanged:
//!
//! ```text
//! Equalizer;curPreset=3;numBands=5;band1Level=300;band2Level=0;...;band5Level=-150
//! ```
//!
//! A custom (non-preset) curve stores `curPreset=-1`.

use crate::error::{EqError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SETTINGS_TAG: &str = "Equalizer";

/// Snapshot of an equalizer's user-facing state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EqualizerSettings {
    /// Index of the active preset, `None` for a custom curve
    pub current_preset: Option<u16>,

    /// Per-band levels in millibels, lowest band first
    pub band_levels: Vec<i16>,
}

impl EqualizerSettings {
    /// Settings for a custom curve
    pub fn custom(band_levels: Vec<i16>) -> Self {
        Self {
            current_preset: None,
            band_levels,
        }
    }

    /// Settings that select a preset
    ///
    /// `band_levels` should hold the preset's curve so the settings stay
    /// meaningful to equalizers that do not know the preset table.
    pub fn preset(index: u16, band_levels: Vec<i16>) -> Self {
        Self {
            current_preset: Some(index),
            band_levels,
        }
    }

    /// Number of bands
    pub fn band_count(&self) -> usize {
        self.band_levels.len()
    }
}

impl fmt::Display for EqualizerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preset = self.current_preset.map_or(-1, i32::from);
        write!(
            f,
            "{};curPreset={};numBands={}",
            SETTINGS_TAG,
            preset,
            self.band_levels.len()
        )?;
        for (i, level) in self.band_levels.iter().enumerate() {
            write!(f, ";band{}Level={}", i + 1, level)?;
        }
        Ok(())
    }
}

impl FromStr for EqualizerSettings {
    type Err = EqError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split(';');

        if parts.next() != Some(SETTINGS_TAG) {
            return Err(EqError::invalid_settings(format!(
                "expected leading '{}' tag",
                SETTINGS_TAG
            )));
        }

        let preset: i32 = parse_field(parts.next(), "curPreset")?;
        let current_preset = match preset {
            -1 => None,
            p => Some(u16::try_from(p).map_err(|_| {
                EqError::invalid_settings(format!("preset index out of range: {}", p))
            })?),
        };

        let num_bands: u16 = parse_field(parts.next(), "numBands")?;

        let mut band_levels = Vec::with_capacity(num_bands as usize);
        for band in 1..=num_bands {
            let key = format!("band{}Level", band);
            band_levels.push(parse_field(parts.next(), &key)?);
        }

        if let Some(extra) = parts.find(|p| !p.is_empty()) {
            return Err(EqError::invalid_settings(format!(
                "unexpected trailing field '{}' (numBands={})",
                extra, num_bands
            )));
        }

        Ok(Self {
            current_preset,
            band_levels,
        })
    }
}

fn parse_field<T: FromStr>(part: Option<&str>, key: &str) -> Result<T> {
    let part = part.ok_or_else(|| EqError::invalid_settings(format!("missing '{}'", key)))?;
    let (name, value) = part
        .split_once('=')
        .ok_or_else(|| EqError::invalid_settings(format!("malformed field '{}'", part)))?;

    if name != key {
        return Err(EqError::invalid_settings(format!(
            "expected '{}', found '{}'",
            key, name
        )));
    }

    value
        .parse()
        .map_err(|_| EqError::invalid_settings(format!("bad value for '{}': '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_platform_settings_string() {
        let settings = EqualizerSettings::preset(3, vec![300, 0, -150]);
        assert_eq!(
            settings.to_string(),
            "Equalizer;curPreset=3;numBands=3;band1Level=300;band2Level=0;band3Level=-150"
        );

        let custom = EqualizerSettings::custom(vec![100, 200]);
        assert_eq!(
            custom.to_string(),
            "Equalizer;curPreset=-1;numBands=2;band1Level=100;band2Level=200"
        );
    }

    #[test]
    fn parses_platform_settings_string() {
        let parsed: EqualizerSettings =
            "Equalizer;curPreset=-1;numBands=5;band1Level=300;band2Level=0;band3Level=0;band4Level=0;band5Level=-1500"
                .parse()
                .unwrap();

        assert_eq!(parsed.current_preset, None);
        assert_eq!(parsed.band_levels, vec![300, 0, 0, 0, -1500]);
    }

    #[test]
    fn zero_band_settings_are_valid() {
        let parsed: EqualizerSettings = "Equalizer;curPreset=0;numBands=0".parse().unwrap();
        assert_eq!(parsed.current_preset, Some(0));
        assert!(parsed.band_levels.is_empty());
    }

    #[test]
    fn rejects_malformed_strings() {
        let cases = [
            "",
            "Eq;curPreset=0;numBands=0",
            "Equalizer;numBands=0;curPreset=0",
            "Equalizer;curPreset=x;numBands=0",
            "Equalizer;curPreset=-2;numBands=0",
            "Equalizer;curPreset=0;numBands=2;band1Level=0",
            "Equalizer;curPreset=0;numBands=1;band1Level=0;band2Level=0",
            "Equalizer;curPreset=0;numBands=1;band2Level=0",
            "Equalizer;curPreset=0;numBands=1;band1Level=40000",
        ];

        for case in cases {
            let result = case.parse::<EqualizerSettings>();
            assert!(
                matches!(result, Err(EqError::InvalidSettings(_))),
                "expected rejection for {:?}",
                case
            );
        }
    }
}
