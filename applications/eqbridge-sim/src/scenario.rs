//! Scenario files
//!
//! A scenario is a TOML list of steps replayed against one coordinator:
//!
//! ```toml
//! name = "enable while playing"
//! bands = 5
//!
//! [[step]]
//! action = "session_created"
//! session = 5
//!
//! [[step]]
//! action = "set_equalizer"
//! enabled = true
//! settings = "Equalizer;curPreset=-1;numBands=5;band1Level=300;band2Level=0;band3Level=0;band4Level=0;band5Level=300"
//! ```

use crate::error::{Result, SimError};
use eqbridge_core::EqualizerSettings;
use eqbridge_dsp::BandLayout;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One simulated engine or host action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Engine starts rendering on a new audio session
    SessionCreated { session: i32 },

    /// Engine stops rendering
    AudioDisabled,

    /// Host changes the equalizer configuration
    SetEqualizer {
        enabled: bool,
        /// Settings in their persisted text form
        #[serde(default)]
        settings: Option<String>,
    },

    /// Host asks for the in-process equalizer
    GetEqualizer,

    /// Host releases the in-process equalizer
    DestroyEqualizer,

    /// Host tears the player down
    Release,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,

    /// Band count of the in-process equalizer (5 or 10)
    #[serde(default = "default_bands")]
    pub bands: usize,

    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

fn default_bands() -> usize {
    5
}

impl Scenario {
    /// Parse a scenario from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let scenario: Self = toml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Equalizer layout requested by the scenario
    pub fn layout(&self) -> Result<BandLayout> {
        match self.bands {
            5 => Ok(BandLayout::Five),
            10 => Ok(BandLayout::Ten),
            n => Err(SimError::InvalidScenario(format!(
                "bands must be 5 or 10, got {}",
                n
            ))),
        }
    }

    /// Check the scenario without running it
    ///
    /// Settings strings are parsed here so a typo fails before any step runs.
    pub fn validate(&self) -> Result<()> {
        self.layout()?;

        for (index, step) in self.steps.iter().enumerate() {
            if let Step::SetEqualizer {
                settings: Some(text),
                ..
            } = step
            {
                parse_settings(text).map_err(|source| SimError::Step {
                    step: index + 1,
                    source,
                })?;
            }
        }

        Ok(())
    }
}

pub(crate) fn parse_settings(text: &str) -> eqbridge_core::Result<EqualizerSettings> {
    text.parse()
}
