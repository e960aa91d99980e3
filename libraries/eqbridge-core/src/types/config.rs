use super::settings::EqualizerSettings;
use serde::{Deserialize, Serialize};

/// Host-provided equalizer configuration
///
/// Persists across session changes until the host replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EqualizerConfig {
    /// Whether the in-process equalizer is requested
    pub enabled: bool,

    /// Settings to apply when an in-process equalizer is bound
    pub settings: Option<EqualizerSettings>,
}

impl EqualizerConfig {
    pub fn new(enabled: bool, settings: Option<EqualizerSettings>) -> Self {
        Self { enabled, settings }
    }
}

/// Which equalizer implementation is attached to the active session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingMode {
    /// Platform-level equalizer, reached through open/close session notifications
    System,

    /// In-process equalizer owned by the coordinator
    Custom,
}
