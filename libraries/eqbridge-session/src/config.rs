/// Coordinator configuration
use eqbridge_core::{EqError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How new sessions choose between the system and in-process equalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemEqualizerPolicy {
    /// System equalizer only until the host first supplies a configuration
    #[default]
    PowerOnDefault,

    /// System equalizer whenever the in-process one is disabled or has no settings
    WhenDisabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CoordinatorConfig {
    /// Application identity carried in system equalizer notifications
    #[serde(default = "default_package_id")]
    pub package_id: String,

    #[serde(default)]
    pub system_equalizer: SystemEqualizerPolicy,

    /// Priority passed to the effect factory
    #[serde(default)]
    pub effect_priority: i32,

    /// Host configuration changes that may be queued between drains
    #[serde(default = "default_event_queue_capacity")]
    pub event_queue_capacity: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            package_id: default_package_id(),
            system_equalizer: SystemEqualizerPolicy::default(),
            effect_priority: 0,
            event_queue_capacity: default_event_queue_capacity(),
        }
    }
}

impl CoordinatorConfig {
    /// Configuration for a given application identity
    pub fn for_package(package_id: impl Into<String>) -> Self {
        Self {
            package_id: package_id.into(),
            ..Self::default()
        }
    }

    /// Load configuration from an optional TOML file and the environment
    ///
    /// Environment variables prefixed with `EQBRIDGE_` override file values,
    /// e.g. `EQBRIDGE_PACKAGE_ID` or `EQBRIDGE_SYSTEM_EQUALIZER=when_disabled`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(EqError::config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("EQBRIDGE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings
            .build()
            .map_err(|e| EqError::config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EqError::config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.package_id.trim().is_empty() {
            return Err(EqError::config("package_id must not be empty"));
        }

        if self.event_queue_capacity == 0 {
            return Err(EqError::config("event_queue_capacity must be at least 1"));
        }

        Ok(())
    }
}

fn default_package_id() -> String {
    "eqbridge".to_string()
}

fn default_event_queue_capacity() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.package_id, "eqbridge");
        assert_eq!(config.system_equalizer, SystemEqualizerPolicy::PowerOnDefault);
        assert_eq!(config.event_queue_capacity, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn loads_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
package_id = "com.example.player"
system_equalizer = "when_disabled"
effect_priority = 3
"#
        )
        .unwrap();

        let config = CoordinatorConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.package_id, "com.example.player");
        assert_eq!(config.system_equalizer, SystemEqualizerPolicy::WhenDisabled);
        assert_eq!(config.effect_priority, 3);
        assert_eq!(config.event_queue_capacity, 64);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = CoordinatorConfig::load(Some(Path::new("/nonexistent/eqbridge.toml")));
        assert!(matches!(result, Err(EqError::Config(_))));
    }

    #[test]
    fn rejects_invalid_values() {
        let mut config = CoordinatorConfig::for_package("  ");
        assert!(config.validate().is_err());

        config.package_id = "app".to_string();
        config.event_queue_capacity = 0;
        assert!(config.validate().is_err());
    }
}
