/// Simulator error types
use eqbridge_core::EqError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Scenario parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Step {step} failed: {source}")]
    Step {
        step: usize,
        #[source]
        source: EqError,
    },

    #[error("Coordinator error: {0}")]
    Coordinator(#[from] EqError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
