//! eqbridge simulator
//!
//! Replays scripted engine and host actions against an equalizer coordinator
//! backed by the software equalizer. Used for manual exploration from the CLI
//! and for end-to-end tests of the full stack.

pub mod engine;
pub mod error;
pub mod runner;
pub mod scenario;

pub use engine::SimulatedEngine;
pub use error::{Result, SimError};
pub use runner::{run_scenario, ScenarioReport};
pub use scenario::{Scenario, Step};
