//! Scenario runner
//!
//! Wires a [`SimulatedEngine`], the software equalizer and a coordinator
//! together, replays a scenario step by step and collects notifications.

use crate::{
    engine::SimulatedEngine,
    error::{Result, SimError},
    scenario::{parse_settings, Scenario, Step},
};
use crossbeam_channel::unbounded;
use eqbridge_core::{EqualizerSettings, SessionId};
use eqbridge_dsp::SoftwareEqualizerFactory;
use eqbridge_session::{ChannelSink, CoordinatorConfig, EqualizerCoordinator, EqualizerNotification};

/// Live equalizer slots available to one simulated player
const MAX_EQUALIZERS: usize = 4;

/// Everything a scenario run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioReport {
    /// Notifications in emission order
    pub notifications: Vec<EqualizerNotification>,

    /// Equalizer state read back by each `get_equalizer` step
    ///
    /// `None` when no session was active at that point.
    pub equalizer_reads: Vec<Option<EqualizerSettings>>,
}

/// Replay `scenario` against a fresh coordinator
pub fn run_scenario(scenario: &Scenario, config: CoordinatorConfig) -> Result<ScenarioReport> {
    scenario.validate()?;
    let layout = scenario.layout()?;

    let engine = SimulatedEngine::new();
    let factory = SoftwareEqualizerFactory::new(layout, MAX_EQUALIZERS);
    let (tx, rx) = unbounded();

    let mut coordinator =
        EqualizerCoordinator::new(engine.clone(), factory, ChannelSink::new(tx), config)?;

    tracing::info!(
        "Running scenario {} ({} steps, {} bands)",
        scenario.name.as_deref().unwrap_or("<unnamed>"),
        scenario.steps.len(),
        layout.count()
    );

    let mut report = ScenarioReport::default();

    for (index, step) in scenario.steps.iter().enumerate() {
        let number = index + 1;
        tracing::debug!("Step {}: {:?}", number, step);

        run_step(&mut coordinator, &engine, step, &mut report)
            .and_then(|()| coordinator.process_pending_events().map(|_| ()))
            .map_err(|source| SimError::Step {
                step: number,
                source,
            })?;

        report.notifications.extend(rx.try_iter());
    }

    Ok(report)
}

fn run_step(
    coordinator: &mut EqualizerCoordinator,
    engine: &SimulatedEngine,
    step: &Step,
    report: &mut ScenarioReport,
) -> eqbridge_core::Result<()> {
    match step {
        Step::SessionCreated { session } => {
            if !engine.start_session(SessionId::new(*session)) {
                tracing::warn!("Session {} was not reported", session);
            }
        }
        Step::AudioDisabled => {
            if !engine.stop() {
                tracing::warn!("Audio disable was not reported");
            }
        }
        Step::SetEqualizer { enabled, settings } => {
            let settings = settings.as_deref().map(parse_settings).transpose()?;
            coordinator.config_handle().set_equalizer_settings(*enabled, settings)?;
        }
        Step::GetEqualizer => {
            let read = coordinator.equalizer()?.map(|eq| eq.properties());
            match &read {
                Some(settings) => tracing::info!("Equalizer: {}", settings),
                None => tracing::info!("No active session, no equalizer"),
            }
            report.equalizer_reads.push(read);
        }
        Step::DestroyEqualizer => coordinator.destroy_equalizer(),
        Step::Release => coordinator.release(),
    }

    Ok(())
}
