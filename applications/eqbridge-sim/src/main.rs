/// eqbridge-sim - Equalizer session coordinator simulator
use clap::{Parser, Subcommand};
use eqbridge_dsp::{BandLayout, EqualizerPreset};
use eqbridge_session::CoordinatorConfig;
use eqbridge_sim::{run_scenario, Scenario};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "eqbridge-sim")]
#[command(about = "Replay equalizer session scenarios", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file and print notifications as JSON lines
    Run {
        /// Scenario file path
        scenario: PathBuf,
        /// Coordinator configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List built-in equalizer presets
    Presets {
        /// Band layout (5 or 10)
        #[arg(short, long, default_value_t = 5)]
        bands: usize,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eqbridge_sim=info,eqbridge_session=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { scenario, config } => run(&scenario, config.as_deref())?,
        Commands::Presets { bands } => presets(bands)?,
    }

    Ok(())
}

fn run(scenario: &std::path::Path, config: Option<&std::path::Path>) -> anyhow::Result<()> {
    let config = CoordinatorConfig::load(config)?;
    let scenario = Scenario::load(scenario)?;

    let report = run_scenario(&scenario, config)?;

    for notification in &report.notifications {
        println!("{}", serde_json::to_string(notification)?);
    }

    tracing::info!(
        "Scenario finished: {} notifications, {} equalizer reads",
        report.notifications.len(),
        report.equalizer_reads.len()
    );
    Ok(())
}

fn presets(bands: usize) -> anyhow::Result<()> {
    let layout = match bands {
        5 => BandLayout::Five,
        10 => BandLayout::Ten,
        n => anyhow::bail!("bands must be 5 or 10, got {}", n),
    };

    for preset in EqualizerPreset::ALL {
        println!(
            "{:>2}  {:<12} {:?}",
            preset.index(),
            preset.name(),
            preset.levels_for(layout)
        );
    }
    Ok(())
}
