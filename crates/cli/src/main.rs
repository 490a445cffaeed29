//! # furuta
//!
//! Runs one closed-loop simulation of a rotary inverted pendulum and logs a
//! summary of the outcome.
//!
//! The run starts from a bundled preset or a TOML configuration file; the
//! time, solver and recording flags override whatever those provide.

use std::{path::PathBuf, process};

use clap::{Parser, ValueEnum};
use furuta_ode::{DEFAULT_TOLERANCE, Method};
use furuta_pendulum::{EnergyMonitor, Preset};
use furuta_sim::{LoadError, RecordingPolicy, Setup, Simulation, SimulationConfig};
use tracing::{Level, debug, error, info};
use tracing_subscriber::EnvFilter;

/// Rotary inverted pendulum swing-up and stabilization simulator
#[derive(Parser, Debug)]
#[command(name = "furuta")]
#[command(version)]
#[command(about = "Simulates a rotary inverted pendulum under a hybrid swing-up controller")]
struct Args {
    /// Parameter preset (overrides the preset named in --config).
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,

    /// Path to a TOML run configuration.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Integration method.
    #[arg(long, value_enum)]
    method: Option<MethodArg>,

    /// Simulated horizon in seconds.
    #[arg(long, value_name = "SECONDS")]
    t_max: Option<f64>,

    /// Output sample spacing in seconds.
    #[arg(long, value_name = "SECONDS")]
    dt: Option<f64>,

    /// When control outputs are recorded.
    #[arg(long, value_enum)]
    record: Option<RecordArg>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PresetArg {
    Reference,
    PolePlaced,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Reference => Preset::Reference,
            PresetArg::PolePlaced => Preset::PolePlaced,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MethodArg {
    Dopri5,
    Dop853,
    Rk4,
}

impl MethodArg {
    /// Returns the method, keeping tolerances from `current` when it has any.
    fn with_tolerances_of(self, current: Method) -> Method {
        let (abs_tol, rel_tol) = current
            .tolerances()
            .unwrap_or((DEFAULT_TOLERANCE, DEFAULT_TOLERANCE));

        match self {
            MethodArg::Dopri5 => Method::Dopri5 { abs_tol, rel_tol },
            MethodArg::Dop853 => Method::Dop853 { abs_tol, rel_tol },
            MethodArg::Rk4 => Method::Rk4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RecordArg {
    EveryEvaluation,
    OutputSamples,
}

impl From<RecordArg> for RecordingPolicy {
    fn from(arg: RecordArg) -> Self {
        match arg {
            RecordArg::EveryEvaluation => RecordingPolicy::EveryEvaluation,
            RecordArg::OutputSamples => RecordingPolicy::OutputSamples,
        }
    }
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let setup = build_setup(args)?;
    let simulation = Simulation::new(setup)?;

    info!(
        samples = simulation.grid().len(),
        method = setup.method.name(),
        recording = setup.recording.name(),
        "starting run"
    );

    let run = simulation.run()?;

    match run.switch_time {
        Some(t) => info!("Swing-up completed at t = {t:.3} s"),
        None => info!("Swing-up did not complete"),
    }

    if let Some(last) = run.final_state() {
        let energy = EnergyMonitor::new(setup.plant).energy(last);
        info!(
            theta = last.theta,
            dtheta = last.dtheta,
            alpha = last.alpha,
            dalpha = last.dalpha,
            energy,
            mode = ?run.final_mode,
            "final state"
        );
    }

    info!(
        "Run complete: {} samples, {} control records, {} evaluations ({} accepted / {} rejected steps)",
        run.len(),
        run.controls.len(),
        run.stats.evaluations,
        run.stats.accepted_steps,
        run.stats.rejected_steps,
    );

    Ok(())
}

/// Resolves the run setup from the config file, the preset and the flags.
fn build_setup(args: &Args) -> Result<Setup, LoadError> {
    let mut config = match &args.config {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            SimulationConfig::load(path)?
        }
        None => SimulationConfig::default(),
    };

    if let Some(preset) = args.preset {
        config.preset = preset.into();
    }

    let mut setup = config.resolve();

    if let Some(t_max) = args.t_max {
        setup.time.t_max = t_max;
    }
    if let Some(dt) = args.dt {
        setup.time.dt = dt;
    }
    if let Some(method) = args.method {
        setup.method = method.with_tolerances_of(setup.method);
    }
    if let Some(record) = args.record {
        setup.recording = record.into();
    }

    Ok(setup)
}

fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
