use clap::{Parser, Subcommand, ValueEnum};
use sl_control::{ControlResult, InterruptRequest, PollPolicy, Sluice};
use sl_hardware::{LockHardware, ReadKind, SimConfig, SimulatedLock};
use sl_project::LockConfig;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

mod error;

use error::{CliError, CliResult};

#[derive(Parser)]
#[command(name = "sl-cli")]
#[command(about = "Sluice CLI - drive a canal lock chamber against the simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a lock configuration file
    Validate {
        /// Path to the configuration (YAML, or JSON by extension)
        config_path: PathBuf,
    },
    /// Run chamber operations one after another
    Run {
        /// Path to the configuration (YAML, or JSON by extension)
        config_path: PathBuf,
        /// Operations to run, in order
        #[arg(required = true, value_enum)]
        steps: Vec<Step>,
        /// Raise the emergency pause right after this water-level read
        #[arg(long)]
        pause_at_read: Option<u64>,
    },
    /// Let a vessel in, move the chamber to the other level, let it out
    Cycle {
        /// Path to the configuration (YAML, or JSON by extension)
        config_path: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Step {
    /// Raise or lower the chamber
    Start,
    /// Let a vessel in
    Entry,
    /// Let a vessel out
    Exit,
    /// Emergency pause
    Pause,
    /// Continue after a pause
    Resume,
    /// Pause when running, resume when paused
    Toggle,
}

impl Step {
    fn label(self) -> &'static str {
        match self {
            Step::Start => "start",
            Step::Entry => "entry",
            Step::Exit => "exit",
            Step::Pause => "pause",
            Step::Resume => "resume",
            Step::Toggle => "toggle",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Wall-clock time spent in each kind of step.
#[derive(Debug, Default)]
struct StepTimes {
    entries: Vec<(Step, u32, Duration)>,
}

impl StepTimes {
    fn record(&mut self, step: Step, elapsed: Duration) {
        match self.entries.iter_mut().find(|(kind, _, _)| *kind == step) {
            Some((_, count, total)) => {
                *count += 1;
                *total += elapsed;
            }
            None => self.entries.push((step, 1, elapsed)),
        }
    }

    fn count(&self, step: Step) -> u32 {
        self.entries
            .iter()
            .find(|(kind, _, _)| *kind == step)
            .map_or(0, |(_, count, _)| *count)
    }

    fn print_summary(&self) {
        if self.entries.is_empty() {
            return;
        }
        println!("\nTiming summary:");
        for (step, count, total) in &self.entries {
            println!(
                "  {:<7} {} run(s), {:.3}s total, {:.3}s average",
                step,
                count,
                total.as_secs_f64(),
                total.as_secs_f64() / f64::from(*count)
            );
        }
    }
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Run {
            config_path,
            steps,
            pause_at_read,
        } => cmd_run(&config_path, &steps, pause_at_read),
        Commands::Cycle { config_path } => cmd_cycle(&config_path),
    }
}

fn cmd_validate(config_path: &Path) -> CliResult<()> {
    println!("Validating lock configuration: {}", config_path.display());
    let config = load_config(config_path)?;
    println!("✓ Configuration is valid");
    println!("  Name: {}", config.name);
    println!("  Left gate:  {}", config.left.lock);
    println!("  Right gate: {}", config.right.lock);
    match config.polling.max_polls {
        Some(max) => println!(
            "  Polling: every {} ms, at most {} polls per loop",
            config.polling.interval_ms, max
        ),
        None => println!("  Polling: every {} ms, unbounded", config.polling.interval_ms),
    }
    Ok(())
}

fn cmd_run(config_path: &Path, steps: &[Step], pause_at_read: Option<u64>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let hw = simulator(&config)?;
    let mut sluice = Sluice::new(&hw, config.lock_types(), poll_policy(&config));
    let mut times = StepTimes::default();

    if let Some(nth) = pause_at_read {
        let line = sluice.interrupt_line();
        hw.on_read(ReadKind::WaterLevel, nth, move || {
            line.request(InterruptRequest::Pause)
        });
    }

    println!("Running {} step(s) on {}", steps.len(), config.name);
    for step in steps {
        match run_step(&mut sluice, *step, &mut times) {
            Ok(()) => println!("  {}: ok", step),
            Err(err) => println!("  {}: {}", step, err),
        }
    }

    println!("\nChamber:");
    print!("{}", hw.snapshot());
    times.print_summary();
    Ok(())
}

fn cmd_cycle(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let hw = simulator(&config)?;
    let mut sluice = Sluice::new(&hw, config.lock_types(), poll_policy(&config));

    println!(
        "Cycling {} from {} water",
        config.name,
        hw.snapshot().level
    );
    let mut times = StepTimes::default();
    run_cycle(&mut sluice, &mut times)?;

    println!("\nChamber:");
    print!("{}", hw.snapshot());
    times.print_summary();
    Ok(())
}

fn run_cycle<H: LockHardware + ?Sized>(
    sluice: &mut Sluice<'_, H>,
    times: &mut StepTimes,
) -> CliResult<()> {
    for step in [Step::Entry, Step::Start, Step::Exit] {
        run_step(sluice, step, times).map_err(|source| CliError::Step {
            step: step.label(),
            source,
        })?;
        println!("✓ {}", step);
    }
    Ok(())
}

fn run_step<H: LockHardware + ?Sized>(
    sluice: &mut Sluice<'_, H>,
    step: Step,
    times: &mut StepTimes,
) -> ControlResult {
    let span = tracing::info_span!("step", step = step.label());
    let _entered = span.enter();
    let started = Instant::now();
    let result = match step {
        Step::Start => sluice.start(),
        Step::Entry => sluice.allow_entry(),
        Step::Exit => sluice.allow_exit(),
        Step::Pause => sluice.pass_interrupt(InterruptRequest::Pause),
        Step::Resume => sluice.pass_interrupt(InterruptRequest::Resume),
        Step::Toggle => sluice.toggle_interrupt(),
    };
    let elapsed = started.elapsed();
    times.record(step, elapsed);
    tracing::info!(elapsed_s = elapsed.as_secs_f64(), ok = result.is_ok(), "step finished");
    result
}

fn load_config(config_path: &Path) -> CliResult<LockConfig> {
    let config = match config_path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => sl_project::load_json(config_path)?,
        _ => sl_project::load_yaml(config_path)?,
    };
    Ok(config)
}

fn poll_policy(config: &LockConfig) -> PollPolicy {
    PollPolicy::new(config.polling.interval(), config.polling.max_polls)
}

fn simulator(config: &LockConfig) -> CliResult<SimulatedLock> {
    let sim = &config.simulator;
    let hw = SimulatedLock::new(SimConfig {
        door_travel_polls: sim.door_travel_polls,
        water_polls_per_level: sim.water_polls_per_level,
        initial_level: sim.initial_level,
        ..SimConfig::default()
    })?;
    Ok(hw)
}
