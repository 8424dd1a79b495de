//! Perturb noise injection CLI.
//!
//! Loads a TOML configuration, builds one noise injector from a tag in it,
//! and reports on a batch of draws:
//! - `sample`: print count, mean, stddev, min and max of the noise samples
//! - `bernoulli`: print the success rate of Bernoulli events driven by the noise
//!
//! Set `RUST_LOG=debug` to see stream creation and injector initialization.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use perturb_core::prelude::*;
use perturb_noise::prelude::*;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Sample noise injectors configured from TOML.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(clap::Args)]
struct Source {
    /// TOML file holding the noise tag.
    #[arg(short, long)]
    config: PathBuf,

    /// Name of the table holding the noise model.
    #[arg(short, long, default_value = "noise")]
    tag: String,

    /// Number of draws.
    #[arg(short = 'n', long, default_value_t = 10_000)]
    count: usize,

    /// Root seed of the random registry.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Random stream to draw from.
    #[arg(long, default_value = DEFAULT_STREAM)]
    stream: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw noise samples and print summary statistics.
    Sample(Source),

    /// Draw Bernoulli events and print the success rate.
    Bernoulli(Source),
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("{path}: {source}")]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    #[error("draw {index}: {source}")]
    Precondition {
        index: usize,
        #[source]
        source: PreconditionError,
    },
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Running statistics over a stream of samples (Welford's algorithm).
#[derive(Clone, Copy, Debug, PartialEq)]
struct Summary {
    count: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl Summary {
    #[allow(clippy::cast_precision_loss)]
    fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Population standard deviation.
    #[allow(clippy::cast_precision_loss)]
    fn stddev(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.m2 / self.count as f64).sqrt()
        }
    }
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn load(path: &Path) -> Result<ConfigNode, AppError> {
    ConfigNode::from_file("config", path).map_err(|source| AppError::Config {
        path: path.display().to_string(),
        source,
    })
}

fn build_injector(
    root: &ConfigNode,
    source: &Source,
    registry: &mut RandomRegistry,
) -> Result<NoiseInjector, AppError> {
    let mut injector = NoiseInjector::new(registry.stream(&source.stream));
    injector
        .init_from_child(root, &source.tag)
        .map_err(|err| AppError::Config {
            path: source.config.display().to_string(),
            source: err.context(format!("tag `{}`", source.tag)),
        })?;
    if !root.has_child(&source.tag) {
        tracing::warn!(tag = %source.tag, "tag not found, noise disabled");
    }
    Ok(injector)
}

fn run_sample(root: &ConfigNode, source: &Source) -> Result<Summary, AppError> {
    let mut registry = RandomRegistry::new(source.seed);
    let injector = build_injector(root, source, &mut registry)?;
    tracing::info!(model = %injector.model(), count = source.count, "sampling");

    let mut summary = Summary::default();
    for _ in 0..source.count {
        summary.push(injector.inject_noise());
    }
    Ok(summary)
}

fn run_bernoulli(root: &ConfigNode, source: &Source) -> Result<usize, AppError> {
    let mut registry = RandomRegistry::new(source.seed);
    let injector = build_injector(root, source, &mut registry)?;
    tracing::info!(model = %injector.model(), count = source.count, "drawing events");

    let mut successes = 0;
    for index in 0..source.count {
        let event = injector
            .bernoulli_event()
            .map_err(|source| AppError::Precondition { index, source })?;
        successes += usize::from(event);
    }
    Ok(successes)
}

fn run(command: &Commands) -> Result<(), AppError> {
    match command {
        Commands::Sample(source) => {
            let summary = run_sample(&load(&source.config)?, source)?;
            println!("count:  {}", summary.count);
            println!("mean:   {:.6}", summary.mean);
            println!("stddev: {:.6}", summary.stddev());
            if summary.count > 0 {
                println!("min:    {:.6}", summary.min);
                println!("max:    {:.6}", summary.max);
            }
        }
        Commands::Bernoulli(source) => {
            let successes = run_bernoulli(&load(&source.config)?, source)?;
            #[allow(clippy::cast_precision_loss)]
            let rate = if source.count == 0 {
                0.0
            } else {
                successes as f64 / source.count as f64
            };
            println!("events:    {}", source.count);
            println!("successes: {successes}");
            println!("rate:      {rate:.6}");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
