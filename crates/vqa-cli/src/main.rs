//! VQA Command-Line Interface
//!
//! Runs variational ground-state searches on the built-in models and reports
//! the optimum next to the exact reference energy.
//!
//! ```text
//! vqa ising --qubits 4 --h 0.5 --method cobyla
//! vqa h2 --distance 0.74 --ansatz uccsd --output run.json
//! vqa -v --config run.yaml ising --open
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{h2, ising};
use config::{ConfigError, RunConfig};

/// VQA - variational quantum eigensolver on a local statevector simulator
#[derive(Parser)]
#[command(name = "vqa")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML file with run defaults
    #[arg(short, long, global = true, env = "VQA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ground state of the transverse-field Ising chain
    Ising {
        #[command(flatten)]
        run: RunArgs,

        /// Number of spins
        #[arg(short, long, default_value = "4")]
        qubits: usize,

        /// ZZ coupling strength
        #[arg(long, default_value = "1.0", allow_negative_numbers = true)]
        j: f64,

        /// Transverse field strength
        #[arg(long, default_value = "0.5", allow_negative_numbers = true)]
        h: f64,

        /// Open boundary conditions (periodic otherwise)
        #[arg(long)]
        open: bool,

        /// Hardware-efficient ansatz depth
        #[arg(short, long, default_value = "2")]
        depth: usize,
    },

    /// Ground state of the minimal H2 Hamiltonian
    H2 {
        #[command(flatten)]
        run: RunArgs,

        /// Bond distance in Angstrom
        #[arg(long, default_value = "0.74")]
        distance: f64,

        /// Basis set
        #[arg(long, default_value = "sto-3g")]
        basis: String,

        /// Ansatz (uccsd, simplified)
        #[arg(short, long, default_value = "uccsd")]
        ansatz: String,
    },
}

/// Optimizer flags shared by every subcommand. Unset flags fall back to the
/// configuration file and `VQA_*` environment.
#[derive(Args)]
struct RunArgs {
    /// Optimizer (cobyla, nelder-mead, powell, adaptive, gradient-descent|gd, adam)
    #[arg(short, long)]
    method: Option<String>,

    /// Iteration budget
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Convergence tolerance
    #[arg(long)]
    tolerance: Option<f64>,

    /// Seed for the initial parameters
    #[arg(long)]
    seed: Option<u64>,

    /// Step size for gradient-descent and adam
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Backend (statevector, mock)
    #[arg(short, long, default_value = "statevector")]
    backend: String,

    /// Write the run (result and trace) as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RunArgs {
    /// Layer the flags over `config`, then validate the result.
    fn apply(&self, mut config: RunConfig) -> Result<RunConfig, ConfigError> {
        if let Some(method) = &self.method {
            config.method = method.clone();
        }
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }
        if let Some(tolerance) = self.tolerance {
            config.tolerance = tolerance;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(learning_rate) = self.learning_rate {
            config.learning_rate = learning_rate;
        }
        config.validate()?;
        Ok(config)
    }
}

impl Commands {
    fn run_args(&self) -> &RunArgs {
        match self {
            Commands::Ising { run, .. } | Commands::H2 { run, .. } => run,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Flags are layered last, so validation sees the fully resolved settings
    let config = RunConfig::load(cli.config.as_deref())
        .and_then(|config| cli.command.run_args().apply(config));
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    // Setup logging
    let filter = match cli.verbose {
        0 => config.log_level.to_ascii_lowercase(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Ising {
            run,
            qubits,
            j,
            h,
            open,
            depth,
        } => ising::execute(
            &config,
            &run.backend,
            run.output.as_deref(),
            qubits,
            j,
            h,
            !open,
            depth,
        ),

        Commands::H2 {
            run,
            distance,
            basis,
            ansatz,
        } => h2::execute(
            &config,
            &run.backend,
            run.output.as_deref(),
            distance,
            &basis,
            &ansatz,
        ),
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
