//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::debug;

use vqa_adapter_sim::{MockBackend, StatevectorBackend};
use vqa_core::exact::MAX_EXACT_QUBITS;
use vqa_core::{
    Adam, AnsatzSpec, Backend, GradientDescent, GradientOptimizer, Hamiltonian, Method,
    OptimizationTrace, OptimizerResult, OptimizerStatus, Vqe,
};

use crate::config::RunConfig;

/// Map a configured method name to a driver method and, for the gradient
/// family, the optimizer it needs.
pub fn resolve_method(config: &RunConfig) -> Result<(Method, Option<GradientOptimizer>)> {
    match config.method.to_ascii_lowercase().as_str() {
        "gradient-descent" | "gd" => Ok((
            Method::Gradient,
            Some(GradientDescent::new(config.learning_rate).into()),
        )),
        "adam" => Ok((Method::Gradient, Some(Adam::new(config.learning_rate).into()))),
        other => {
            let method: Method = other.parse()?;
            if method == Method::Gradient {
                anyhow::bail!("Use 'gradient-descent' or 'adam' to select a gradient method");
            }
            Ok((method, None))
        }
    }
}

/// Everything a single run produced.
pub struct RunOutcome {
    pub initial_parameters: Vec<f64>,
    pub result: OptimizerResult,
    pub trace: OptimizationTrace,
}

/// Optimize `hamiltonian` over `ansatz` on the named backend.
pub fn solve(
    backend: &str,
    hamiltonian: Hamiltonian,
    ansatz: AnsatzSpec,
    config: &RunConfig,
) -> Result<RunOutcome> {
    match backend.to_lowercase().as_str() {
        "statevector" | "sv" | "simulator" | "sim" => {
            solve_on(StatevectorBackend::new(), hamiltonian, ansatz, config)
        }
        "mock" => solve_on(MockBackend::new(), hamiltonian, ansatz, config),
        other => anyhow::bail!("Unknown backend: '{other}'. Available: statevector, mock"),
    }
}

fn solve_on<B: Backend>(
    backend: B,
    hamiltonian: Hamiltonian,
    ansatz: AnsatzSpec,
    config: &RunConfig,
) -> Result<RunOutcome> {
    let (method, gradient) = resolve_method(config)?;
    debug!(?config, "Resolved run configuration");
    let initial_parameters = ansatz.initial_parameters(config.seed);

    println!(
        "  Ansatz: {} ({} parameters), backend: {}",
        ansatz,
        ansatz.parameter_count(),
        style(backend.name()).yellow()
    );

    let mut vqe = Vqe::new(backend, hamiltonian, ansatz)?;
    if let Some(gradient) = gradient {
        vqe = vqe.with_gradient_optimizer(gradient);
    }

    let label = match vqe.gradient_optimizer() {
        Some(g) => g.name().to_string(),
        None => method.to_string(),
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid progress template")?,
    );
    spinner.set_message(format!("Optimizing with {label}..."));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = vqe.optimize(
        &initial_parameters,
        method,
        config.max_iterations,
        config.tolerance,
    );
    spinner.finish_and_clear();

    let result = outcome.context("Optimization failed")?;
    Ok(RunOutcome {
        initial_parameters,
        trace: vqe.history().clone(),
        result,
    })
}

/// Print the optimum and, when one is available, its distance to `exact`.
pub fn print_result(result: &OptimizerResult, exact: Option<f64>) {
    let marker = match result.status {
        OptimizerStatus::Converged => style("✓").green().bold(),
        OptimizerStatus::Failed => style("✗").red().bold(),
        _ => style("!").yellow().bold(),
    };
    println!(
        "{} {}: {}",
        marker,
        style(&result.method).bold(),
        result.message
    );
    println!();
    println!("  Optimal energy:  {:.10}", result.optimal_energy);
    match exact {
        Some(exact) => {
            println!("  Exact energy:    {exact:.10}");
            println!(
                "  Error:           {:.3e}",
                (result.optimal_energy - exact).abs()
            );
        }
        None => println!(
            "  Exact energy:    {} (more than {} qubits)",
            style("unavailable").dim(),
            MAX_EXACT_QUBITS
        ),
    }
    println!(
        "  Iterations:      {} ({} evaluations)",
        result.iterations, result.evaluations
    );

    let params: Vec<String> = result
        .optimal_parameters
        .iter()
        .map(|p| format!("{p:.6}"))
        .collect();
    println!("  Parameters:      [{}]", params.join(", "));
}

/// JSON document written by `--output`.
#[derive(Serialize)]
pub struct RunReport<'a> {
    pub problem: String,
    pub backend: &'a str,
    pub seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_energy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<f64>,
    pub initial_parameters: &'a [f64],
    pub result: &'a OptimizerResult,
    pub trace: &'a OptimizationTrace,
}

impl<'a> RunReport<'a> {
    pub fn new(
        problem: String,
        backend: &'a str,
        config: &RunConfig,
        exact_energy: Option<f64>,
        outcome: &'a RunOutcome,
    ) -> Self {
        Self {
            problem,
            backend,
            seed: config.seed,
            exact_energy,
            error: exact_energy.map(|exact| (outcome.result.optimal_energy - exact).abs()),
            initial_parameters: &outcome.initial_parameters,
            result: &outcome.result,
            trace: &outcome.trace,
        }
    }
}

/// Write `report` as pretty JSON.
pub fn write_report(path: &Path, report: &RunReport<'_>) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize run")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;
    println!(
        "{} Run written to {}",
        style("✓").green().bold(),
        style(path.display()).green()
    );
    Ok(())
}
