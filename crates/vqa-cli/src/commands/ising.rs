//! Ising command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;
use tracing::warn;

use vqa_core::AnsatzSpec;
use vqa_core::exact::MAX_EXACT_QUBITS;
use vqa_core::models::IsingModel;

use super::common::{RunReport, print_result, solve, write_report};
use crate::config::RunConfig;

/// Execute the ising command.
///
/// Chains wider than [`MAX_EXACT_QUBITS`] run without an exact reference.
#[allow(clippy::too_many_arguments)]
pub fn execute(
    config: &RunConfig,
    backend: &str,
    output: Option<&Path>,
    qubits: usize,
    j: f64,
    h: f64,
    periodic: bool,
    depth: usize,
) -> Result<()> {
    let boundary = if periodic { "periodic" } else { "open" };
    println!(
        "{} Ising chain: {} spins, J = {}, h = {} ({})",
        style("→").cyan().bold(),
        style(qubits).green(),
        j,
        h,
        boundary
    );

    let model = IsingModel::new(qubits, j, h, periodic)?;
    let hamiltonian = model.build();
    println!(
        "  Hamiltonian: {} terms, {} couplings",
        hamiltonian.n_terms(),
        model.coupled_pairs().len()
    );

    let exact = if qubits <= MAX_EXACT_QUBITS {
        Some(model.exact_diagonalization_energy()?)
    } else {
        warn!(
            qubits,
            max = MAX_EXACT_QUBITS,
            "Skipping exact diagonalization"
        );
        None
    };
    let ansatz = AnsatzSpec::hardware_efficient(qubits, depth)?;

    let outcome = solve(backend, hamiltonian, ansatz, config)?;
    println!();
    print_result(&outcome.result, exact);
    println!(
        "  Classical:       {:.10}",
        model.classical_ground_state_energy()
    );

    if let Some(path) = output {
        let problem = format!("ising(n={qubits}, J={j}, h={h}, {boundary}, depth={depth})");
        write_report(path, &RunReport::new(problem, backend, config, exact, &outcome))?;
    }

    Ok(())
}
