//! H2 command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use vqa_core::AnsatzSpec;
use vqa_core::models::H2Molecule;

use super::common::{RunReport, print_result, solve, write_report};
use crate::config::RunConfig;

/// Execute the h2 command.
///
/// The error is measured against the lowest eigenvalue of the qubit
/// Hamiltonian; the tabulated molecular energy is printed alongside.
pub fn execute(
    config: &RunConfig,
    backend: &str,
    output: Option<&Path>,
    distance: f64,
    basis: &str,
    ansatz_name: &str,
) -> Result<()> {
    println!(
        "{} H2 at {} Å ({})",
        style("→").cyan().bold(),
        style(distance).green(),
        basis
    );

    let molecule = H2Molecule::new(distance, basis)?;
    let ansatz = AnsatzSpec::for_h2(ansatz_name)?;
    let exact = molecule.diagonalized_energy()?;
    let tabulated = molecule.exact_ground_state_energy()?;

    let outcome = solve(backend, molecule.build(), ansatz, config)?;
    println!();
    print_result(&outcome.result, Some(exact));
    println!("  Tabulated:       {tabulated:.10}");

    if let Some(path) = output {
        let problem = format!("h2(distance={distance}, basis={basis}, ansatz={ansatz_name})");
        write_report(path, &RunReport::new(problem, backend, config, Some(exact), &outcome))?;
    }

    Ok(())
}
