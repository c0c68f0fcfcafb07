//! Statevector backend implementation.

use tracing::{debug, info};

use vqa_core::{Backend, CircuitTemplate, Hamiltonian, VqaError, VqaResult};

use crate::statevector::Statevector;

/// Default register limit (2^20 amplitudes, 16 MiB).
const DEFAULT_MAX_QUBITS: usize = 20;

/// Exact local backend.
///
/// Binds the template, simulates the statevector from |0...0⟩ and returns the
/// exact expectation value of the Hamiltonian. No shot noise.
#[derive(Debug, Clone)]
pub struct StatevectorBackend {
    name: String,
    max_qubits: usize,
}

impl StatevectorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: usize) -> Self {
        info!(max_qubits, "Using local statevector backend");
        Self {
            name: "statevector".to_string(),
            max_qubits,
        }
    }

    /// Largest register this backend accepts.
    pub fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    /// Prepare the state for `template` bound to `parameters`.
    pub fn prepare(&self, template: &CircuitTemplate, parameters: &[f64]) -> VqaResult<Statevector> {
        let num_qubits = template.num_qubits();
        if num_qubits > self.max_qubits {
            return Err(VqaError::TooManyQubits {
                num_qubits,
                max: self.max_qubits,
            });
        }
        let circuit = template.bind(parameters)?;
        Ok(Statevector::from_circuit(&circuit))
    }
}

impl Default for StatevectorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for StatevectorBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn observe(
        &self,
        template: &CircuitTemplate,
        hamiltonian: &Hamiltonian,
        parameters: &[f64],
    ) -> VqaResult<f64> {
        if hamiltonian.num_qubits() > template.num_qubits() {
            return Err(VqaError::Backend(format!(
                "Hamiltonian acts on {} qubits but the circuit has {}",
                hamiltonian.num_qubits(),
                template.num_qubits()
            )));
        }

        let state = self.prepare(template, parameters)?;
        let energy = state.expectation(hamiltonian);
        debug!(
            qubits = state.num_qubits(),
            gates = template.gates().len(),
            terms = hamiltonian.n_terms(),
            energy,
            "Statevector observation"
        );
        Ok(energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vqa_core::{Angle, HamiltonianTerm};

    #[test]
    fn test_ry_energy() {
        let backend = StatevectorBackend::new();
        let mut template = CircuitTemplate::new(1);
        template.ry(0, Angle::Param(0)).unwrap();
        let h = Hamiltonian::new(1, vec![HamiltonianTerm::z(0, 1.0)]).unwrap();

        let e = backend.observe(&template, &h, &[0.9]).unwrap();
        assert!((e - 0.9_f64.cos()).abs() < 1e-12);
    }

    #[test]
    fn test_too_many_qubits() {
        let backend = StatevectorBackend::with_max_qubits(3);
        let template = CircuitTemplate::new(4);
        let h = Hamiltonian::new(4, vec![]).unwrap();
        assert!(matches!(
            backend.observe(&template, &h, &[]),
            Err(VqaError::TooManyQubits { num_qubits: 4, max: 3 })
        ));
    }

    #[test]
    fn test_hamiltonian_wider_than_circuit() {
        let backend = StatevectorBackend::new();
        let template = CircuitTemplate::new(1);
        let h = Hamiltonian::new(2, vec![HamiltonianTerm::z(1, 1.0)]).unwrap();
        assert!(matches!(
            backend.observe(&template, &h, &[]),
            Err(VqaError::Backend(_))
        ));
    }

    #[test]
    fn test_identity_term_is_constant_offset() {
        let backend = StatevectorBackend::new();
        let mut template = CircuitTemplate::new(2);
        template.ry(0, Angle::Param(0)).unwrap().cx(0, 1).unwrap();
        let h = Hamiltonian::new(2, vec![HamiltonianTerm::constant(-1.5)]).unwrap();
        let e = backend.observe(&template, &h, &[2.1]).unwrap();
        assert!((e + 1.5).abs() < 1e-12);
    }
}
