//! Deterministic stand-in backend.

use tracing::warn;

use vqa_core::{Backend, CircuitTemplate, Hamiltonian, VqaResult};

/// Offset subtracted from the parameter norm.
const MOCK_OFFSET: f64 = 5.0;

/// Returns `Σ θ_i² − 5` without simulating anything.
///
/// Useful for exercising the optimization loop when no simulator is wanted.
/// The circuit and Hamiltonian are ignored.
#[derive(Debug, Clone)]
pub struct MockBackend {
    name: String,
}

impl MockBackend {
    /// Create the mock backend. Logs a warning once, since its energies are not physical.
    pub fn new() -> Self {
        warn!("Using mock backend: energies are Σθ² - 5, not physical expectation values");
        Self {
            name: "mock".to_string(),
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn observe(&self, _: &CircuitTemplate, _: &Hamiltonian, parameters: &[f64]) -> VqaResult<f64> {
        Ok(parameters.iter().map(|p| p * p).sum::<f64>() - MOCK_OFFSET)
    }
}
