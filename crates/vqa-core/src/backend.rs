//! Execution backend abstraction.
//!
//! The engine never executes circuits itself. A [`Backend`] takes a
//! state-preparation template, a Hamiltonian and a parameter vector and returns
//! the energy expectation value. Implementations live in adapter crates.

use crate::circuit::CircuitTemplate;
use crate::error::VqaResult;
use crate::hamiltonian::Hamiltonian;

/// A blocking energy oracle.
pub trait Backend {
    /// Backend name, for logs and reports.
    fn name(&self) -> &str;

    /// Energy `⟨ψ(θ)|H|ψ(θ)⟩` of the state prepared by `template` bound to `parameters`.
    fn observe(
        &self,
        template: &CircuitTemplate,
        hamiltonian: &Hamiltonian,
        parameters: &[f64],
    ) -> VqaResult<f64>;
}

impl<B: Backend + ?Sized> Backend for &B {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn observe(
        &self,
        template: &CircuitTemplate,
        hamiltonian: &Hamiltonian,
        parameters: &[f64],
    ) -> VqaResult<f64> {
        (**self).observe(template, hamiltonian, parameters)
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn observe(
        &self,
        template: &CircuitTemplate,
        hamiltonian: &Hamiltonian,
        parameters: &[f64],
    ) -> VqaResult<f64> {
        (**self).observe(template, hamiltonian, parameters)
    }
}
