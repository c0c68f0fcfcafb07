//! Cost-function evaluation with history tracking.
//!
//! [`CostEvaluator`] turns a backend, a Hamiltonian and an ansatz into the
//! scalar objective the optimizers minimize, recording every evaluation in an
//! [`OptimizationTrace`]. Optimizers are written against the [`CostFunction`]
//! trait so they can be driven by analytic test doubles through [`FnCost`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ansatz::AnsatzSpec;
use crate::backend::Backend;
use crate::circuit::CircuitTemplate;
use crate::error::{VqaError, VqaResult};
use crate::hamiltonian::Hamiltonian;

/// Emit a debug line every this many evaluations.
const LOG_EVERY: usize = 10;

/// One recorded evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Zero-based position in the trace.
    pub iteration: usize,
    /// Snapshot of the evaluated parameter vector.
    pub parameters: Vec<f64>,
    /// Energy returned by the backend.
    pub energy: f64,
}

/// Append-only record of cost evaluations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationTrace {
    entries: Vec<TraceEntry>,
}

impl OptimizationTrace {
    /// Empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an evaluation, copying the parameters.
    pub fn record(&mut self, parameters: &[f64], energy: f64) {
        self.entries.push(TraceEntry {
            iteration: self.entries.len(),
            parameters: parameters.to_vec(),
            energy,
        });
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All entries in evaluation order.
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Energies in evaluation order.
    pub fn energies(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.energy).collect()
    }

    /// The lowest-energy entry; the earliest one wins ties.
    pub fn best(&self) -> Option<&TraceEntry> {
        self.entries.iter().fold(None, |best, e| match best {
            Some(b) if b.energy <= e.energy => Some(b),
            _ => Some(e),
        })
    }
}

/// A scalar objective over a parameter vector.
pub trait CostFunction {
    /// Evaluate at `parameters`.
    fn evaluate(&mut self, parameters: &[f64]) -> VqaResult<f64>;

    /// Clear history and counters.
    fn reset(&mut self);

    /// Evaluations since the last reset.
    fn evaluations(&self) -> usize;
}

impl<C: CostFunction + ?Sized> CostFunction for &mut C {
    fn evaluate(&mut self, parameters: &[f64]) -> VqaResult<f64> {
        (**self).evaluate(parameters)
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn evaluations(&self) -> usize {
        (**self).evaluations()
    }
}

/// Energy objective backed by a [`Backend`].
pub struct CostEvaluator<B> {
    backend: B,
    hamiltonian: Hamiltonian,
    template: CircuitTemplate,
    num_parameters: usize,
    trace: OptimizationTrace,
    evaluations: usize,
}

impl<B: Backend> CostEvaluator<B> {
    /// Build the evaluator, materializing the ansatz template once.
    pub fn new(backend: B, hamiltonian: Hamiltonian, ansatz: &AnsatzSpec) -> VqaResult<Self> {
        if hamiltonian.num_qubits() > ansatz.num_qubits() {
            return Err(VqaError::Configuration(format!(
                "Hamiltonian acts on {} qubits but the ansatz prepares only {}",
                hamiltonian.num_qubits(),
                ansatz.num_qubits()
            )));
        }
        Ok(Self {
            backend,
            hamiltonian,
            template: ansatz.build_state_preparation()?,
            num_parameters: ansatz.parameter_count(),
            trace: OptimizationTrace::new(),
            evaluations: 0,
        })
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The Hamiltonian being minimized.
    pub fn hamiltonian(&self) -> &Hamiltonian {
        &self.hamiltonian
    }

    /// The state-preparation template.
    pub fn template(&self) -> &CircuitTemplate {
        &self.template
    }

    /// Expected parameter vector length.
    pub fn num_parameters(&self) -> usize {
        self.num_parameters
    }

    /// Evaluation history since the last reset.
    pub fn trace(&self) -> &OptimizationTrace {
        &self.trace
    }

    /// Fail with `DimensionMismatch` unless `parameters` fits the ansatz.
    pub fn check_dimension(&self, parameters: &[f64]) -> VqaResult<()> {
        if parameters.len() != self.num_parameters {
            return Err(VqaError::DimensionMismatch {
                expected: self.num_parameters,
                actual: parameters.len(),
            });
        }
        Ok(())
    }

    /// Query the backend without recording anything.
    pub fn observe(&self, parameters: &[f64]) -> VqaResult<f64> {
        self.check_dimension(parameters)?;
        self.backend
            .observe(&self.template, &self.hamiltonian, parameters)
    }
}

impl<B: Backend> CostFunction for CostEvaluator<B> {
    fn evaluate(&mut self, parameters: &[f64]) -> VqaResult<f64> {
        let energy = self.observe(parameters)?;
        self.trace.record(parameters, energy);
        self.evaluations += 1;

        if self.evaluations % LOG_EVERY == 0 {
            debug!(
                evaluation = self.evaluations,
                energy,
                backend = self.backend.name(),
                "Cost evaluation"
            );
        }
        Ok(energy)
    }

    fn reset(&mut self) {
        self.trace.clear();
        self.evaluations = 0;
    }

    fn evaluations(&self) -> usize {
        self.evaluations
    }
}

/// Wraps a plain closure as a [`CostFunction`].
pub struct FnCost<F> {
    f: F,
    trace: OptimizationTrace,
}

impl<F> FnCost<F>
where
    F: FnMut(&[f64]) -> f64,
{
    /// Wrap `f`.
    pub fn new(f: F) -> Self {
        Self {
            f,
            trace: OptimizationTrace::new(),
        }
    }

    /// Evaluation history since the last reset.
    pub fn trace(&self) -> &OptimizationTrace {
        &self.trace
    }
}

impl<F> CostFunction for FnCost<F>
where
    F: FnMut(&[f64]) -> f64,
{
    fn evaluate(&mut self, parameters: &[f64]) -> VqaResult<f64> {
        let value = (self.f)(parameters);
        self.trace.record(parameters, value);
        Ok(value)
    }

    fn reset(&mut self) {
        self.trace.clear();
    }

    fn evaluations(&self) -> usize {
        self.trace.len()
    }
}
