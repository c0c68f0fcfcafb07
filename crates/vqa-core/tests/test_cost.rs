//! Tests for the cost evaluator and its trace.

use std::cell::Cell;

use approx::assert_abs_diff_eq;
use vqa_core::{
    AnsatzSpec, Backend, CircuitTemplate, CostEvaluator, CostFunction, Hamiltonian,
    HamiltonianTerm, VqaError, VqaResult,
};

/// Energy `Σ_k c_k · cos θ_0`, counting backend calls.
struct Counting {
    calls: Cell<usize>,
}

impl Counting {
    fn new() -> Self {
        Self { calls: Cell::new(0) }
    }
}

impl Backend for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    fn observe(&self, template: &CircuitTemplate, h: &Hamiltonian, p: &[f64]) -> VqaResult<f64> {
        template.bind(p)?;
        self.calls.set(self.calls.get() + 1);
        let total: f64 = h.terms().iter().map(|t| t.coeff).sum();
        Ok(total * p[0].cos())
    }
}

struct Offline;

impl Backend for Offline {
    fn name(&self) -> &str {
        "offline"
    }

    fn observe(&self, _: &CircuitTemplate, _: &Hamiltonian, _: &[f64]) -> VqaResult<f64> {
        Err(VqaError::Backend("device offline".into()))
    }
}

fn hamiltonian() -> Hamiltonian {
    Hamiltonian::new(2, vec![HamiltonianTerm::zz(0, 1, -1.0), HamiltonianTerm::x(0, 0.5)]).unwrap()
}

fn ansatz() -> AnsatzSpec {
    AnsatzSpec::hardware_efficient(2, 1).unwrap()
}

// ---------------------------------------------------------------------------
// Evaluation and trace
// ---------------------------------------------------------------------------

#[test]
fn evaluate_records_trace() {
    let mut cost = CostEvaluator::new(Counting::new(), hamiltonian(), &ansatz()).unwrap();
    let e = cost.evaluate(&[0.0, 1.0]).unwrap();
    assert_abs_diff_eq!(e, -0.5);
    assert_eq!(cost.evaluations(), 1);
    assert_eq!(cost.trace().len(), 1);
    assert_eq!(cost.trace().entries()[0].parameters, vec![0.0, 1.0]);
}

#[test]
fn repeated_evaluation_gives_independent_snapshots() {
    let mut cost = CostEvaluator::new(Counting::new(), hamiltonian(), &ansatz()).unwrap();
    let mut theta = vec![0.3, 0.4];
    let first = cost.evaluate(&theta).unwrap();
    let second = cost.evaluate(&theta).unwrap();
    theta[0] = 9.0;

    let entries = cost.trace().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(first, second);
    assert_eq!(entries[0].energy, entries[1].energy);
    assert_eq!(entries[0].parameters, vec![0.3, 0.4]);
    assert_eq!(entries[1].parameters, vec![0.3, 0.4]);
    assert_eq!((entries[0].iteration, entries[1].iteration), (0, 1));
}

#[test]
fn reset_clears_history() {
    let mut cost = CostEvaluator::new(Counting::new(), hamiltonian(), &ansatz()).unwrap();
    cost.evaluate(&[0.1, 0.1]).unwrap();
    cost.reset();
    assert_eq!(cost.evaluations(), 0);
    assert!(cost.trace().is_empty());
}

#[test]
fn observe_bypasses_trace() {
    let cost = CostEvaluator::new(Counting::new(), hamiltonian(), &ansatz()).unwrap();
    cost.observe(&[0.1, 0.1]).unwrap();
    assert!(cost.trace().is_empty());
    assert_eq!(cost.backend().calls.get(), 1);
}

#[test]
fn best_prefers_earliest_tie() {
    let mut cost = CostEvaluator::new(Counting::new(), hamiltonian(), &ansatz()).unwrap();
    cost.evaluate(&[1.0, 0.0]).unwrap();
    cost.evaluate(&[0.0, 0.0]).unwrap();
    cost.evaluate(&[0.0, 5.0]).unwrap();
    let best = cost.trace().best().unwrap();
    assert_eq!(best.iteration, 1);
    assert_eq!(cost.trace().energies().len(), 3);
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

#[test]
fn wrong_length_rejected_without_backend_call() {
    let mut cost = CostEvaluator::new(Counting::new(), hamiltonian(), &ansatz()).unwrap();
    let err = cost.evaluate(&[0.1, 0.2, 0.3]);
    assert!(matches!(
        err,
        Err(VqaError::DimensionMismatch {
            expected: 2,
            actual: 3
        })
    ));
    assert_eq!(cost.backend().calls.get(), 0);
    assert!(cost.trace().is_empty());
}

#[test]
fn backend_error_propagates_and_is_not_recorded() {
    let mut cost = CostEvaluator::new(Offline, hamiltonian(), &ansatz()).unwrap();
    assert!(matches!(cost.evaluate(&[0.0, 0.0]), Err(VqaError::Backend(_))));
    assert_eq!(cost.evaluations(), 0);
}

#[test]
fn hamiltonian_wider_than_ansatz_rejected() {
    let wide = Hamiltonian::from_terms(vec![HamiltonianTerm::z(3, 1.0)]);
    assert!(matches!(
        CostEvaluator::new(Offline, wide, &ansatz()),
        Err(VqaError::Configuration(_))
    ));
}

#[test]
fn trace_serializes() {
    let mut cost = CostEvaluator::new(Counting::new(), hamiltonian(), &ansatz()).unwrap();
    cost.evaluate(&[0.2, 0.0]).unwrap();
    let json = serde_json::to_string(cost.trace()).unwrap();
    assert!(json.contains("\"energy\""));
    assert!(json.contains("\"parameters\""));
}
