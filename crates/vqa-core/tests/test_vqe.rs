//! Tests for the VQE driver.

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use vqa_core::models::IsingModel;
use vqa_core::{
    Adam, AnsatzSpec, Backend, CircuitTemplate, DerivativeFreeMethod, GradientDescent,
    Hamiltonian, Method, OptimizerResult, OptimizerStatus, VqaError, VqaResult, Vqe,
};

/// `Σ -cos θ_i`, minimum `-n` at the origin.
struct CosineBackend;

impl Backend for CosineBackend {
    fn name(&self) -> &str {
        "cosine"
    }

    fn observe(&self, _: &CircuitTemplate, _: &Hamiltonian, p: &[f64]) -> VqaResult<f64> {
        Ok(-p.iter().map(|t| t.cos()).sum::<f64>())
    }
}

fn vqe() -> Vqe<CosineBackend> {
    let model = IsingModel::new(2, 1.0, 0.5, true).unwrap();
    Vqe::new(
        CosineBackend,
        model.build(),
        AnsatzSpec::hardware_efficient(2, 1).unwrap(),
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Preconditions
// ---------------------------------------------------------------------------

#[test]
fn gradient_without_optimizer_is_configuration_error() {
    let mut vqe = vqe();
    let result = vqe.optimize(&[0.1, 0.1], Method::Gradient, 10, 1e-6);
    assert!(matches!(result, Err(VqaError::Configuration(_))));
    assert_eq!(vqe.history().len(), 0);
}

#[test]
fn wrong_length_is_dimension_mismatch() {
    for method in [Method::Cobyla, Method::adaptive(), Method::Gradient] {
        let mut vqe = vqe().with_gradient_optimizer(Adam::default());
        let result = vqe.optimize(&[0.1, 0.1, 0.1], method, 10, 1e-6);
        assert!(matches!(
            result,
            Err(VqaError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
        assert!(vqe.energy_history().is_empty());
    }
}

#[test]
fn empty_adaptive_list_rejected() {
    let mut vqe = vqe();
    let result = vqe.optimize(&[0.1, 0.1], Method::Adaptive(vec![]), 10, 1e-6);
    assert!(matches!(result, Err(VqaError::Configuration(_))));
    assert!(vqe.history().is_empty());
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

#[test]
fn derivative_free_methods_reach_minimum() {
    for method in [Method::Cobyla, Method::NelderMead, Method::Powell] {
        let mut vqe = vqe();
        let result = vqe.optimize(&[0.7, -0.4], method.clone(), 500, 1e-10).unwrap();
        assert!(result.optimal_energy < -1.999, "{method}: {}", result.optimal_energy);
        assert_eq!(vqe.history().len(), result.evaluations);
    }
}

#[test]
fn adaptive_history_spans_all_methods() {
    let mut vqe = vqe();
    let result = vqe
        .optimize(
            &[0.7, -0.4],
            Method::Adaptive(vec![
                DerivativeFreeMethod::NelderMead,
                DerivativeFreeMethod::Powell,
            ]),
            200,
            1e-10,
        )
        .unwrap();
    assert_eq!(vqe.history().len(), result.evaluations);
    assert!(["Nelder-Mead", "Powell"].contains(&result.method.as_str()));
}

#[test]
fn gradient_descent_through_driver() {
    let mut vqe = vqe().with_gradient_optimizer(GradientDescent::new(0.5));
    let result = vqe.optimize(&[0.5, -0.3], Method::Gradient, 200, 1e-6).unwrap();
    assert!(result.converged);
    assert_abs_diff_eq!(result.optimal_energy, -2.0, epsilon = 1e-9);
    assert_eq!(vqe.energy_history().len(), result.evaluations);
    assert_eq!(result.method, "GradientDescent");
}

#[test]
fn compute_gradient_matches_analytic() {
    let vqe = vqe();
    let theta = [0.4, -1.3];
    let grad = vqe.compute_gradient(&theta).unwrap();
    assert_abs_diff_eq!(grad[0], theta[0].sin(), epsilon = 1e-12);
    assert_abs_diff_eq!(grad[1], theta[1].sin(), epsilon = 1e-12);
    assert!(vqe.history().is_empty());
}

#[test]
fn history_resets_between_runs() {
    let mut vqe = vqe();
    vqe.optimize(&[0.7, -0.4], Method::Cobyla, 100, 1e-8).unwrap();
    let second = vqe.optimize(&[0.2, 0.2], Method::Powell, 5, 1e-8).unwrap();
    assert_eq!(vqe.history().len(), second.evaluations);
    assert_eq!(vqe.history().entries()[0].parameters, vec![0.2, 0.2]);
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[test]
fn method_parsing() {
    assert_eq!("powell".parse::<Method>().unwrap(), Method::Powell);
    assert!(matches!(
        "simulated-annealing".parse::<Method>(),
        Err(VqaError::UnknownMethod(_))
    ));
}

proptest! {
    #[test]
    fn result_json_round_trip(
        params in prop::collection::vec(-3.0_f64..3.0, 0..8),
        energy in -10.0_f64..10.0,
        iterations in 0_usize..1000,
        norms in prop::collection::vec(0.0_f64..5.0, 0..4),
    ) {
        let result = OptimizerResult {
            optimal_parameters: params,
            optimal_energy: energy,
            converged: iterations % 2 == 0,
            iterations,
            message: "Optimization converged".to_string(),
            status: OptimizerStatus::Converged,
            evaluations: iterations * 3,
            method: "COBYLA".to_string(),
            gradient_norms: norms,
        };
        let json = serde_json::to_string(&result).unwrap();
        let restored: OptimizerResult = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(restored, result);
    }
}
