//! The variational loop: a cost evaluator plus optimizer dispatch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ansatz::AnsatzSpec;
use crate::backend::Backend;
use crate::cost::{CostEvaluator, CostFunction, OptimizationTrace};
use crate::error::{VqaError, VqaResult};
use crate::hamiltonian::Hamiltonian;
use crate::optimizers::{
    AdaptiveOptimizer, DerivativeFreeMethod, GradientFreeOptimizer, GradientOptimizer,
    OptimizerResult,
};

/// Optimization strategy for [`Vqe::optimize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Trust-region simplex.
    Cobyla,
    /// Downhill simplex.
    NelderMead,
    /// Conjugate directions.
    Powell,
    /// Race the listed methods and keep the best.
    Adaptive(Vec<DerivativeFreeMethod>),
    /// The configured parameter-shift optimizer.
    Gradient,
}

impl Method {
    /// Adaptive racer over the default method list.
    pub fn adaptive() -> Self {
        Self::Adaptive(AdaptiveOptimizer::default().methods().to_vec())
    }
}

impl From<DerivativeFreeMethod> for Method {
    fn from(method: DerivativeFreeMethod) -> Self {
        match method {
            DerivativeFreeMethod::Cobyla => Self::Cobyla,
            DerivativeFreeMethod::NelderMead => Self::NelderMead,
            DerivativeFreeMethod::Powell => Self::Powell,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cobyla => write!(f, "COBYLA"),
            Self::NelderMead => write!(f, "Nelder-Mead"),
            Self::Powell => write!(f, "Powell"),
            Self::Adaptive(methods) => {
                let names: Vec<_> = methods.iter().map(|m| m.name()).collect();
                write!(f, "adaptive({})", names.join(", "))
            }
            Self::Gradient => write!(f, "gradient"),
        }
    }
}

impl FromStr for Method {
    type Err = VqaError;

    /// Parses a single method name, `adaptive`, or `gradient`.
    fn from_str(s: &str) -> VqaResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "adaptive" => Ok(Self::adaptive()),
            "gradient" => Ok(Self::Gradient),
            other => other.parse::<DerivativeFreeMethod>().map(Self::from),
        }
    }
}

/// Variational quantum eigensolver over one backend, Hamiltonian and ansatz.
pub struct Vqe<B> {
    evaluator: CostEvaluator<B>,
    ansatz: AnsatzSpec,
    gradient_optimizer: Option<GradientOptimizer>,
}

impl<B: Backend> Vqe<B> {
    /// Wire the loop together. Fails if the ansatz cannot host the Hamiltonian.
    pub fn new(backend: B, hamiltonian: Hamiltonian, ansatz: AnsatzSpec) -> VqaResult<Self> {
        let evaluator = CostEvaluator::new(backend, hamiltonian, &ansatz)?;
        Ok(Self {
            evaluator,
            ansatz,
            gradient_optimizer: None,
        })
    }

    /// Enable [`Method::Gradient`].
    pub fn with_gradient_optimizer(mut self, optimizer: impl Into<GradientOptimizer>) -> Self {
        self.gradient_optimizer = Some(optimizer.into());
        self
    }

    /// The ansatz.
    pub fn ansatz(&self) -> &AnsatzSpec {
        &self.ansatz
    }

    /// The configured gradient optimizer, if any.
    pub fn gradient_optimizer(&self) -> Option<&GradientOptimizer> {
        self.gradient_optimizer.as_ref()
    }

    /// The cost evaluator.
    pub fn evaluator(&self) -> &CostEvaluator<B> {
        &self.evaluator
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        self.evaluator.backend()
    }

    /// The Hamiltonian.
    pub fn hamiltonian(&self) -> &Hamiltonian {
        self.evaluator.hamiltonian()
    }

    /// Length of the parameter vector.
    pub fn num_parameters(&self) -> usize {
        self.evaluator.num_parameters()
    }

    /// Run the optimization from `initial`.
    ///
    /// The parameter count and, for [`Method::Gradient`], the presence of a
    /// gradient optimizer are checked before the backend is queried. The trace
    /// is reset at the start of every run.
    pub fn optimize(
        &mut self,
        initial: &[f64],
        method: Method,
        max_iterations: usize,
        tolerance: f64,
    ) -> VqaResult<OptimizerResult> {
        self.evaluator.check_dimension(initial)?;
        let gradient = match (&method, self.gradient_optimizer) {
            (Method::Gradient, None) => {
                return Err(VqaError::Configuration(
                    "gradient method requested but no gradient optimizer is configured"
                        .to_string(),
                ));
            }
            (_, optimizer) => optimizer,
        };

        info!(
            method = %method,
            backend = self.evaluator.backend().name(),
            ansatz = %self.ansatz,
            parameters = initial.len(),
            "Starting VQE"
        );

        let cost = &mut self.evaluator;
        let single = |m: DerivativeFreeMethod, cost: &mut CostEvaluator<B>| {
            GradientFreeOptimizer::new(m).optimize(cost, initial, max_iterations, tolerance)
        };
        let result = match (method, gradient) {
            (Method::Cobyla, _) => single(DerivativeFreeMethod::Cobyla, cost),
            (Method::NelderMead, _) => single(DerivativeFreeMethod::NelderMead, cost),
            (Method::Powell, _) => single(DerivativeFreeMethod::Powell, cost),
            (Method::Adaptive(methods), _) => {
                AdaptiveOptimizer::new(methods)?.optimize(cost, initial, max_iterations, tolerance)?
            }
            (Method::Gradient, optimizer) => match optimizer {
                Some(optimizer) => optimizer.optimize(cost, initial, max_iterations, tolerance)?,
                None => return Err(VqaError::Configuration("no gradient optimizer".to_string())),
            },
        };

        info!(
            energy = result.optimal_energy,
            converged = result.converged,
            evaluations = self.evaluator.evaluations(),
            "VQE finished"
        );
        Ok(result)
    }

    /// Every evaluation of the most recent run.
    pub fn history(&self) -> &OptimizationTrace {
        self.evaluator.trace()
    }

    /// Energies of the most recent run, in evaluation order.
    pub fn energy_history(&self) -> Vec<f64> {
        self.evaluator.trace().energies()
    }

    /// Parameter-shift gradient at `theta`, leaving the history untouched.
    pub fn compute_gradient(&self, theta: &[f64]) -> VqaResult<Vec<f64>> {
        self.evaluator.check_dimension(theta)?;
        let shift = self
            .gradient_optimizer
            .as_ref()
            .map(|g| *g.shift())
            .unwrap_or_default();
        shift.gradient_with(|p| self.evaluator.observe(p), theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitTemplate;
    use crate::hamiltonian::HamiltonianTerm;
    use crate::optimizers::Adam;

    /// Σθ², ignoring the circuit.
    struct Quadratic;

    impl Backend for Quadratic {
        fn name(&self) -> &str {
            "quadratic"
        }

        fn observe(&self, _: &CircuitTemplate, _: &Hamiltonian, p: &[f64]) -> VqaResult<f64> {
            Ok(p.iter().map(|x| x * x).sum())
        }
    }

    fn vqe() -> Vqe<Quadratic> {
        let h = Hamiltonian::from_terms(vec![HamiltonianTerm::z(0, 1.0)]);
        let ansatz = AnsatzSpec::hardware_efficient(2, 1).unwrap();
        Vqe::new(Quadratic, h, ansatz).unwrap()
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("cobyla".parse::<Method>().unwrap(), Method::Cobyla);
        assert_eq!("Nelder-Mead".parse::<Method>().unwrap(), Method::NelderMead);
        assert_eq!("gradient".parse::<Method>().unwrap(), Method::Gradient);
        assert_eq!(
            "adaptive".parse::<Method>().unwrap(),
            Method::Adaptive(vec![
                DerivativeFreeMethod::Cobyla,
                DerivativeFreeMethod::NelderMead
            ])
        );
        assert!("lbfgs".parse::<Method>().is_err());
    }

    #[test]
    fn test_gradient_without_optimizer_rejected() {
        let mut vqe = vqe();
        let err = vqe.optimize(&[0.1, 0.2], Method::Gradient, 10, 1e-6);
        assert!(matches!(err, Err(VqaError::Configuration(_))));
        assert!(vqe.history().is_empty());
    }

    #[test]
    fn test_wrong_length_rejected_before_evaluation() {
        let mut vqe = vqe();
        let err = vqe.optimize(&[0.1], Method::Cobyla, 10, 1e-6);
        assert!(matches!(
            err,
            Err(VqaError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert!(vqe.history().is_empty());
    }

    #[test]
    fn test_compute_gradient_leaves_history() {
        let vqe = vqe().with_gradient_optimizer(Adam::default());
        let grad = vqe.compute_gradient(&[0.3, -0.2]).unwrap();
        // (θ+π/2)² − (θ−π/2)² = 2πθ, over 2 ⇒ πθ
        assert!((grad[0] - std::f64::consts::PI * 0.3).abs() < 1e-12);
        assert!(vqe.history().is_empty());
    }

    #[test]
    fn test_history_reset_between_runs() {
        let mut vqe = vqe();
        vqe.optimize(&[0.5, 0.5], Method::NelderMead, 50, 1e-8).unwrap();
        let first = vqe.history().len();
        assert!(first > 0);
        let second = vqe.optimize(&[0.5, 0.5], Method::Powell, 1, 1e-8).unwrap();
        assert_eq!(vqe.history().len(), second.evaluations);
        assert_eq!(vqe.history().entries()[0].iteration, 0);
        assert_eq!(vqe.energy_history().len(), vqe.history().len());
    }
}
