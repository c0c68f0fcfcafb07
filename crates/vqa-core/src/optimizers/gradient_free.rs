//! Derivative-free optimization drivers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::cobyla::Cobyla;
use super::nelder_mead::NelderMead;
use super::powell::Powell;
use super::{MinimizerError, Minimum, OptimizerResult, OptimizerStatus};
use crate::cost::CostFunction;
use crate::error::{VqaError, VqaResult};

/// Derivative-free minimization method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DerivativeFreeMethod {
    /// Trust-region simplex, tolerance on value spread.
    Cobyla,
    /// Downhill simplex, tolerance `ftol`.
    NelderMead,
    /// Conjugate directions, tolerance `ftol`.
    Powell,
}

impl DerivativeFreeMethod {
    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Cobyla => "COBYLA",
            Self::NelderMead => "Nelder-Mead",
            Self::Powell => "Powell",
        }
    }
}

impl fmt::Display for DerivativeFreeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DerivativeFreeMethod {
    type Err = VqaError;

    fn from_str(s: &str) -> VqaResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cobyla" => Ok(Self::Cobyla),
            "nelder-mead" | "nelder_mead" | "neldermead" => Ok(Self::NelderMead),
            "powell" => Ok(Self::Powell),
            _ => Err(VqaError::UnknownMethod(s.to_string())),
        }
    }
}

/// Runs one derivative-free method against a cost function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientFreeOptimizer {
    method: DerivativeFreeMethod,
}

impl GradientFreeOptimizer {
    /// Optimizer for `method`.
    pub fn new(method: DerivativeFreeMethod) -> Self {
        Self { method }
    }

    /// The configured method.
    pub fn method(&self) -> DerivativeFreeMethod {
        self.method
    }

    /// Reset `cost` and minimize it from `initial`.
    ///
    /// Never fails: evaluation errors and non-finite energies produce a result
    /// with [`OptimizerStatus::Failed`].
    pub fn optimize<C>(
        &self,
        cost: &mut C,
        initial: &[f64],
        max_iterations: usize,
        tolerance: f64,
    ) -> OptimizerResult
    where
        C: CostFunction + ?Sized,
    {
        cost.reset();
        self.run(cost, initial, max_iterations, tolerance)
    }

    /// Minimize without resetting, so several runs can share one history.
    pub(crate) fn run<C>(
        &self,
        cost: &mut C,
        initial: &[f64],
        max_iterations: usize,
        tolerance: f64,
    ) -> OptimizerResult
    where
        C: CostFunction + ?Sized,
    {
        let method = self.method.name();
        let start_evaluations = cost.evaluations();
        info!(
            method,
            parameters = initial.len(),
            max_iterations,
            tolerance,
            "Starting derivative-free optimization"
        );

        let mut evaluation = 0;
        let objective = |p: &[f64]| -> Result<f64, MinimizerError> {
            evaluation += 1;
            let energy = cost.evaluate(p)?;
            if !energy.is_finite() {
                return Err(MinimizerError::NonFinite {
                    value: energy,
                    evaluation,
                });
            }
            Ok(energy)
        };

        let outcome: Result<Minimum, MinimizerError> = match self.method {
            DerivativeFreeMethod::Cobyla => {
                Cobyla::new(max_iterations, tolerance).minimize(objective, initial)
            }
            DerivativeFreeMethod::NelderMead => {
                NelderMead::new(max_iterations, tolerance).minimize(objective, initial)
            }
            DerivativeFreeMethod::Powell => {
                Powell::new(max_iterations, tolerance).minimize(objective, initial)
            }
        };
        let evaluations = cost.evaluations() - start_evaluations;

        match outcome {
            Ok(minimum) => {
                let status = if minimum.converged {
                    OptimizerStatus::Converged
                } else {
                    OptimizerStatus::MaxIterationsReached
                };
                info!(
                    method,
                    energy = minimum.value,
                    iterations = minimum.iterations,
                    evaluations,
                    %status,
                    "Derivative-free optimization finished"
                );
                OptimizerResult {
                    message: minimum.message().to_string(),
                    optimal_parameters: minimum.point,
                    optimal_energy: minimum.value,
                    converged: minimum.converged,
                    iterations: minimum.iterations,
                    status,
                    evaluations,
                    method: method.to_string(),
                    gradient_norms: Vec::new(),
                }
            }
            Err(e) => {
                warn!(method, evaluations, error = %e, "Derivative-free optimization failed");
                OptimizerResult::failed(method, initial, evaluations, e.to_string())
            }
        }
    }
}

/// Races several derivative-free methods from the same starting point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptiveOptimizer {
    methods: Vec<DerivativeFreeMethod>,
}

impl Default for AdaptiveOptimizer {
    fn default() -> Self {
        Self {
            methods: vec![DerivativeFreeMethod::Cobyla, DerivativeFreeMethod::NelderMead],
        }
    }
}

impl AdaptiveOptimizer {
    /// Racer over `methods`, tried in order.
    pub fn new(methods: Vec<DerivativeFreeMethod>) -> VqaResult<Self> {
        if methods.is_empty() {
            return Err(VqaError::Configuration(
                "adaptive optimizer needs at least one method".to_string(),
            ));
        }
        Ok(Self { methods })
    }

    /// Methods in trial order.
    pub fn methods(&self) -> &[DerivativeFreeMethod] {
        &self.methods
    }

    /// Run every method and keep the lowest energy.
    ///
    /// The cost history is reset once, so it holds the evaluations of all
    /// methods. The first method to reach the best energy wins ties. Fails
    /// with [`VqaError::AllMethodsFailed`] only when no method succeeded.
    pub fn optimize<C>(
        &self,
        cost: &mut C,
        initial: &[f64],
        max_iterations: usize,
        tolerance: f64,
    ) -> VqaResult<OptimizerResult>
    where
        C: CostFunction + ?Sized,
    {
        cost.reset();
        let mut best: Option<OptimizerResult> = None;

        for method in &self.methods {
            let result =
                GradientFreeOptimizer::new(*method).run(cost, initial, max_iterations, tolerance);

            if !result.is_success() {
                warn!(method = %method, reason = %result.message, "Adaptive run: method failed, skipping");
                continue;
            }

            let improves = best
                .as_ref()
                .is_none_or(|b| result.optimal_energy < b.optimal_energy);
            if improves {
                best = Some(result);
            }
        }

        let mut best = best.ok_or_else(|| VqaError::AllMethodsFailed {
            methods: self.methods.iter().map(|m| m.name().to_string()).collect(),
        })?;
        info!(
            winner = %best.method,
            energy = best.optimal_energy,
            "Adaptive optimization selected best method"
        );
        best.evaluations = cost.evaluations();
        Ok(best)
    }
}
