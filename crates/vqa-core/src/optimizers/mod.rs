//! Classical optimizers for the variational loop.
//!
//! Two families are provided:
//!
//! - **Derivative-free**: COBYLA-style trust-region simplex, Nelder-Mead and
//!   Powell, driven by [`GradientFreeOptimizer`], plus an
//!   [`AdaptiveOptimizer`] that races several of them from the same start.
//! - **Gradient-based**: plain descent and Adam, both fed by exact
//!   parameter-shift gradients ([`ParameterShift`]).
//!
//! Every optimizer reports an [`OptimizerResult`]. Derivative-free runs never
//! return `Err`: a failing minimizer yields a result with
//! [`OptimizerStatus::Failed`].

mod cobyla;
mod gradient_free;
mod nelder_mead;
mod parameter_shift;
mod powell;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::VqaError;

pub use gradient_free::{AdaptiveOptimizer, DerivativeFreeMethod, GradientFreeOptimizer};
pub use parameter_shift::{Adam, GradientDescent, GradientOptimizer, ParameterShift};

/// Message reported when the convergence test passed.
pub const MSG_CONVERGED: &str = "Optimization converged";
/// Message reported when the iteration budget ran out.
pub const MSG_MAX_ITERATIONS: &str = "Maximum iterations reached";

/// Lifecycle of an optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerStatus {
    /// Configured, not started.
    Initialized,
    /// Iterating.
    Running,
    /// Convergence test passed.
    Converged,
    /// Stopped by the iteration budget.
    MaxIterationsReached,
    /// Aborted by an evaluation failure or a non-finite energy.
    Failed,
}

impl OptimizerStatus {
    /// True for the three final states.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Converged | Self::MaxIterationsReached | Self::Failed
        )
    }
}

impl fmt::Display for OptimizerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Initialized => "initialized",
            Self::Running => "running",
            Self::Converged => "converged",
            Self::MaxIterationsReached => "max iterations reached",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Outcome of an optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerResult {
    /// Best parameters found.
    pub optimal_parameters: Vec<f64>,
    /// Energy at `optimal_parameters`. NaN when the run failed before any
    /// usable evaluation.
    pub optimal_energy: f64,
    /// Whether the convergence test passed.
    pub converged: bool,
    /// Optimizer iterations performed.
    pub iterations: usize,
    /// Human-readable termination reason.
    pub message: String,
    /// Final state.
    pub status: OptimizerStatus,
    /// Cost evaluations performed.
    pub evaluations: usize,
    /// Method that produced the result.
    pub method: String,
    /// Gradient norm per iteration (gradient-based methods only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gradient_norms: Vec<f64>,
}

impl OptimizerResult {
    /// A failed run starting from `initial`.
    pub(crate) fn failed(method: &str, initial: &[f64], evaluations: usize, message: String) -> Self {
        Self {
            optimal_parameters: initial.to_vec(),
            optimal_energy: f64::NAN,
            converged: false,
            iterations: 0,
            message,
            status: OptimizerStatus::Failed,
            evaluations,
            method: method.to_string(),
            gradient_norms: Vec::new(),
        }
    }

    /// True unless the run failed.
    pub fn is_success(&self) -> bool {
        self.status != OptimizerStatus::Failed
    }
}

/// Failure inside a derivative-free minimizer.
#[derive(Debug, Error)]
pub(crate) enum MinimizerError {
    /// The cost function returned an error.
    #[error("cost evaluation failed: {0}")]
    Cost(#[from] VqaError),

    /// The cost function returned NaN or infinity.
    #[error("objective returned non-finite value {value} at evaluation {evaluation}")]
    NonFinite { value: f64, evaluation: usize },
}

/// Raw output of a derivative-free minimizer.
#[derive(Debug, Clone)]
pub(crate) struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
    pub converged: bool,
    pub iterations: usize,
}

impl Minimum {
    pub(crate) fn message(&self) -> &'static str {
        if self.converged {
            MSG_CONVERGED
        } else {
            MSG_MAX_ITERATIONS
        }
    }
}

/// Index of the smallest value; the earliest index wins ties.
pub(crate) fn argmin(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(bi, bv), (i, &v)| {
            if v < bv { (i, v) } else { (bi, bv) }
        })
        .0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmin_first_wins() {
        assert_eq!(argmin(&[3.0, 1.0, 1.0, 2.0]), 1);
        assert_eq!(argmin(&[0.0]), 0);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!OptimizerStatus::Running.is_terminal());
        assert!(OptimizerStatus::Failed.is_terminal());
        assert_eq!(
            OptimizerStatus::MaxIterationsReached.to_string(),
            "max iterations reached"
        );
    }
}
