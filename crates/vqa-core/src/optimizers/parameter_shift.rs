//! Gradient-based optimizers using the parameter-shift rule.
//!
//! For a circuit whose energy depends on `θ_i` through a single rotation,
//!
//!   ∂E/∂θ_i = [E(θ + s·e_i) − E(θ − s·e_i)] / (2 sin s)
//!
//! holds exactly. With the default `s = π/2` the denominator is 2.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{MSG_CONVERGED, MSG_MAX_ITERATIONS, OptimizerResult, OptimizerStatus};
use crate::cost::CostFunction;
use crate::error::{VqaError, VqaResult};

/// Log progress every this many iterations.
const LOG_EVERY: usize = 10;

/// Analytic gradient estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterShift {
    shift: f64,
}

impl Default for ParameterShift {
    fn default() -> Self {
        Self { shift: FRAC_PI_2 }
    }
}

impl ParameterShift {
    /// Estimator with shift `s`. Rejects shifts where `sin s` vanishes.
    pub fn new(shift: f64) -> VqaResult<Self> {
        if !shift.is_finite() || shift.sin().abs() < 1e-12 {
            return Err(VqaError::Configuration(format!(
                "parameter shift {shift} has sin(s) = 0"
            )));
        }
        Ok(Self { shift })
    }

    /// The shift `s`.
    pub fn shift(&self) -> f64 {
        self.shift
    }

    /// Gradient of `cost` at `theta`, using exactly `2 × theta.len()` evaluations.
    pub fn gradient<C>(&self, cost: &mut C, theta: &[f64]) -> VqaResult<Vec<f64>>
    where
        C: CostFunction + ?Sized,
    {
        self.gradient_with(|p| cost.evaluate(p), theta)
    }

    /// Gradient of an arbitrary energy function. Each shifted point is a fresh copy of `theta`.
    pub fn gradient_with<F>(&self, mut energy: F, theta: &[f64]) -> VqaResult<Vec<f64>>
    where
        F: FnMut(&[f64]) -> VqaResult<f64>,
    {
        let denom = 2.0 * self.shift.sin();
        (0..theta.len())
            .map(|i| {
                let mut plus = theta.to_vec();
                plus[i] += self.shift;
                let mut minus = theta.to_vec();
                minus[i] -= self.shift;
                Ok((energy(&plus)? - energy(&minus)?) / denom)
            })
            .collect()
    }
}

/// Plain gradient descent: `θ ← θ − lr·∇E`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientDescent {
    /// Step size.
    pub learning_rate: f64,
    /// Gradient estimator.
    pub shift: ParameterShift,
}

impl Default for GradientDescent {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            shift: ParameterShift::default(),
        }
    }
}

impl GradientDescent {
    /// Descent with the given learning rate and the default shift.
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            ..Self::default()
        }
    }

    /// Reset `cost` and descend from `initial`.
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
        let lr = self.learning_rate;
        descend(
            "GradientDescent",
            &self.shift,
            cost,
            initial,
            max_iterations,
            tolerance,
            |_, theta, grad| {
                for (t, g) in theta.iter_mut().zip(grad) {
                    *t -= lr * g;
                }
            },
        )
    }
}

/// Adam: bias-corrected first and second moment estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adam {
    /// Step size.
    pub learning_rate: f64,
    /// First-moment decay.
    pub beta1: f64,
    /// Second-moment decay.
    pub beta2: f64,
    /// Denominator guard.
    pub epsilon: f64,
    /// Gradient estimator.
    pub shift: ParameterShift,
}

impl Default for Adam {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            shift: ParameterShift::default(),
        }
    }
}

impl Adam {
    /// Adam with the given learning rate and default moments.
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            ..Self::default()
        }
    }

    /// Reset `cost` and run Adam from `initial`.
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
        let n = initial.len();
        let mut m = vec![0.0; n];
        let mut v = vec![0.0; n];
        let Adam {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            ..
        } = *self;

        descend(
            "Adam",
            &self.shift,
            cost,
            initial,
            max_iterations,
            tolerance,
            |iteration, theta, grad| {
                let t = (iteration + 1) as i32;
                let m_correction = 1.0 - beta1.powi(t);
                let v_correction = 1.0 - beta2.powi(t);
                for i in 0..theta.len() {
                    m[i] = beta1 * m[i] + (1.0 - beta1) * grad[i];
                    v[i] = beta2 * v[i] + (1.0 - beta2) * grad[i] * grad[i];
                    let m_hat = m[i] / m_correction;
                    let v_hat = v[i] / v_correction;
                    theta[i] -= learning_rate * m_hat / (v_hat.sqrt() + epsilon);
                }
            },
        )
    }
}

/// Either gradient-based optimizer, as configured on a VQE driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GradientOptimizer {
    /// Plain descent.
    Descent(GradientDescent),
    /// Adam.
    Adam(Adam),
}

impl GradientOptimizer {
    /// Method name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Descent(_) => "GradientDescent",
            Self::Adam(_) => "Adam",
        }
    }

    /// Gradient estimator in use.
    pub fn shift(&self) -> &ParameterShift {
        match self {
            Self::Descent(gd) => &gd.shift,
            Self::Adam(adam) => &adam.shift,
        }
    }

    /// Reset `cost` and optimize from `initial`.
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
        match self {
            Self::Descent(gd) => gd.optimize(cost, initial, max_iterations, tolerance),
            Self::Adam(adam) => adam.optimize(cost, initial, max_iterations, tolerance),
        }
    }
}

impl From<GradientDescent> for GradientOptimizer {
    fn from(gd: GradientDescent) -> Self {
        Self::Descent(gd)
    }
}

impl From<Adam> for GradientOptimizer {
    fn from(adam: Adam) -> Self {
        Self::Adam(adam)
    }
}

/// Shared loop: evaluate, differentiate, test convergence, update.
fn descend<C, U>(
    method: &str,
    shift: &ParameterShift,
    cost: &mut C,
    initial: &[f64],
    max_iterations: usize,
    tolerance: f64,
    mut update: U,
) -> VqaResult<OptimizerResult>
where
    C: CostFunction + ?Sized,
    U: FnMut(usize, &mut [f64], &[f64]),
{
    cost.reset();
    info!(
        method,
        parameters = initial.len(),
        max_iterations,
        tolerance,
        "Starting gradient optimization"
    );

    let mut theta = initial.to_vec();
    let mut gradient_norms = Vec::new();
    let mut status = OptimizerStatus::Running;
    let mut iterations = 0;

    for iteration in 0..max_iterations {
        iterations = iteration + 1;
        let energy = cost.evaluate(&theta)?;
        let grad = shift.gradient(cost, &theta)?;
        let norm = grad.iter().map(|g| g * g).sum::<f64>().sqrt();
        gradient_norms.push(norm);

        if iteration % LOG_EVERY == 0 {
            info!(method, iteration, energy, gradient_norm = norm, "Gradient step");
        }

        if !energy.is_finite() || !norm.is_finite() {
            warn!(method, iteration, energy, gradient_norm = norm, "Non-finite energy or gradient");
            status = OptimizerStatus::Failed;
            break;
        }
        if norm < tolerance {
            info!(method, iteration, "Converged");
            status = OptimizerStatus::Converged;
            break;
        }

        update(iteration, &mut theta, &grad);
    }

    let final_energy = cost.evaluate(&theta)?;
    if status == OptimizerStatus::Running {
        status = OptimizerStatus::MaxIterationsReached;
    }
    if !final_energy.is_finite() {
        status = OptimizerStatus::Failed;
    }

    let message = match status {
        OptimizerStatus::Converged => MSG_CONVERGED.to_string(),
        OptimizerStatus::Failed => "Non-finite energy or gradient encountered".to_string(),
        _ => MSG_MAX_ITERATIONS.to_string(),
    };
    info!(method, energy = final_energy, iterations, %status, "Gradient optimization finished");

    Ok(OptimizerResult {
        optimal_parameters: theta,
        optimal_energy: final_energy,
        converged: status == OptimizerStatus::Converged,
        iterations,
        message,
        status,
        evaluations: cost.evaluations(),
        method: method.to_string(),
        gradient_norms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::FnCost;

    #[test]
    fn test_gradient_of_cosine() {
        // E(θ) = cos θ0 + 2 sin θ1 ⇒ ∇E = (-sin θ0, 2 cos θ1)
        let mut cost = FnCost::new(|p: &[f64]| p[0].cos() + 2.0 * p[1].sin());
        let theta = [0.3, -1.1];
        let grad = ParameterShift::default().gradient(&mut cost, &theta).unwrap();
        assert!((grad[0] + 0.3f64.sin()).abs() < 1e-12);
        assert!((grad[1] - 2.0 * (-1.1f64).cos()).abs() < 1e-12);
        assert_eq!(cost.evaluations(), 4);
    }

    #[test]
    fn test_shifted_points_are_copies() {
        let mut cost = FnCost::new(|p: &[f64]| p.iter().sum());
        let theta = vec![0.0, 0.0];
        ParameterShift::default().gradient(&mut cost, &theta).unwrap();
        assert_eq!(theta, vec![0.0, 0.0]);
        let points: Vec<_> = cost.trace().entries().iter().map(|e| e.parameters.clone()).collect();
        assert_eq!(points[0], vec![FRAC_PI_2, 0.0]);
        assert_eq!(points[1], vec![-FRAC_PI_2, 0.0]);
        assert_eq!(points[3], vec![0.0, -FRAC_PI_2]);
    }

    #[test]
    fn test_zero_sine_shift_rejected() {
        assert!(ParameterShift::new(0.0).is_err());
        assert!(ParameterShift::new(std::f64::consts::PI).is_err());
        assert!(ParameterShift::new(0.4).is_ok());
    }

    #[test]
    fn test_descent_on_cosine() {
        let mut cost = FnCost::new(|p: &[f64]| p[0].cos());
        let result = GradientDescent::new(0.5)
            .optimize(&mut cost, &[0.5], 500, 1e-6)
            .unwrap();
        assert!(result.converged);
        assert!((result.optimal_energy + 1.0).abs() < 1e-9);
        assert_eq!(result.gradient_norms.len(), result.iterations);
    }

    #[test]
    fn test_adam_flat_cost_stays_finite() {
        let mut cost = FnCost::new(|_: &[f64]| 1.0);
        let result = Adam::default()
            .optimize(&mut cost, &[0.2, -0.4], 5, 0.0)
            .unwrap();
        assert_eq!(result.optimal_parameters, vec![0.2, -0.4]);
        assert!(result.optimal_energy.is_finite());
        assert_eq!(result.status, OptimizerStatus::MaxIterationsReached);
    }

    #[test]
    fn test_nan_reported_as_failed() {
        let mut cost = FnCost::new(|p: &[f64]| if p[0] < 0.0 { f64::NAN } else { p[0].sin() });
        let result = GradientDescent::new(0.1)
            .optimize(&mut cost, &[0.1], 20, 1e-9)
            .unwrap();
        assert_eq!(result.status, OptimizerStatus::Failed);
        assert!(!result.converged);
    }
}
