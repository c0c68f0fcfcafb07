//! Powell's conjugate-direction minimizer.
//!
//! Each iteration line-searches along every direction of the set, then along
//! the net displacement of the sweep, which replaces the direction that gave
//! the largest decrease. Line searches bracket a minimum by golden-ratio
//! expansion and refine it by golden-section search.

use super::{Minimum, MinimizerError};

const GOLDEN: f64 = 0.618_033_988_749_894_8;
const GROWTH: f64 = 1.618_033_988_749_895;
const MAX_BRACKET_STEPS: usize = 50;
const LINE_TOL: f64 = 1e-8;
const LINE_MAX_STEPS: usize = 100;
const TINY: f64 = 1e-20;

/// Powell settings.
#[derive(Debug, Clone)]
pub(crate) struct Powell {
    /// Maximum number of sweeps.
    pub maxiter: usize,
    /// Relative decrease tolerance.
    pub ftol: f64,
    /// Initial line-search step.
    pub step: f64,
}

impl Powell {
    pub(crate) fn new(maxiter: usize, ftol: f64) -> Self {
        Self {
            maxiter,
            ftol,
            step: 1.0,
        }
    }

    pub(crate) fn minimize<F>(&self, mut objective: F, initial: &[f64]) -> Result<Minimum, MinimizerError>
    where
        F: FnMut(&[f64]) -> Result<f64, MinimizerError>,
    {
        let n = initial.len();
        let mut x = initial.to_vec();
        let mut fx = objective(&x)?;
        let mut directions: Vec<Vec<f64>> = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect();

        let mut converged = false;
        let mut iterations = 0;

        for _ in 0..self.maxiter {
            iterations += 1;
            let f_start = fx;
            let x_start = x.clone();
            let mut biggest_drop = 0.0;
            let mut biggest_idx = 0;

            for (i, dir) in directions.iter().enumerate() {
                let f_before = fx;
                let (t, ft) = self.line_minimize(&mut objective, &x, dir, fx)?;
                if ft < fx {
                    step_along(&mut x, dir, t);
                    fx = ft;
                }
                if f_before - fx > biggest_drop {
                    biggest_drop = f_before - fx;
                    biggest_idx = i;
                }
            }

            if 2.0 * (f_start - fx) <= self.ftol * (f_start.abs() + fx.abs()) + TINY {
                converged = true;
                break;
            }

            let displacement: Vec<f64> = x.iter().zip(&x_start).map(|(a, b)| a - b).collect();
            if displacement.iter().any(|d| *d != 0.0) {
                let (t, ft) = self.line_minimize(&mut objective, &x, &displacement, fx)?;
                if ft < fx {
                    step_along(&mut x, &displacement, t);
                    fx = ft;
                }
                directions.remove(biggest_idx);
                directions.push(displacement);
            }
        }

        Ok(Minimum {
            point: x,
            value: fx,
            converged,
            iterations,
        })
    }

    /// Minimize `t ↦ f(x + t·d)`, returning the best `(t, f)` found.
    fn line_minimize<F>(
        &self,
        objective: &mut F,
        x: &[f64],
        dir: &[f64],
        fx: f64,
    ) -> Result<(f64, f64), MinimizerError>
    where
        F: FnMut(&[f64]) -> Result<f64, MinimizerError>,
    {
        let mut along = |t: f64| -> Result<f64, MinimizerError> {
            let point: Vec<f64> = x.iter().zip(dir).map(|(xi, di)| xi + t * di).collect();
            objective(&point)
        };

        let (mut a, mut b) = (0.0, self.step);
        let mut fb = along(b)?;
        if fb > fx {
            b = -self.step;
            fb = along(b)?;
            if fb > fx {
                return golden_section(&mut along, -self.step, self.step);
            }
        }

        // Walk downhill until the function turns up again
        let mut c = b + GROWTH * (b - a);
        let mut fc = along(c)?;
        let mut steps = 0;
        while fc < fb && steps < MAX_BRACKET_STEPS {
            a = b;
            b = c;
            fb = fc;
            c = b + GROWTH * (b - a);
            fc = along(c)?;
            steps += 1;
        }
        golden_section(&mut along, a.min(c), a.max(c))
    }
}

fn golden_section<G>(g: &mut G, mut lo: f64, mut hi: f64) -> Result<(f64, f64), MinimizerError>
where
    G: FnMut(f64) -> Result<f64, MinimizerError>,
{
    let mut x1 = hi - GOLDEN * (hi - lo);
    let mut x2 = lo + GOLDEN * (hi - lo);
    let mut f1 = g(x1)?;
    let mut f2 = g(x2)?;

    for _ in 0..LINE_MAX_STEPS {
        if (hi - lo).abs() <= LINE_TOL * (1.0 + x1.abs() + x2.abs()) {
            break;
        }
        if f1 < f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - GOLDEN * (hi - lo);
            f1 = g(x1)?;
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + GOLDEN * (hi - lo);
            f2 = g(x2)?;
        }
    }
    Ok(if f1 < f2 { (x1, f1) } else { (x2, f2) })
}

fn step_along(x: &mut [f64], dir: &[f64], t: f64) {
    for (xi, di) in x.iter_mut().zip(dir) {
        *xi += t * di;
    }
}
