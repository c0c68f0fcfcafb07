//! COBYLA-style trust-region simplex minimizer.
//!
//! A simplex of `n + 1` points is moved by reflection, expansion, contraction
//! and shrink steps, with every reflection clipped to a trust radius `rho`.
//! When the simplex values agree to within `tol`, `rho` is halved and the
//! simplex is rebuilt around the best point; the run converges once the
//! values agree and `rho` has reached `rhoend`.

use super::{Minimum, MinimizerError, argmin};

/// Trust-region simplex settings.
#[derive(Debug, Clone)]
pub(crate) struct Cobyla {
    /// Maximum number of iterations.
    pub maxiter: usize,
    /// Tolerance on the spread of simplex values.
    pub tol: f64,
    /// Initial trust radius.
    pub rhobeg: f64,
    /// Final trust radius.
    pub rhoend: f64,
}

impl Default for Cobyla {
    fn default() -> Self {
        Self {
            maxiter: 100,
            tol: 1e-6,
            rhobeg: 0.5,
            rhoend: 1e-4,
        }
    }
}

impl Cobyla {
    pub(crate) fn new(maxiter: usize, tol: f64) -> Self {
        Self {
            maxiter,
            tol,
            ..Self::default()
        }
    }

    pub(crate) fn minimize<F>(&self, mut objective: F, initial: &[f64]) -> Result<Minimum, MinimizerError>
    where
        F: FnMut(&[f64]) -> Result<f64, MinimizerError>,
    {
        let n = initial.len();
        let (mut simplex, mut values) = axis_simplex(&mut objective, initial, self.rhobeg)?;

        let mut rho = self.rhobeg;
        let mut converged = false;
        let mut iterations = 0;

        for _ in 0..self.maxiter {
            iterations += 1;

            let mut order: Vec<usize> = (0..=n).collect();
            order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
            let best = order[0];
            let worst = order[n];

            let spread = values[worst] - values[best];
            if spread < self.tol && rho <= self.rhoend {
                converged = true;
                break;
            }

            if spread < self.tol {
                rho = (rho * 0.5).max(self.rhoend);
                let center = simplex[best].clone();
                (simplex, values) = axis_simplex(&mut objective, &center, rho)?;
                continue;
            }

            let mut centroid = vec![0.0; n];
            for &idx in &order[..n] {
                for (c, x) in centroid.iter_mut().zip(&simplex[idx]) {
                    *c += x;
                }
            }
            centroid.iter_mut().for_each(|c| *c /= n as f64);

            // Reflection, clipped to the trust radius per coordinate
            let reflected: Vec<f64> = centroid
                .iter()
                .zip(&simplex[worst])
                .map(|(c, w)| {
                    let step = c - w;
                    if step.abs() > rho {
                        c + rho * step.signum()
                    } else {
                        c + step
                    }
                })
                .collect();
            let f_reflected = objective(&reflected)?;

            if f_reflected < values[best] {
                let expanded: Vec<f64> = centroid
                    .iter()
                    .zip(&reflected)
                    .map(|(c, r)| c + 2.0 * (r - c))
                    .collect();
                let f_expanded = objective(&expanded)?;

                if f_expanded < f_reflected {
                    simplex[worst] = expanded;
                    values[worst] = f_expanded;
                } else {
                    simplex[worst] = reflected;
                    values[worst] = f_reflected;
                }
            } else if f_reflected < values[order[n - 1]] {
                simplex[worst] = reflected;
                values[worst] = f_reflected;
            } else {
                let contracted: Vec<f64> = centroid
                    .iter()
                    .zip(&simplex[worst])
                    .map(|(c, w)| 0.5 * (c + w))
                    .collect();
                let f_contracted = objective(&contracted)?;

                if f_contracted < values[worst] {
                    simplex[worst] = contracted;
                    values[worst] = f_contracted;
                } else {
                    let anchor = simplex[best].clone();
                    for i in (0..=n).filter(|&i| i != best) {
                        for (x, a) in simplex[i].iter_mut().zip(&anchor) {
                            *x = 0.5 * (a + *x);
                        }
                        values[i] = objective(&simplex[i])?;
                    }
                }
            }
        }

        let best = argmin(&values);
        Ok(Minimum {
            point: simplex.swap_remove(best),
            value: values[best],
            converged,
            iterations,
        })
    }
}

/// `center` plus one point displaced by `step` along each axis.
fn axis_simplex<F>(
    objective: &mut F,
    center: &[f64],
    step: f64,
) -> Result<(Vec<Vec<f64>>, Vec<f64>), MinimizerError>
where
    F: FnMut(&[f64]) -> Result<f64, MinimizerError>,
{
    let n = center.len();
    let mut simplex = Vec::with_capacity(n + 1);
    let mut values = Vec::with_capacity(n + 1);

    values.push(objective(center)?);
    simplex.push(center.to_vec());
    for i in 0..n {
        let mut point = center.to_vec();
        point[i] += step;
        values.push(objective(&point)?);
        simplex.push(point);
    }
    Ok((simplex, values))
}
