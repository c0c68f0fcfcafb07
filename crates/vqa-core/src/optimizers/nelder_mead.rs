//! Nelder-Mead downhill simplex minimizer.

use super::{Minimum, MinimizerError, argmin};

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Nelder-Mead settings.
#[derive(Debug, Clone)]
pub(crate) struct NelderMead {
    /// Maximum number of iterations.
    pub maxiter: usize,
    /// Tolerance on the spread of simplex values.
    pub ftol: f64,
    /// Tolerance on the simplex diameter (max-norm).
    pub xtol: f64,
    /// Edge length of the initial simplex.
    pub initial_step: f64,
}

impl NelderMead {
    pub(crate) fn new(maxiter: usize, ftol: f64) -> Self {
        Self {
            maxiter,
            ftol,
            xtol: 1e-4,
            initial_step: 0.5,
        }
    }

    pub(crate) fn minimize<F>(&self, mut objective: F, initial: &[f64]) -> Result<Minimum, MinimizerError>
    where
        F: FnMut(&[f64]) -> Result<f64, MinimizerError>,
    {
        let n = initial.len();
        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
        simplex.push(initial.to_vec());
        for i in 0..n {
            let mut point = initial.to_vec();
            point[i] += self.initial_step;
            simplex.push(point);
        }
        let mut values = simplex
            .iter()
            .map(|p| objective(p))
            .collect::<Result<Vec<f64>, _>>()?;

        let mut converged = false;
        let mut iterations = 0;

        for _ in 0..self.maxiter {
            iterations += 1;

            // Keep vertices sorted best to worst
            let mut order: Vec<usize> = (0..=n).collect();
            order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
            simplex = order.iter().map(|&i| simplex[i].clone()).collect();
            values = order.iter().map(|&i| values[i]).collect();

            let spread = values[n] - values[0];
            let diameter = simplex[1..]
                .iter()
                .flat_map(|p| p.iter().zip(&simplex[0]).map(|(a, b)| (a - b).abs()))
                .fold(0.0, f64::max);
            if spread <= self.ftol && diameter <= self.xtol {
                converged = true;
                break;
            }

            let mut centroid = vec![0.0; n];
            for point in &simplex[..n] {
                for (c, x) in centroid.iter_mut().zip(point) {
                    *c += x;
                }
            }
            centroid.iter_mut().for_each(|c| *c /= n as f64);

            let worst = simplex[n].clone();
            let along = |t: f64| -> Vec<f64> {
                centroid
                    .iter()
                    .zip(&worst)
                    .map(|(c, w)| c + t * (c - w))
                    .collect()
            };

            let reflected = along(REFLECTION);
            let f_reflected = objective(&reflected)?;

            if f_reflected < values[0] {
                let expanded = along(EXPANSION);
                let f_expanded = objective(&expanded)?;
                if f_expanded < f_reflected {
                    simplex[n] = expanded;
                    values[n] = f_expanded;
                } else {
                    simplex[n] = reflected;
                    values[n] = f_reflected;
                }
                continue;
            }

            if f_reflected < values[n - 1] {
                simplex[n] = reflected;
                values[n] = f_reflected;
                continue;
            }

            // Outside contraction if the reflection beat the worst vertex, inside otherwise
            let (contracted, f_contracted, accept) = if f_reflected < values[n] {
                let point = along(CONTRACTION);
                let f = objective(&point)?;
                (point, f, f <= f_reflected)
            } else {
                let point = along(-CONTRACTION);
                let f = objective(&point)?;
                (point, f, f < values[n])
            };

            if accept {
                simplex[n] = contracted;
                values[n] = f_contracted;
            } else {
                let anchor = simplex[0].clone();
                for i in 1..=n {
                    for (x, a) in simplex[i].iter_mut().zip(&anchor) {
                        *x = a + SHRINK * (*x - a);
                    }
                    values[i] = objective(&simplex[i])?;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic() {
        let nm = NelderMead::new(500, 1e-10);
        let result = nm
            .minimize(
                |x| Ok((x[0] - 1.0).powi(2) + (x[1] - 2.0).powi(2)),
                &[0.0, 0.0],
            )
            .unwrap();
        assert!(result.converged);
        assert!((result.point[0] - 1.0).abs() < 1e-3);
        assert!((result.point[1] - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_rosenbrock() {
        let nm = NelderMead::new(2000, 1e-12);
        let result = nm
            .minimize(
                |x| {
                    let a = 1.0 - x[0];
                    let b = x[1] - x[0] * x[0];
                    Ok(a * a + 100.0 * b * b)
                },
                &[-1.2, 1.0],
            )
            .unwrap();
        assert!(result.value < 1e-6);
    }

    #[test]
    fn test_respects_max_iterations() {
        let nm = NelderMead::new(3, 1e-12);
        let result = nm
            .minimize(|x| Ok(x.iter().map(|v| v * v).sum()), &[5.0, 5.0, 5.0])
            .unwrap();
        assert!(!result.converged);
        assert_eq!(result.iterations, 3);
    }
}
