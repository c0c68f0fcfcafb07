//! Transverse-field Ising chain.
//!
//!   H = -J · Σ_(i,j) Z_i Z_j  -  h · Σ_i X_i
//!
//! Coupled pairs are `(i, i+1)` for `i in 0..n-1`; periodic boundaries add
//! `(n-1, 0)`. A two-spin ring therefore couples `(0, 1)` twice.

use std::fmt;

use ndarray::Array2;
use tracing::debug;

use crate::error::{VqaError, VqaResult};
use crate::exact;
use crate::hamiltonian::{Hamiltonian, HamiltonianTerm};

/// Transverse-field Ising model on a chain.
#[derive(Debug, Clone)]
pub struct IsingModel {
    num_qubits: usize,
    j: f64,
    h: f64,
    periodic: bool,
    hamiltonian: Hamiltonian,
}

impl IsingModel {
    /// Build the model. Requires at least two spins.
    pub fn new(num_qubits: usize, j: f64, h: f64, periodic: bool) -> VqaResult<Self> {
        if num_qubits < 2 {
            return Err(VqaError::InvalidModel(format!(
                "Ising chain needs at least 2 qubits, got {num_qubits}"
            )));
        }
        if !j.is_finite() || !h.is_finite() {
            return Err(VqaError::InvalidModel(format!(
                "Ising couplings must be finite (J={j}, h={h})"
            )));
        }

        let pairs = coupled_pairs(num_qubits, periodic);
        let mut terms: Vec<HamiltonianTerm> = pairs
            .iter()
            .map(|&(a, b)| HamiltonianTerm::zz(a, b, -j))
            .collect();
        terms.extend((0..num_qubits).map(|q| HamiltonianTerm::x(q, -h)));

        let hamiltonian = Hamiltonian::new(num_qubits, terms)?;
        Ok(Self {
            num_qubits,
            j,
            h,
            periodic,
            hamiltonian,
        })
    }

    /// Number of spins.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// ZZ coupling strength.
    pub fn j(&self) -> f64 {
        self.j
    }

    /// Transverse field strength.
    pub fn h(&self) -> f64 {
        self.h
    }

    /// Whether the chain closes into a ring.
    pub fn periodic(&self) -> bool {
        self.periodic
    }

    /// The Hamiltonian built at construction.
    pub fn hamiltonian(&self) -> &Hamiltonian {
        &self.hamiltonian
    }

    /// An owned copy of the Hamiltonian.
    pub fn build(&self) -> Hamiltonian {
        self.hamiltonian.clone()
    }

    /// The coupled `(i, j)` pairs.
    pub fn coupled_pairs(&self) -> Vec<(usize, usize)> {
        coupled_pairs(self.num_qubits, self.periodic)
    }

    /// Energy of the fully aligned classical configuration: `-J × pairs`.
    pub fn classical_ground_state_energy(&self) -> f64 {
        -self.j * self.coupled_pairs().len() as f64
    }

    /// Smallest eigenvalue of the explicitly assembled `2^n × 2^n` matrix.
    pub fn exact_diagonalization_energy(&self) -> VqaResult<f64> {
        exact::check_width(self.num_qubits)?;
        let dim = 1usize << self.num_qubits;
        let pairs = self.coupled_pairs();
        let mut m = Array2::<f64>::zeros((dim, dim));

        for state in 0..dim {
            let spin = |q: usize| 1.0 - 2.0 * ((state >> q) & 1) as f64;
            m[[state, state]] = pairs
                .iter()
                .map(|&(a, b)| -self.j * spin(a) * spin(b))
                .sum();
            for q in 0..self.num_qubits {
                m[[state ^ (1 << q), state]] += -self.h;
            }
        }

        let energy = exact::lowest_eigenvalue_symmetric(&m)?;
        debug!(
            num_qubits = self.num_qubits,
            energy, "Ising exact diagonalization"
        );
        Ok(energy)
    }
}

impl fmt::Display for IsingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IsingModel(num_qubits={}, J={}, h={}, periodic={})",
            self.num_qubits, self.j, self.h, self.periodic
        )
    }
}

fn coupled_pairs(num_qubits: usize, periodic: bool) -> Vec<(usize, usize)> {
    let mut pairs: Vec<(usize, usize)> = (0..num_qubits.saturating_sub(1))
        .map(|i| (i, i + 1))
        .collect();
    if periodic {
        pairs.push((num_qubits - 1, 0));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_pair_counts() {
        assert_eq!(IsingModel::new(4, 1.0, 0.5, true).unwrap().coupled_pairs().len(), 4);
        assert_eq!(IsingModel::new(4, 1.0, 0.5, false).unwrap().coupled_pairs().len(), 3);
        // A two-spin ring keeps its wrap-around bond.
        assert_eq!(
            IsingModel::new(2, 1.0, 0.5, true).unwrap().coupled_pairs(),
            vec![(0, 1), (1, 0)]
        );
    }

    #[test]
    fn test_term_count() {
        let model = IsingModel::new(5, 1.0, 0.3, true).unwrap();
        assert_eq!(model.hamiltonian().n_terms(), 5 + 5);
    }

    #[test]
    fn test_rejects_single_spin() {
        assert!(matches!(
            IsingModel::new(1, 1.0, 0.5, false),
            Err(VqaError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_two_spin_ring_doubles_coupling() {
        let model = IsingModel::new(2, 1.5, 0.0, true).unwrap();
        assert_eq!(model.hamiltonian().n_terms(), 2 + 2);
        assert_abs_diff_eq!(model.classical_ground_state_energy(), -3.0);
        assert_abs_diff_eq!(model.exact_diagonalization_energy().unwrap(), -3.0, epsilon = 1e-10);
        assert_abs_diff_eq!(
            model.hamiltonian().exact_ground_energy().unwrap(),
            -3.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_two_spin_open_chain() {
        // -ZZ - 0.5(X0 + X1): ground energy is -√2.
        let model = IsingModel::new(2, 1.0, 0.5, false).unwrap();
        assert_abs_diff_eq!(
            model.exact_diagonalization_energy().unwrap(),
            -std::f64::consts::SQRT_2,
            epsilon = 1e-10
        );
    }
}
