//! Minimal qubit Hamiltonian for molecular hydrogen.
//!
//! Five Pauli terms over four qubits (`I`, `Z0`, `Z1`, `Z0 Z1`, `X0 X1`) with
//! coefficients tabulated per basis set at the 0.74 Å equilibrium geometry.
//! The tabulated point is used for every bond distance; only the fallback
//! reference energy depends on the distance.

use std::fmt;

use tracing::warn;

use crate::error::{VqaError, VqaResult};
use crate::hamiltonian::{Hamiltonian, HamiltonianTerm};

/// Register width of the H2 qubit Hamiltonian.
pub const H2_NUM_QUBITS: usize = 4;

/// Equilibrium bond distance of the coefficient table, in Å.
pub const EQUILIBRIUM_DISTANCE: f64 = 0.74;

/// Tabulated ground-state energy at equilibrium, in Hartree.
pub const EQUILIBRIUM_ENERGY: f64 = -1.137_283_832_434_520_5;

/// Pauli coefficients `[I, Z0, Z1, Z0Z1, X0X1]` for a basis set.
fn coefficient_table(basis: &str) -> Option<[f64; 5]> {
    match basis.to_ascii_lowercase().as_str() {
        "sto-3g" | "sto3g" => Some([
            0.713_753_993_687_641_7,
            0.181_288_808_211_492_04,
            0.181_288_808_211_492_04,
            0.177_712_874_651_399_46,
            0.045_322_202_052_873_95,
        ]),
        _ => None,
    }
}

/// External quantum-chemistry code that can supply reference energies.
pub trait ElectronicStructureSolver: Send + Sync {
    /// Ground-state electronic energy at the given geometry.
    fn ground_state_energy(&self, bond_distance: f64, basis: &str) -> VqaResult<f64>;
}

/// H2 at a given bond distance and basis set.
pub struct H2Molecule {
    bond_distance: f64,
    basis: String,
    hamiltonian: Hamiltonian,
    solver: Option<Box<dyn ElectronicStructureSolver>>,
}

impl H2Molecule {
    /// Build the molecule's qubit Hamiltonian.
    pub fn new(bond_distance: f64, basis: &str) -> VqaResult<Self> {
        if !(bond_distance.is_finite() && bond_distance > 0.0) {
            return Err(VqaError::InvalidModel(format!(
                "bond distance must be positive, got {bond_distance}"
            )));
        }
        let [c_i, c_z0, c_z1, c_zz, c_xx] = coefficient_table(basis)
            .ok_or_else(|| VqaError::UnsupportedBasis(basis.to_string()))?;

        let hamiltonian = Hamiltonian::new(
            H2_NUM_QUBITS,
            vec![
                HamiltonianTerm::constant(c_i),
                HamiltonianTerm::z(0, c_z0),
                HamiltonianTerm::z(1, c_z1),
                HamiltonianTerm::zz(0, 1, c_zz),
                HamiltonianTerm::xx(0, 1, c_xx),
            ],
        )?;

        Ok(Self {
            bond_distance,
            basis: basis.to_string(),
            hamiltonian,
            solver: None,
        })
    }

    /// The molecule at its tabulated equilibrium geometry in STO-3G.
    pub fn equilibrium() -> VqaResult<Self> {
        Self::new(EQUILIBRIUM_DISTANCE, "sto-3g")
    }

    /// Attach a solver used by [`exact_ground_state_energy`](Self::exact_ground_state_energy).
    pub fn with_solver(mut self, solver: Box<dyn ElectronicStructureSolver>) -> Self {
        self.solver = Some(solver);
        self
    }

    /// Bond distance in Å.
    pub fn bond_distance(&self) -> f64 {
        self.bond_distance
    }

    /// Basis set name.
    pub fn basis(&self) -> &str {
        &self.basis
    }

    /// Always 4.
    pub fn num_qubits(&self) -> usize {
        H2_NUM_QUBITS
    }

    /// The Hamiltonian built at construction.
    pub fn hamiltonian(&self) -> &Hamiltonian {
        &self.hamiltonian
    }

    /// An owned copy of the Hamiltonian.
    pub fn build(&self) -> Hamiltonian {
        self.hamiltonian.clone()
    }

    /// Reference ground-state energy.
    ///
    /// Delegates to the attached solver. Without one, returns the equilibrium
    /// energy scaled by `(0.74 / d)²`, which is only a rough placeholder away
    /// from equilibrium.
    pub fn exact_ground_state_energy(&self) -> VqaResult<f64> {
        if let Some(solver) = &self.solver {
            return solver.ground_state_energy(self.bond_distance, &self.basis);
        }
        warn!(
            bond_distance = self.bond_distance,
            "No electronic structure solver attached, using approximate tabulated H2 energy"
        );
        let scale = EQUILIBRIUM_DISTANCE / self.bond_distance;
        Ok(EQUILIBRIUM_ENERGY * scale * scale)
    }

    /// Smallest eigenvalue of the five-term qubit Hamiltonian itself.
    ///
    /// This is the floor any variational energy on this Hamiltonian respects.
    pub fn diagonalized_energy(&self) -> VqaResult<f64> {
        self.hamiltonian.exact_ground_energy()
    }
}

impl fmt::Debug for H2Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("H2Molecule")
            .field("bond_distance", &self.bond_distance)
            .field("basis", &self.basis)
            .field("hamiltonian", &self.hamiltonian)
            .field("solver", &self.solver.is_some())
            .finish()
    }
}

impl fmt::Display for H2Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "H2Molecule(bond_distance={} Å, basis={}, num_qubits={})",
            self.bond_distance, self.basis, H2_NUM_QUBITS
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    struct FixedSolver(f64);

    impl ElectronicStructureSolver for FixedSolver {
        fn ground_state_energy(&self, _bond_distance: f64, _basis: &str) -> VqaResult<f64> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_five_terms_on_four_qubits() {
        let h2 = H2Molecule::equilibrium().unwrap();
        assert_eq!(h2.hamiltonian().n_terms(), 5);
        assert_eq!(h2.hamiltonian().num_qubits(), 4);
    }

    #[test]
    fn test_coefficients_independent_of_distance() {
        let a = H2Molecule::new(0.74, "sto-3g").unwrap();
        let b = H2Molecule::new(1.5, "sto-3g").unwrap();
        assert_eq!(a.hamiltonian(), b.hamiltonian());
    }

    #[test]
    fn test_fallback_energy_scaling() {
        let eq = H2Molecule::equilibrium().unwrap();
        assert_abs_diff_eq!(
            eq.exact_ground_state_energy().unwrap(),
            EQUILIBRIUM_ENERGY,
            epsilon = 1e-15
        );
        let stretched = H2Molecule::new(1.48, "sto-3g").unwrap();
        assert_abs_diff_eq!(
            stretched.exact_ground_state_energy().unwrap(),
            EQUILIBRIUM_ENERGY / 4.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_solver_takes_precedence() {
        let h2 = H2Molecule::equilibrium()
            .unwrap()
            .with_solver(Box::new(FixedSolver(-1.5)));
        assert_eq!(h2.exact_ground_state_energy().unwrap(), -1.5);
    }

    #[test]
    fn test_unknown_basis() {
        assert!(matches!(
            H2Molecule::new(0.74, "cc-pvdz"),
            Err(VqaError::UnsupportedBasis(b)) if b == "cc-pvdz"
        ));
    }

    #[test]
    fn test_diagonalized_energy() {
        let h2 = H2Molecule::equilibrium().unwrap();
        assert_abs_diff_eq!(
            h2.diagonalized_energy().unwrap(),
            0.490_718_916_983_368_34,
            epsilon = 1e-9
        );
    }
}
