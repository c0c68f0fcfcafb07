//! Reference problems with independently computable ground-state energies.
//!
//! | Model | Qubits | Reference energy |
//! |-------|--------|------------------|
//! | [`IsingModel`] | `n >= 2` | dense diagonalization |
//! | [`H2Molecule`] | 4 | solver hook or tabulated value |

pub mod h2;
pub mod ising;

pub use h2::{ElectronicStructureSolver, H2Molecule};
pub use ising::IsingModel;
