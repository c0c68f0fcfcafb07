//! VQA Core: variational quantum eigensolver engine
//!
//! This crate contains the classical half of a VQE loop. Circuit execution is
//! delegated to a [`Backend`]; everything else lives here.
//!
//! # Overview
//!
//! - [`Hamiltonian`]: weighted sum of Pauli strings, with dense exact
//!   diagonalization as a reference ([`exact`])
//! - [`models`]: transverse-field Ising chain and minimal H2 Hamiltonians
//! - [`AnsatzSpec`]: parameter count, seeded initial parameters and the
//!   state-preparation [`CircuitTemplate`]
//! - [`CostEvaluator`]: energy objective with an [`OptimizationTrace`]
//! - [`optimizers`]: COBYLA, Nelder-Mead, Powell, an adaptive racer, and
//!   parameter-shift gradient descent / Adam
//! - [`Vqe`]: the driver tying them together
//!
//! # Backends
//!
//! | Backend | Crate | Energy |
//! |---------|-------|--------|
//! | `StatevectorBackend` | `vqa-adapter-sim` | Exact `⟨ψ(θ)|H|ψ(θ)⟩` |
//! | `MockBackend` | `vqa-adapter-sim` | `Σ θ² − 5` |
//!
//! # Example
//!
//! ```
//! use vqa_core::{AnsatzSpec, Backend, CircuitTemplate, Hamiltonian, Method, Vqe, VqaResult};
//! use vqa_core::models::IsingModel;
//!
//! struct Paraboloid;
//!
//! impl Backend for Paraboloid {
//!     fn name(&self) -> &str { "paraboloid" }
//!
//!     fn observe(&self, _: &CircuitTemplate, _: &Hamiltonian, p: &[f64]) -> VqaResult<f64> {
//!         Ok(p.iter().map(|x| (x - 1.0).powi(2)).sum())
//!     }
//! }
//!
//! let model = IsingModel::new(2, 1.0, 0.5, false)?;
//! let ansatz = AnsatzSpec::hardware_efficient(2, 1)?;
//! let initial = ansatz.initial_parameters(42);
//!
//! let mut vqe = Vqe::new(Paraboloid, model.build(), ansatz)?;
//! let result = vqe.optimize(&initial, Method::NelderMead, 500, 1e-10)?;
//! assert!(result.optimal_energy < 1e-6);
//! # Ok::<(), vqa_core::VqaError>(())
//! ```

pub mod ansatz;
pub mod backend;
pub mod circuit;
pub mod cost;
pub mod error;
pub mod exact;
pub mod hamiltonian;
pub mod models;
pub mod optimizers;
pub mod vqe;

pub use ansatz::{AnsatzKind, AnsatzSpec};
pub use backend::Backend;
pub use circuit::{Angle, Circuit, CircuitTemplate, Gate};
pub use cost::{CostEvaluator, CostFunction, FnCost, OptimizationTrace, TraceEntry};
pub use error::{VqaError, VqaResult};
pub use hamiltonian::{Hamiltonian, HamiltonianTerm, PauliOp, PauliString};
pub use optimizers::{
    Adam, AdaptiveOptimizer, DerivativeFreeMethod, GradientDescent, GradientFreeOptimizer,
    GradientOptimizer, OptimizerResult, OptimizerStatus, ParameterShift,
};
pub use vqe::{Method, Vqe};
