//! VQA Local Backends
//!
//! This crate provides the local [`Backend`](vqa_core::Backend)
//! implementations for the VQA engine.
//!
//! # Backends
//!
//! - **[`StatevectorBackend`]**: exact statevector simulation, returning
//!   `⟨ψ(θ)|H|ψ(θ)⟩` with no sampling noise
//! - **[`MockBackend`]**: deterministic `Σ θ² − 5`, for exercising the loop
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 4 | 256 B | Instant |
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//!
//! # Example
//!
//! ```
//! use vqa_adapter_sim::StatevectorBackend;
//! use vqa_core::models::IsingModel;
//! use vqa_core::{AnsatzSpec, Method, Vqe};
//!
//! let model = IsingModel::new(2, 1.0, 0.5, false)?;
//! let ansatz = AnsatzSpec::hardware_efficient(2, 2)?;
//! let initial = ansatz.initial_parameters(7);
//!
//! let mut vqe = Vqe::new(StatevectorBackend::new(), model.build(), ansatz)?;
//! let result = vqe.optimize(&initial, Method::Cobyla, 300, 1e-8)?;
//!
//! // Never below the true ground state
//! assert!(result.optimal_energy >= model.exact_diagonalization_energy()? - 1e-9);
//! # Ok::<(), vqa_core::VqaError>(())
//! ```

mod mock;
mod simulator;
mod statevector;

pub use mock::MockBackend;
pub use simulator::StatevectorBackend;
pub use statevector::Statevector;
