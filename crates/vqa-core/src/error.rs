//! Error types for the VQA engine.

use thiserror::Error;

/// Errors produced while building problems or running an optimization.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VqaError {
    /// Invalid optimizer wiring or settings, detected before any evaluation.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Parameter vector length does not match the ansatz.
    #[error("Parameter vector has {actual} entries but the ansatz expects {expected}")]
    DimensionMismatch {
        /// Parameter count required by the ansatz.
        expected: usize,
        /// Length of the supplied vector.
        actual: usize,
    },

    /// Every method of an adaptive run failed.
    #[error("All optimization methods failed: {}", methods.join(", "))]
    AllMethodsFailed {
        /// Names of the methods that were tried, in order.
        methods: Vec<String>,
    },

    /// The execution backend could not evaluate a circuit.
    #[error("Backend error: {0}")]
    Backend(String),

    /// A term or gate references a qubit the register does not have.
    #[error("Qubit {qubit} is out of range for a {num_qubits}-qubit register")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// Register width.
        num_qubits: usize,
    },

    /// Dense diagonalization requested beyond the supported width.
    #[error("Exact diagonalization of {num_qubits} qubits exceeds the limit of {max}")]
    TooManyQubits {
        /// Requested width.
        num_qubits: usize,
        /// Largest supported width.
        max: usize,
    },

    /// The dense eigensolver did not converge.
    #[error("Eigensolver error: {0}")]
    Eigensolver(String),

    /// Model parameters are outside their valid domain.
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// No coefficient table exists for the requested basis set.
    #[error("Unsupported basis set '{0}'")]
    UnsupportedBasis(String),

    /// Optimizer method name not recognized.
    #[error("Unknown optimization method '{0}'")]
    UnknownMethod(String),

    /// Dense Pauli label contains a character outside `IXYZ`.
    #[error("Invalid Pauli label '{0}'")]
    InvalidPauliLabel(String),

    /// JSON (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for VQA operations.
pub type VqaResult<T> = Result<T, VqaError>;
