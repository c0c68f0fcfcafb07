//! Ansatz specifications.
//!
//! An ansatz is a parameterized family of state-preparation circuits. The
//! [`AnsatzSpec`] fixes the family and register width; its parameter count is
//! a static property of the family and always matches the number of slots
//! consumed by [`AnsatzSpec::build_state_preparation`].
//!
//! | Kind | Qubits | Parameters | Initial draw |
//! |------|--------|------------|--------------|
//! | Hardware-efficient | `n` | `n × depth` | `U[-π, π]` |
//! | UCCSD (H2) | 4 | 1 | `U[-0.1, 0.1]` |
//! | Simplified H2 | 4 | 1 | `U[-0.1, 0.1]` |

use std::f64::consts::PI;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::circuit::{Angle, CircuitTemplate};
use crate::error::{VqaError, VqaResult};

const MOLECULAR_INIT_RANGE: f64 = 0.1;

/// Ansatz family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnsatzKind {
    /// Layers of `Ry` on every qubit followed by a linear CNOT chain.
    HardwareEfficient {
        /// Number of rotation + entangler layers.
        depth: usize,
    },
    /// One-parameter UCCSD-style circuit for H2: the single 0 → 2 excitation.
    Uccsd,
    /// Hand-reduced single-parameter H2 circuit.
    SimplifiedH2,
}

/// Ansatz family bound to a register width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsatzSpec {
    num_qubits: usize,
    kind: AnsatzKind,
}

impl AnsatzSpec {
    /// Hardware-efficient ansatz on `num_qubits` qubits with `depth` layers.
    pub fn hardware_efficient(num_qubits: usize, depth: usize) -> VqaResult<Self> {
        if num_qubits == 0 || depth == 0 {
            return Err(VqaError::Configuration(format!(
                "hardware-efficient ansatz needs qubits and depth >= 1 (got {num_qubits} qubits, depth {depth})"
            )));
        }
        Ok(Self {
            num_qubits,
            kind: AnsatzKind::HardwareEfficient { depth },
        })
    }

    /// UCCSD ansatz for the 4-qubit H2 Hamiltonian.
    pub fn uccsd() -> Self {
        Self {
            num_qubits: 4,
            kind: AnsatzKind::Uccsd,
        }
    }

    /// Simplified single-parameter H2 ansatz.
    pub fn simplified_h2() -> Self {
        Self {
            num_qubits: 4,
            kind: AnsatzKind::SimplifiedH2,
        }
    }

    /// H2 ansatz by name: `"uccsd"` or `"simplified"`.
    pub fn for_h2(name: &str) -> VqaResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "uccsd" => Ok(Self::uccsd()),
            "simplified" | "simplified_h2" | "simplified-h2" => Ok(Self::simplified_h2()),
            other => Err(VqaError::Configuration(format!(
                "unknown H2 ansatz '{other}', expected 'uccsd' or 'simplified'"
            ))),
        }
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Ansatz family.
    pub fn kind(&self) -> AnsatzKind {
        self.kind
    }

    /// Number of variational parameters.
    pub fn parameter_count(&self) -> usize {
        match self.kind {
            AnsatzKind::HardwareEfficient { depth } => self.num_qubits * depth,
            AnsatzKind::Uccsd | AnsatzKind::SimplifiedH2 => 1,
        }
    }

    /// Reproducible starting point drawn from a generator seeded with `seed`.
    pub fn initial_parameters(&self, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let half_width = match self.kind {
            AnsatzKind::HardwareEfficient { .. } => PI,
            AnsatzKind::Uccsd | AnsatzKind::SimplifiedH2 => MOLECULAR_INIT_RANGE,
        };
        (0..self.parameter_count())
            .map(|_| rng.gen_range(-half_width..=half_width))
            .collect()
    }

    /// The state-preparation circuit with unresolved parameter slots.
    pub fn build_state_preparation(&self) -> VqaResult<CircuitTemplate> {
        let n = self.num_qubits;
        let mut circuit = CircuitTemplate::new(n);

        match self.kind {
            AnsatzKind::HardwareEfficient { depth } => {
                let mut param_idx = 0;
                for _ in 0..depth {
                    for q in 0..n {
                        circuit.ry(q, Angle::Param(param_idx))?;
                        param_idx += 1;
                    }
                    for q in 0..n.saturating_sub(1) {
                        circuit.cx(q, q + 1)?;
                    }
                }
            }
            AnsatzKind::Uccsd => {
                // Hartree-Fock reference: two electrons in the lowest spin orbitals
                circuit.x(0)?.x(1)?;
                // Excitation rotation conjugated by a basis change on qubit 2
                circuit
                    .h(2)?
                    .cx(2, 0)?
                    .ry(2, Angle::Param(0))?
                    .cx(2, 0)?
                    .h(2)?;
            }
            AnsatzKind::SimplifiedH2 => {
                circuit.x(0)?.x(1)?;
                circuit
                    .ry(0, Angle::Param(0))?
                    .ry(2, Angle::NegParam(0))?
                    .cx(0, 2)?;
            }
        }

        Ok(circuit)
    }
}

impl fmt::Display for AnsatzSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AnsatzKind::HardwareEfficient { depth } => write!(
                f,
                "HardwareEfficient(num_qubits={}, depth={depth}, parameters={})",
                self.num_qubits,
                self.parameter_count()
            ),
            AnsatzKind::Uccsd => write!(f, "UCCSD(num_qubits={}, parameters=1)", self.num_qubits),
            AnsatzKind::SimplifiedH2 => {
                write!(f, "SimplifiedH2(num_qubits={}, parameters=1)", self.num_qubits)
            }
        }
    }
}
