//! Hamiltonian data structures.
//!
//! A Hamiltonian is a sum of weighted Pauli strings:
//!
//!   H = Σ_k  c_k · P_k
//!
//! where each P_k is a tensor product of single-qubit Pauli operators
//! (I, X, Y, Z) and c_k ∈ ℝ. Real coefficients on the Pauli basis make every
//! Hamiltonian Hermitian by construction.
//!
//! # Example
//!
//! ```rust
//! use vqa_core::hamiltonian::{Hamiltonian, HamiltonianTerm, PauliString};
//!
//! // H = -1.0·Z₀Z₁  +  0.5·X₀
//! let h = Hamiltonian::new(2, vec![
//!     HamiltonianTerm::new(-1.0, PauliString::from_label("ZZ").unwrap()),
//!     HamiltonianTerm::x(0, 0.5),
//! ]).unwrap();
//! assert_eq!(h.n_terms(), 2);
//! assert_eq!(h.num_qubits(), 2);
//! ```

use std::fmt;

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{VqaError, VqaResult};
use crate::exact;

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    /// Parse a single label character.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'I' => Some(Self::I),
            'X' => Some(Self::X),
            'Y' => Some(Self::Y),
            'Z' => Some(Self::Z),
            _ => None,
        }
    }

    /// Label character.
    pub fn as_char(self) -> char {
        match self {
            Self::I => 'I',
            Self::X => 'X',
            Self::Y => 'Y',
            Self::Z => 'Z',
        }
    }
}

impl fmt::Display for PauliOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A tensor product of Pauli operators on indexed qubits.
///
/// Stored as a sorted `Vec<(qubit_index, PauliOp)>` with identity factors
/// omitted. Qubits not listed are implicitly I.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<(usize, PauliOp)>", into = "Vec<(usize, PauliOp)>")]
pub struct PauliString {
    ops: Vec<(usize, PauliOp)>,
}

impl PauliString {
    /// Construct a PauliString from an iterator of (qubit, op) pairs.
    ///
    /// Identity operators are dropped; the remaining ops are sorted by qubit.
    pub fn from_ops(ops: impl IntoIterator<Item = (usize, PauliOp)>) -> Self {
        let mut v: Vec<(usize, PauliOp)> = ops
            .into_iter()
            .filter(|(_, op)| *op != PauliOp::I)
            .collect();
        v.sort_by_key(|(q, _)| *q);
        Self { ops: v }
    }

    /// The all-identity string.
    pub fn identity() -> Self {
        Self { ops: Vec::new() }
    }

    /// Parse a dense label such as `"ZZII"`, where character `k` acts on qubit `k`.
    pub fn from_label(label: &str) -> VqaResult<Self> {
        let ops = label
            .chars()
            .enumerate()
            .map(|(q, c)| {
                PauliOp::from_char(c)
                    .map(|op| (q, op))
                    .ok_or_else(|| VqaError::InvalidPauliLabel(label.to_string()))
            })
            .collect::<VqaResult<Vec<_>>>()?;
        Ok(Self::from_ops(ops))
    }

    /// Render as a dense label of length `num_qubits`.
    pub fn to_label(&self, num_qubits: usize) -> String {
        let mut label = vec!['I'; num_qubits];
        for &(q, op) in &self.ops {
            if q < num_qubits {
                label[q] = op.as_char();
            }
        }
        label.into_iter().collect()
    }

    /// Return the non-identity (qubit, op) pairs, sorted by qubit index.
    pub fn ops(&self) -> &[(usize, PauliOp)] {
        &self.ops
    }

    /// True if there are no non-identity operators.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// The highest qubit index referenced, or `None` for an identity string.
    pub fn max_qubit(&self) -> Option<usize> {
        self.ops.last().map(|(q, _)| *q)
    }

    /// Action on a computational basis state: `P|index⟩ = phase·|target⟩`.
    ///
    /// Bit `k` of `index` is qubit `k` (little-endian).
    pub fn apply_to_basis(&self, index: usize) -> (usize, Complex64) {
        let mut target = index;
        let mut phase = Complex64::new(1.0, 0.0);
        for &(q, op) in &self.ops {
            let bit = (index >> q) & 1;
            match op {
                PauliOp::I => {}
                PauliOp::X => target ^= 1 << q,
                PauliOp::Y => {
                    target ^= 1 << q;
                    // Y|0⟩ = i|1⟩, Y|1⟩ = -i|0⟩
                    phase *= if bit == 0 {
                        Complex64::new(0.0, 1.0)
                    } else {
                        Complex64::new(0.0, -1.0)
                    };
                }
                PauliOp::Z => {
                    if bit == 1 {
                        phase = -phase;
                    }
                }
            }
        }
        (target, phase)
    }
}

impl From<Vec<(usize, PauliOp)>> for PauliString {
    fn from(ops: Vec<(usize, PauliOp)>) -> Self {
        Self::from_ops(ops)
    }
}

impl From<PauliString> for Vec<(usize, PauliOp)> {
    fn from(ps: PauliString) -> Self {
        ps.ops
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return write!(f, "I");
        }
        for (i, (q, op)) in self.ops.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{op}{q}")?;
        }
        Ok(())
    }
}

/// A single weighted Pauli term: `coeff · pauli`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HamiltonianTerm {
    /// Real coefficient.
    pub coeff: f64,
    /// The Pauli string.
    pub pauli: PauliString,
}

impl HamiltonianTerm {
    /// Create a new term.
    pub fn new(coeff: f64, pauli: PauliString) -> Self {
        Self { coeff, pauli }
    }

    /// Shorthand: identity (constant) term.
    pub fn constant(coeff: f64) -> Self {
        Self::new(coeff, PauliString::identity())
    }

    /// Shorthand: single-qubit Z term.
    pub fn z(qubit: usize, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::Z)]))
    }

    /// Shorthand: ZZ coupling term.
    pub fn zz(q0: usize, q1: usize, coeff: f64) -> Self {
        Self::new(
            coeff,
            PauliString::from_ops([(q0, PauliOp::Z), (q1, PauliOp::Z)]),
        )
    }

    /// Shorthand: single-qubit X term.
    pub fn x(qubit: usize, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::X)]))
    }

    /// Shorthand: XX coupling term.
    pub fn xx(q0: usize, q1: usize, coeff: f64) -> Self {
        Self::new(
            coeff,
            PauliString::from_ops([(q0, PauliOp::X), (q1, PauliOp::X)]),
        )
    }
}

impl fmt::Display for HamiltonianTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coeff >= 0.0 {
            write!(f, "+{:.6} {}", self.coeff, self.pauli)
        } else {
            write!(f, "{:.6} {}", self.coeff, self.pauli)
        }
    }
}

/// A sum-of-Pauli-strings Hamiltonian over a fixed register.
///
/// Immutable once built: there is no API that adds or edits terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HamiltonianRepr")]
pub struct Hamiltonian {
    num_qubits: usize,
    terms: Vec<HamiltonianTerm>,
}

#[derive(Deserialize)]
struct HamiltonianRepr {
    num_qubits: usize,
    terms: Vec<HamiltonianTerm>,
}

impl TryFrom<HamiltonianRepr> for Hamiltonian {
    type Error = VqaError;

    fn try_from(repr: HamiltonianRepr) -> VqaResult<Self> {
        Self::new(repr.num_qubits, repr.terms)
    }
}

impl Hamiltonian {
    /// Create a Hamiltonian on `num_qubits` qubits.
    ///
    /// Fails with [`VqaError::QubitOutOfRange`] if a term acts outside the register.
    pub fn new(num_qubits: usize, terms: Vec<HamiltonianTerm>) -> VqaResult<Self> {
        for term in &terms {
            if let Some(q) = term.pauli.max_qubit() {
                if q >= num_qubits {
                    return Err(VqaError::QubitOutOfRange {
                        qubit: q,
                        num_qubits,
                    });
                }
            }
        }
        Ok(Self { num_qubits, terms })
    }

    /// Create from a list of terms, sizing the register to the highest qubit used.
    pub fn from_terms(terms: Vec<HamiltonianTerm>) -> Self {
        let num_qubits = terms
            .iter()
            .filter_map(|t| t.pauli.max_qubit())
            .max()
            .map_or(0, |q| q + 1);
        Self { num_qubits, terms }
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// All terms.
    pub fn terms(&self) -> &[HamiltonianTerm] {
        &self.terms
    }

    /// Number of terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Upper bound on the spectral norm: Σ |c_k|.
    pub fn lambda(&self) -> f64 {
        self.terms.iter().map(|t| t.coeff.abs()).sum()
    }

    /// True if no term contains a Y factor, so the matrix is real.
    pub fn is_real(&self) -> bool {
        self.terms
            .iter()
            .all(|t| t.pauli.ops().iter().all(|(_, op)| *op != PauliOp::Y))
    }

    /// Dense `2^n × 2^n` matrix in the little-endian computational basis.
    pub fn to_matrix(&self) -> VqaResult<Array2<Complex64>> {
        exact::check_width(self.num_qubits)?;
        let dim = 1usize << self.num_qubits;
        let mut m = Array2::<Complex64>::zeros((dim, dim));
        for term in &self.terms {
            for col in 0..dim {
                let (row, phase) = term.pauli.apply_to_basis(col);
                m[[row, col]] += phase * term.coeff;
            }
        }
        Ok(m)
    }

    /// Smallest eigenvalue, by dense diagonalization.
    ///
    /// Limited to [`exact::MAX_EXACT_QUBITS`] qubits.
    pub fn exact_ground_energy(&self) -> VqaResult<f64> {
        let m = self.to_matrix()?;
        if self.is_real() {
            exact::lowest_eigenvalue_symmetric(&m.mapv(|z| z.re))
        } else {
            exact::lowest_eigenvalue_hermitian(&m)
        }
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> VqaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from a JSON string, re-validating qubit ranges.
    pub fn from_json(json: &str) -> VqaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Display for Hamiltonian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Hamiltonian ({} terms, {} qubits):",
            self.n_terms(),
            self.num_qubits
        )?;
        for term in &self.terms {
            writeln!(f, "  {term}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        let ps = PauliString::from_label("ZIXY").unwrap();
        assert_eq!(
            ps.ops(),
            &[(0, PauliOp::Z), (2, PauliOp::X), (3, PauliOp::Y)]
        );
        assert_eq!(ps.to_label(4), "ZIXY");
        assert_eq!(ps.to_label(6), "ZIXYII");
    }

    #[test]
    fn test_invalid_label() {
        assert!(matches!(
            PauliString::from_label("ZQ"),
            Err(VqaError::InvalidPauliLabel(_))
        ));
    }

    #[test]
    fn test_y_action_phases() {
        let y = PauliString::from_ops([(0, PauliOp::Y)]);
        let (t0, p0) = y.apply_to_basis(0);
        let (t1, p1) = y.apply_to_basis(1);
        assert_eq!((t0, t1), (1, 0));
        assert_eq!(p0, Complex64::new(0.0, 1.0));
        assert_eq!(p1, Complex64::new(0.0, -1.0));
    }

    #[test]
    fn test_display() {
        let t = HamiltonianTerm::zz(0, 1, -1.0);
        assert_eq!(t.to_string(), "-1.000000 Z0 Z1");
        assert_eq!(HamiltonianTerm::constant(0.5).to_string(), "+0.500000 I");
    }
}
