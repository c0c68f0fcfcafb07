//! Statevector simulation engine.

use num_complex::Complex64;

use vqa_core::{Circuit, Gate, Hamiltonian, PauliString};

/// A statevector over `num_qubits` qubits.
///
/// Basis index bit `k` is qubit `k` (little-endian).
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Prepare the state a bound circuit produces from |0...0⟩.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        let mut sv = Self::new(circuit.num_qubits());
        for gate in circuit.gates() {
            sv.apply(gate);
        }
        sv
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes in basis order.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Squared norm; 1 for any state reached by unitary gates.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Apply a gate to the statevector.
    pub fn apply(&mut self, gate: &Gate<f64>) {
        match *gate {
            Gate::H(q) => self.apply_h(q),
            Gate::X(q) => self.apply_x(q),
            Gate::Y(q) => self.apply_y(q),
            Gate::Z(q) => self.apply_z(q),
            Gate::Rx(q, theta) => self.apply_rx(q, theta),
            Gate::Ry(q, theta) => self.apply_ry(q, theta),
            Gate::Rz(q, theta) => self.apply_rz(q, theta),
            Gate::Cx(c, t) => self.apply_cx(c, t),
            Gate::Cz(c, t) => self.apply_cz(c, t),
        }
    }

    /// `⟨ψ|P|ψ⟩` for a single Pauli string. Real because `P` is Hermitian.
    pub fn pauli_expectation(&self, pauli: &PauliString) -> f64 {
        if pauli.is_identity() {
            return self.norm_sqr();
        }
        // Σ_i conj(ψ[t(i)]) · phase(i) · ψ[i], where P|i⟩ = phase(i)|t(i)⟩
        self.amplitudes
            .iter()
            .enumerate()
            .map(|(i, amp)| {
                let (target, phase) = pauli.apply_to_basis(i);
                (self.amplitudes[target].conj() * phase * amp).re
            })
            .sum()
    }

    /// `⟨ψ|H|ψ⟩ = Σ_k c_k ⟨ψ|P_k|ψ⟩`.
    pub fn expectation(&self, hamiltonian: &Hamiltonian) -> f64 {
        hamiltonian
            .terms()
            .iter()
            .map(|term| term.coeff * self.pauli_expectation(&term.pauli))
            .sum()
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask != 0 {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp *= if i & mask == 0 { phase_0 } else { phase_1 };
        }
    }

    // =========================================================================
    // Two-qubit gate implementations
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let both = (1 << control) | (1 << target);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & both == both {
                *amp = -*amp;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vqa_core::{HamiltonianTerm, PauliOp};

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        assert!(sv.amplitudes[1..].iter().all(|a| approx_eq(*a, Complex64::new(0.0, 0.0))));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        sv.apply(&Gate::H(0));
        sv.apply(&Gate::Cx(0, 1));

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(sqrt2_inv, 0.0)));

        // Bell state: ⟨ZZ⟩ = ⟨XX⟩ = 1, ⟨YY⟩ = -1
        let zz = PauliString::from_label("ZZ").unwrap();
        let xx = PauliString::from_label("XX").unwrap();
        let yy = PauliString::from_label("YY").unwrap();
        assert!((sv.pauli_expectation(&zz) - 1.0).abs() < 1e-12);
        assert!((sv.pauli_expectation(&xx) - 1.0).abs() < 1e-12);
        assert!((sv.pauli_expectation(&yy) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_little_endian_order() {
        let mut sv = Statevector::new(3);
        sv.apply(&Gate::X(1));
        assert!(approx_eq(sv.amplitudes[0b010], Complex64::new(1.0, 0.0)));
        let z1 = PauliString::from_ops([(1, PauliOp::Z)]);
        assert!((sv.pauli_expectation(&z1) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ry_expectation() {
        // Ry(θ)|0⟩: ⟨Z⟩ = cos θ, ⟨X⟩ = sin θ
        let theta = 0.7_f64;
        let mut sv = Statevector::new(1);
        sv.apply(&Gate::Ry(0, theta));
        let h = Hamiltonian::new(1, vec![HamiltonianTerm::z(0, 2.0), HamiltonianTerm::x(0, 3.0)])
            .unwrap();
        assert!((sv.expectation(&h) - (2.0 * theta.cos() + 3.0 * theta.sin())).abs() < 1e-12);
    }

    #[test]
    fn test_rx_y_expectation() {
        // Rx(θ)|0⟩: ⟨Y⟩ = -sin θ
        let theta = 0.4_f64;
        let mut sv = Statevector::new(1);
        sv.apply(&Gate::Rx(0, theta));
        let y = PauliString::from_ops([(0, PauliOp::Y)]);
        assert!((sv.pauli_expectation(&y) + theta.sin()).abs() < 1e-12);
    }

    #[test]
    fn test_rz_and_cz_preserve_norm() {
        let mut sv = Statevector::new(2);
        sv.apply(&Gate::H(0));
        sv.apply(&Gate::H(1));
        sv.apply(&Gate::Rz(0, 1.3));
        sv.apply(&Gate::Cz(0, 1));
        sv.apply(&Gate::Y(1));
        assert!((sv.norm_sqr() - 1.0).abs() < 1e-12);
    }
}
