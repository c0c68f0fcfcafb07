//! Parameterized circuit descriptors.
//!
//! A [`CircuitTemplate`] is the state-preparation circuit an ansatz produces:
//! an ordered gate list whose rotation angles may refer to slots of the
//! parameter vector. Binding a parameter vector yields a concrete [`Circuit`]
//! that a backend can execute.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{VqaError, VqaResult};

/// A rotation angle in a template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Angle {
    /// A constant angle.
    Fixed(f64),
    /// `θ_i`.
    Param(usize),
    /// `-θ_i`.
    NegParam(usize),
}

impl Angle {
    /// The parameter slot this angle reads, if any.
    pub fn slot(&self) -> Option<usize> {
        match *self {
            Angle::Fixed(_) => None,
            Angle::Param(i) | Angle::NegParam(i) => Some(i),
        }
    }

    fn resolve(&self, params: &[f64]) -> f64 {
        match *self {
            Angle::Fixed(v) => v,
            Angle::Param(i) => params[i],
            Angle::NegParam(i) => -params[i],
        }
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Angle::Fixed(v) => write!(f, "{v:.4}"),
            Angle::Param(i) => write!(f, "θ[{i}]"),
            Angle::NegParam(i) => write!(f, "-θ[{i}]"),
        }
    }
}

/// A gate acting on qubits, generic over how rotation angles are stored.
///
/// Templates use `Gate<Angle>`; bound circuits use `Gate<f64>`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gate<A> {
    /// Hadamard.
    H(usize),
    /// Pauli-X.
    X(usize),
    /// Pauli-Y.
    Y(usize),
    /// Pauli-Z.
    Z(usize),
    /// X rotation.
    Rx(usize, A),
    /// Y rotation.
    Ry(usize, A),
    /// Z rotation.
    Rz(usize, A),
    /// Controlled-X `(control, target)`.
    Cx(usize, usize),
    /// Controlled-Z.
    Cz(usize, usize),
}

impl<A> Gate<A> {
    /// Qubits the gate touches.
    pub fn qubits(&self) -> Vec<usize> {
        match *self {
            Gate::H(q)
            | Gate::X(q)
            | Gate::Y(q)
            | Gate::Z(q)
            | Gate::Rx(q, _)
            | Gate::Ry(q, _)
            | Gate::Rz(q, _) => vec![q],
            Gate::Cx(a, b) | Gate::Cz(a, b) => vec![a, b],
        }
    }

    /// Rotation angle, if the gate has one.
    pub fn angle(&self) -> Option<&A> {
        match self {
            Gate::Rx(_, a) | Gate::Ry(_, a) | Gate::Rz(_, a) => Some(a),
            _ => None,
        }
    }

    fn map_angle<B>(&self, f: impl FnOnce(&A) -> B) -> Gate<B> {
        match self {
            Gate::H(q) => Gate::H(*q),
            Gate::X(q) => Gate::X(*q),
            Gate::Y(q) => Gate::Y(*q),
            Gate::Z(q) => Gate::Z(*q),
            Gate::Rx(q, a) => Gate::Rx(*q, f(a)),
            Gate::Ry(q, a) => Gate::Ry(*q, f(a)),
            Gate::Rz(q, a) => Gate::Rz(*q, f(a)),
            Gate::Cx(c, t) => Gate::Cx(*c, *t),
            Gate::Cz(c, t) => Gate::Cz(*c, *t),
        }
    }
}

/// A circuit with unresolved parameter slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitTemplate {
    num_qubits: usize,
    gates: Vec<Gate<Angle>>,
}

impl CircuitTemplate {
    /// Empty template on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
        }
    }

    /// Append a gate, checking its qubits against the register.
    pub fn push(&mut self, gate: Gate<Angle>) -> VqaResult<&mut Self> {
        for q in gate.qubits() {
            if q >= self.num_qubits {
                return Err(VqaError::QubitOutOfRange {
                    qubit: q,
                    num_qubits: self.num_qubits,
                });
            }
        }
        self.gates.push(gate);
        Ok(self)
    }

    /// Append a Hadamard.
    pub fn h(&mut self, q: usize) -> VqaResult<&mut Self> {
        self.push(Gate::H(q))
    }

    /// Append a Pauli-X.
    pub fn x(&mut self, q: usize) -> VqaResult<&mut Self> {
        self.push(Gate::X(q))
    }

    /// Append a Y rotation.
    pub fn ry(&mut self, q: usize, angle: Angle) -> VqaResult<&mut Self> {
        self.push(Gate::Ry(q, angle))
    }

    /// Append a Z rotation.
    pub fn rz(&mut self, q: usize, angle: Angle) -> VqaResult<&mut Self> {
        self.push(Gate::Rz(q, angle))
    }

    /// Append a CNOT.
    pub fn cx(&mut self, control: usize, target: usize) -> VqaResult<&mut Self> {
        self.push(Gate::Cx(control, target))
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Gates in application order.
    pub fn gates(&self) -> &[Gate<Angle>] {
        &self.gates
    }

    /// Number of distinct parameter slots, i.e. one past the highest slot used.
    pub fn num_parameters(&self) -> usize {
        self.gates
            .iter()
            .filter_map(|g| g.angle().and_then(Angle::slot))
            .max()
            .map_or(0, |i| i + 1)
    }

    /// Resolve every slot against `params`.
    pub fn bind(&self, params: &[f64]) -> VqaResult<Circuit> {
        let expected = self.num_parameters();
        if params.len() != expected {
            return Err(VqaError::DimensionMismatch {
                expected,
                actual: params.len(),
            });
        }
        Ok(Circuit {
            num_qubits: self.num_qubits,
            gates: self
                .gates
                .iter()
                .map(|g| g.map_angle(|a| a.resolve(params)))
                .collect(),
        })
    }
}

impl fmt::Display for CircuitTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "CircuitTemplate ({} qubits, {} gates, {} parameters):",
            self.num_qubits,
            self.gates.len(),
            self.num_parameters()
        )?;
        for gate in &self.gates {
            match gate {
                Gate::H(q) => writeln!(f, "  h q[{q}]")?,
                Gate::X(q) => writeln!(f, "  x q[{q}]")?,
                Gate::Y(q) => writeln!(f, "  y q[{q}]")?,
                Gate::Z(q) => writeln!(f, "  z q[{q}]")?,
                Gate::Rx(q, a) => writeln!(f, "  rx({a}) q[{q}]")?,
                Gate::Ry(q, a) => writeln!(f, "  ry({a}) q[{q}]")?,
                Gate::Rz(q, a) => writeln!(f, "  rz({a}) q[{q}]")?,
                Gate::Cx(c, t) => writeln!(f, "  cx q[{c}], q[{t}]")?,
                Gate::Cz(c, t) => writeln!(f, "  cz q[{c}], q[{t}]")?,
            }
        }
        Ok(())
    }
}

/// A fully bound circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    num_qubits: usize,
    gates: Vec<Gate<f64>>,
}

impl Circuit {
    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Gates in application order.
    pub fn gates(&self) -> &[Gate<f64>] {
        &self.gates
    }
}
