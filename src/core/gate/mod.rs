use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Bool3S, GateType, SourceId};


#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("{gate_type} gate can't have {arity} inputs")]
    Arity { gate_type: GateType, arity: usize },
    #[error("Input index {index} out of range for a gate with {arity} inputs")]
    InputIndex { index: usize, arity: usize },
    #[error("Expected {expected} resolved inputs, got {got}")]
    ArityMismatch { expected: usize, got: usize },
}
pub type GateError = Error;

/// One logic element: a kind, the ids its inputs are wired to, and the output
/// computed by the last evaluation.
///
/// The number of inputs is fixed at construction; sources can be rewired
/// with [`Gate::set_input_source`] but never added or removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GateRepr")]
pub struct Gate {
    gate_type: GateType,
    inputs: Vec<SourceId>,
    #[serde(skip)]
    output: Bool3S,
}

/// Deserialized form, checked against the arity rules before it becomes a
/// [`Gate`].
#[derive(Deserialize)]
struct GateRepr {
    gate_type: GateType,
    inputs: Vec<SourceId>,
}

impl TryFrom<GateRepr> for Gate {
    type Error = Error;

    fn try_from(repr: GateRepr) -> Result<Self, Self::Error> {
        Gate::with_inputs(repr.gate_type, repr.inputs)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gate_type.code())?;
        for input in &self.inputs {
            write!(f, " {input}")?;
        }
        Ok(())
    }
}

impl Gate {
    /// Gate with `arity` unset inputs.
    pub fn new(gate_type: GateType, arity: usize) -> Result<Self, Error> {
        Self::with_inputs(gate_type, vec![SourceId::UNSET; arity])
    }

    pub fn with_inputs(gate_type: GateType, inputs: Vec<SourceId>) -> Result<Self, Error> {
        if !gate_type.valid_arity(inputs.len()) {
            return Err(Error::Arity {
                gate_type,
                arity: inputs.len(),
            });
        }
        Ok(Self {
            gate_type,
            inputs,
            output: Bool3S::Undef,
        })
    }

    /// Allocates a gate from its two-letter code, or `None` when the code is
    /// unknown or `arity` is illegal for that kind.
    pub fn from_code(code: &str, arity: usize) -> Option<Self> {
        GateType::from_code(code).and_then(|t| Self::new(t, arity).ok())
    }

    fn binary(gate_type: GateType, a: SourceId, b: SourceId) -> Self {
        Self {
            gate_type,
            inputs: vec![a, b],
            output: Bool3S::Undef,
        }
    }

    #[must_use]
    pub fn not(a: SourceId) -> Self {
        Self {
            gate_type: GateType::Not,
            inputs: vec![a],
            output: Bool3S::Undef,
        }
    }

    #[must_use]
    pub fn and(a: SourceId, b: SourceId) -> Self {
        Self::binary(GateType::And, a, b)
    }

    #[must_use]
    pub fn nand(a: SourceId, b: SourceId) -> Self {
        Self::binary(GateType::Nand, a, b)
    }

    #[must_use]
    pub fn or(a: SourceId, b: SourceId) -> Self {
        Self::binary(GateType::Or, a, b)
    }

    #[must_use]
    pub fn nor(a: SourceId, b: SourceId) -> Self {
        Self::binary(GateType::Nor, a, b)
    }

    #[must_use]
    pub fn xor(a: SourceId, b: SourceId) -> Self {
        Self::binary(GateType::Xor, a, b)
    }

    #[must_use]
    pub fn nxor(a: SourceId, b: SourceId) -> Self {
        Self::binary(GateType::Nxor, a, b)
    }

    pub fn gate_type(&self) -> GateType {
        self.gate_type
    }

    /// Display name of the gate kind, e.g. `"NAND"`.
    pub fn kind_name(&self) -> &'static str {
        self.gate_type.name()
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn inputs(&self) -> &[SourceId] {
        &self.inputs
    }

    pub fn input_source(&self, index: usize) -> Result<SourceId, Error> {
        self.inputs.get(index).copied().ok_or(Error::InputIndex {
            index,
            arity: self.inputs.len(),
        })
    }

    /// Rewires input `index`. Whether `source` exists in the owning circuit is
    /// checked by the circuit's validator, not here.
    pub fn set_input_source(&mut self, index: usize, source: SourceId) -> Result<(), Error> {
        let arity = self.inputs.len();
        let slot = self
            .inputs
            .get_mut(index)
            .ok_or(Error::InputIndex { index, arity })?;
        *slot = source;
        Ok(())
    }

    pub fn output(&self) -> Bool3S {
        self.output
    }

    pub fn reset(&mut self) {
        self.output = Bool3S::Undef;
    }

    /// Applies the gate's truth table to one resolved value per input and
    /// caches the result as the gate output.
    pub fn evaluate(&mut self, resolved: &[Bool3S]) -> Result<Bool3S, Error> {
        if resolved.len() != self.inputs.len() {
            return Err(Error::ArityMismatch {
                expected: self.inputs.len(),
                got: resolved.len(),
            });
        }
        self.output = self.gate_type.eval(resolved);
        Ok(self.output)
    }
}
