//! The circuit aggregate: primary inputs, an arena of gate slots addressed by
//! 1-based ids, and the declared outputs.
//!
//! ```rust
//! use trilogic::{Bool3S, Circuit, Gate, SourceId};
//!
//! let mut circuit = Circuit::new();
//! circuit.resize(2, 1, 1);
//! circuit.set_gate(1, Gate::nand(SourceId(-1), SourceId(-2))).unwrap();
//! circuit.set_output_source(1, SourceId(1)).unwrap();
//!
//! let out = circuit.simulate(&[Bool3S::True, Bool3S::True]).unwrap();
//! assert_eq!(out, vec![Bool3S::False]);
//! ```

use serde::{Deserialize, Serialize};

use crate::{Bool3S, Gate, GateError, GateType, SourceId};

mod simulation;
pub use simulation::SimulationReport;

mod truth_table;
pub use truth_table::TruthTable;

mod validation;
pub use validation::ValidationError;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Circuit is not valid: {0}")]
    Invalid(#[from] ValidationError),
    #[error("Expected {expected} primary input values, got {got}")]
    InputCount { expected: usize, got: usize },
    #[error("Gate id {0} out of range")]
    GateIndex(usize),
    #[error("Gate {0} is not allocated")]
    GateNotAllocated(usize),
    #[error("Output id {0} out of range")]
    OutputIndex(usize),
    #[error("Unknown gate type code {0:?}")]
    UnknownGateType(String),
    #[error(transparent)]
    Gate(#[from] GateError),
}
pub type CircuitError = Error;

/// A combinational circuit over tri-state signals.
///
/// Gate slots may be empty; a slot is filled with [`Circuit::set_gate`] or
/// [`Circuit::alloc_gate`]. The circuit owns every gate it holds, so cloning
/// it copies the gates too.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    num_inputs: usize,
    gates: Vec<Option<Gate>>,
    outputs: Vec<SourceId>,
    #[serde(skip)]
    output_values: Vec<Bool3S>,
}

impl Circuit {
    /// Empty circuit: no inputs, no gates, no outputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every gate, then sets up `num_inputs` primary inputs,
    /// `num_outputs` unset outputs and `num_gates` empty gate slots.
    pub fn resize(&mut self, num_inputs: usize, num_outputs: usize, num_gates: usize) {
        self.num_inputs = num_inputs;
        self.gates.clear();
        self.gates.resize_with(num_gates, || None);
        self.outputs = vec![SourceId::UNSET; num_outputs];
        self.output_values = vec![Bool3S::Undef; num_outputs];
    }

    /// Circuit whose every gate slot is filled, with the given output
    /// sources. The parts are taken as they are; nothing is validated.
    pub(crate) fn from_parts(num_inputs: usize, gates: Vec<Gate>, outputs: Vec<SourceId>) -> Self {
        Self {
            num_inputs,
            gates: gates.into_iter().map(Some).collect(),
            output_values: vec![Bool3S::Undef; outputs.len()],
            outputs,
        }
    }

    pub fn clear(&mut self) {
        self.resize(0, 0, 0);
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Number of gate slots, allocated or not.
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    fn gate_position(&self, id: usize) -> Result<usize, Error> {
        if self.valid_gate_index(id) {
            Ok(id - 1)
        } else {
            Err(Error::GateIndex(id))
        }
    }

    fn output_position(&self, id: usize) -> Result<usize, Error> {
        if self.valid_output_index(id) {
            Ok(id - 1)
        } else {
            Err(Error::OutputIndex(id))
        }
    }

    /// Gate `id` (1-based), if that slot is allocated.
    pub fn gate(&self, id: usize) -> Option<&Gate> {
        self.gates.get(id.checked_sub(1)?)?.as_ref()
    }

    pub fn gate_mut(&mut self, id: usize) -> Option<&mut Gate> {
        self.gates.get_mut(id.checked_sub(1)?)?.as_mut()
    }

    /// Allocated gates with their ids, in slot order.
    pub fn gates(&self) -> impl Iterator<Item = (SourceId, &Gate)> {
        self.gates
            .iter()
            .enumerate()
            .filter_map(|(position, slot)| Some((SourceId::gate(position), slot.as_ref()?)))
    }

    /// Places `gate` in slot `id`, returning the gate it replaces.
    pub fn set_gate(&mut self, id: usize, gate: Gate) -> Result<Option<Gate>, Error> {
        let position = self.gate_position(id)?;
        Ok(self.gates[position].replace(gate))
    }

    /// Allocates slot `id` with a fresh gate of the kind named by the
    /// two-letter `code`; all of its inputs start unset.
    pub fn alloc_gate(&mut self, id: usize, code: &str, arity: usize) -> Result<(), Error> {
        let position = self.gate_position(id)?;
        let gate_type =
            GateType::from_code(code).ok_or_else(|| Error::UnknownGateType(code.to_owned()))?;
        self.gates[position] = Some(Gate::new(gate_type, arity)?);
        Ok(())
    }

    /// Empties slot `id`, handing its gate back to the caller.
    pub fn take_gate(&mut self, id: usize) -> Result<Option<Gate>, Error> {
        let position = self.gate_position(id)?;
        Ok(self.gates[position].take())
    }

    fn allocated(&self, id: usize) -> Result<&Gate, Error> {
        let position = self.gate_position(id)?;
        self.gates[position]
            .as_ref()
            .ok_or(Error::GateNotAllocated(id))
    }

    fn allocated_mut(&mut self, id: usize) -> Result<&mut Gate, Error> {
        let position = self.gate_position(id)?;
        self.gates[position]
            .as_mut()
            .ok_or(Error::GateNotAllocated(id))
    }

    pub fn gate_input(&self, id: usize, input: usize) -> Result<SourceId, Error> {
        Ok(self.allocated(id)?.input_source(input)?)
    }

    pub fn set_gate_input(&mut self, id: usize, input: usize, source: SourceId) -> Result<(), Error> {
        Ok(self.allocated_mut(id)?.set_input_source(input, source)?)
    }

    /// Cached output of gate `id` from the last simulation.
    pub fn gate_output(&self, id: usize) -> Result<Bool3S, Error> {
        Ok(self.allocated(id)?.output())
    }

    pub fn output_source(&self, id: usize) -> Result<SourceId, Error> {
        let position = self.output_position(id)?;
        Ok(self.outputs[position])
    }

    pub fn set_output_source(&mut self, id: usize, source: SourceId) -> Result<(), Error> {
        let position = self.output_position(id)?;
        self.outputs[position] = source;
        Ok(())
    }

    pub fn output_sources(&self) -> &[SourceId] {
        &self.outputs
    }

    /// Value of output `id` from the last simulation.
    pub fn output_value(&self, id: usize) -> Result<Bool3S, Error> {
        let position = self.output_position(id)?;
        Ok(self.output_values.get(position).copied().unwrap_or_default())
    }

    pub fn output_values(&self) -> &[Bool3S] {
        &self.output_values
    }
}
