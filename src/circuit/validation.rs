use crate::{Circuit, Source, SourceId};

/// First structural defect found by [`Circuit::validate`].
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Circuit has no primary inputs")]
    NoInputs,
    #[error("Circuit has no outputs")]
    NoOutputs,
    #[error("Circuit has no allocated gates")]
    NoGates,
    #[error("Input {input} of gate {gate} has invalid source id {id}")]
    GateSource { gate: usize, input: usize, id: SourceId },
    #[error("Input {input} of gate {gate} reads unallocated gate {id}")]
    GateSourceUnallocated { gate: usize, input: usize, id: SourceId },
    #[error("Output {output} has invalid source id {id}")]
    OutputSource { output: usize, id: SourceId },
    #[error("Output {output} reads unallocated gate {id}")]
    OutputSourceUnallocated { output: usize, id: SourceId },
}
pub type ValidationError = Error;

/// Why a source id can't be read.
enum Fault {
    OutOfRange,
    Unallocated,
}

impl Circuit {
    /// `id` names a primary input, i.e. lies in `[-num_inputs, -1]`.
    pub fn valid_primary_input(&self, id: SourceId) -> bool {
        matches!(id.source(), Source::Input(position) if position < self.num_inputs)
    }

    /// `index` is a 1-based output id.
    pub fn valid_output_index(&self, index: usize) -> bool {
        (1..=self.outputs.len()).contains(&index)
    }

    /// `index` is a 1-based gate id, whether or not its slot is allocated.
    pub fn valid_gate_index(&self, index: usize) -> bool {
        (1..=self.gates.len()).contains(&index)
    }

    /// `id` names a primary input or a gate slot.
    pub fn valid_source(&self, id: SourceId) -> bool {
        match id.source() {
            Source::Input(_) => self.valid_primary_input(id),
            Source::Gate(position) => self.valid_gate_index(position + 1),
            Source::Unset => false,
        }
    }

    pub fn gate_allocated(&self, index: usize) -> bool {
        self.gate(index).is_some()
    }

    /// Gate `index` is allocated and each of its inputs has a valid source.
    pub fn gate_well_formed(&self, index: usize) -> bool {
        self.gate(index)
            .is_some_and(|gate| gate.inputs().iter().all(|&id| self.valid_source(id)))
    }

    fn check_source(&self, id: SourceId) -> Result<(), Fault> {
        match id.source() {
            _ if !self.valid_source(id) => Err(Fault::OutOfRange),
            Source::Gate(position) if !self.gate_allocated(position + 1) => {
                Err(Fault::Unallocated)
            }
            _ => Ok(()),
        }
    }

    /// Checks the circuit is ready to simulate or persist, reporting the first
    /// defect. Cycles are allowed; they only leave outputs undefined.
    pub fn validate(&self) -> Result<(), Error> {
        if self.num_inputs == 0 {
            return Err(Error::NoInputs);
        }
        if self.outputs.is_empty() {
            return Err(Error::NoOutputs);
        }
        if self.gates().next().is_none() {
            return Err(Error::NoGates);
        }

        for (gate_id, gate) in self.gates() {
            let gate_index = gate_id.0 as usize;
            for (position, &id) in gate.inputs().iter().enumerate() {
                let input = position + 1;
                match self.check_source(id) {
                    Ok(()) => {}
                    Err(Fault::OutOfRange) => {
                        return Err(Error::GateSource {
                            gate: gate_index,
                            input,
                            id,
                        });
                    }
                    Err(Fault::Unallocated) => {
                        return Err(Error::GateSourceUnallocated {
                            gate: gate_index,
                            input,
                            id,
                        });
                    }
                }
            }
        }

        for (position, &id) in self.outputs.iter().enumerate() {
            let output = position + 1;
            match self.check_source(id) {
                Ok(()) => {}
                Err(Fault::OutOfRange) => return Err(Error::OutputSource { output, id }),
                Err(Fault::Unallocated) => {
                    return Err(Error::OutputSourceUnallocated { output, id });
                }
            }
        }

        Ok(())
    }

    pub fn valid(&self) -> bool {
        self.validate().is_ok()
    }
}
