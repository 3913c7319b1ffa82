use tracing::{debug, debug_span, trace};

use super::Error;
use crate::{Bool3S, Circuit, Source, SourceId};

/// Outcome of one [`Circuit::simulate_with_report`] run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationReport {
    pub outputs: Vec<Bool3S>,
    /// Number of propagation passes performed.
    pub passes: usize,
    /// Gates whose output stayed undefined, e.g. because they sit on a cycle
    /// no primary input can break.
    pub unresolved: Vec<SourceId>,
}

impl Circuit {
    /// Value of `id` given the primary inputs and the gates' current cached
    /// outputs. Gate outputs are read as they are, never forced.
    fn resolve(&self, id: SourceId, inputs: &[Bool3S]) -> Bool3S {
        match id.source() {
            Source::Input(position) => inputs.get(position).copied().unwrap_or_default(),
            Source::Gate(position) => self
                .gates
                .get(position)
                .and_then(Option::as_ref)
                .map(|gate| gate.output())
                .unwrap_or_default(),
            Source::Unset => Bool3S::Undef,
        }
    }

    /// Resolves every gate and output from the primary `inputs` and returns
    /// the output values. See [`Circuit::simulate_with_report`].
    pub fn simulate(&mut self, inputs: &[Bool3S]) -> Result<Vec<Bool3S>, Error> {
        self.simulate_with_report(inputs).map(|report| report.outputs)
    }

    /// Fixpoint propagation over the gate arena.
    ///
    /// All gate outputs start undefined. Each pass evaluates, in slot order,
    /// every gate whose output is still undefined against the current values
    /// of its sources. The run stops once every gate is defined or a pass
    /// defines no new gate, so it needs at most one pass per gate and a
    /// cycle without a defined input just stays undefined.
    ///
    /// The circuit must be [valid](Circuit::validate) and `inputs` must hold
    /// one value per primary input.
    pub fn simulate_with_report(&mut self, inputs: &[Bool3S]) -> Result<SimulationReport, Error> {
        self.validate()?;
        if inputs.len() != self.num_inputs {
            return Err(Error::InputCount {
                expected: self.num_inputs,
                got: inputs.len(),
            });
        }

        let _span = debug_span!("simulate", gates = self.gates.len()).entered();

        for gate in self.gates.iter_mut().flatten() {
            gate.reset();
        }

        let mut passes = 0;
        loop {
            passes += 1;
            let mut all_resolved = true;
            let mut progressed = false;

            for position in 0..self.gates.len() {
                let resolved = match &self.gates[position] {
                    Some(gate) if !gate.output().is_defined() => gate
                        .inputs()
                        .iter()
                        .map(|&id| self.resolve(id, inputs))
                        .collect::<Vec<_>>(),
                    _ => continue,
                };

                if let Some(gate) = self.gates[position].as_mut() {
                    if gate.evaluate(&resolved)?.is_defined() {
                        progressed = true;
                    } else {
                        all_resolved = false;
                    }
                }
            }

            trace!(pass = passes, all_resolved, progressed, "propagation pass");

            if all_resolved || !progressed {
                break;
            }
        }

        let outputs = self
            .outputs
            .iter()
            .map(|&id| self.resolve(id, inputs))
            .collect::<Vec<_>>();
        self.output_values = outputs.clone();

        let unresolved = self
            .gates()
            .filter(|(_, gate)| !gate.output().is_defined())
            .map(|(id, _)| id)
            .collect::<Vec<_>>();

        if unresolved.is_empty() {
            debug!(passes, "all gates resolved");
        } else {
            debug!(passes, unresolved = unresolved.len(), "propagation stalled");
        }

        Ok(SimulationReport {
            outputs,
            passes,
            unresolved,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;
    use crate::{CircuitError, Gate, GateType, ValidationError, test_utils::trng};

    use Bool3S::{False as F, True as T, Undef as U};

    fn nand() -> Circuit {
        let mut circuit = Circuit::new();
        circuit.resize(2, 1, 1);
        circuit
            .set_gate(1, Gate::nand(SourceId(-1), SourceId(-2)))
            .unwrap();
        circuit.set_output_source(1, SourceId(1)).unwrap();
        circuit
    }

    #[test_log::test]
    fn test_single_nand() {
        let mut circuit = nand();
        assert_eq!(circuit.simulate(&[T, T]), Ok(vec![F]));
        assert_eq!(circuit.simulate(&[F, T]), Ok(vec![T]));
        assert_eq!(circuit.simulate(&[U, T]), Ok(vec![U]));
        assert_eq!(circuit.output_values(), &[U]);
    }

    #[test_log::test]
    fn test_not_chain() {
        let mut circuit = Circuit::new();
        circuit.resize(1, 1, 3);
        circuit.set_gate(1, Gate::not(SourceId(-1))).unwrap();
        circuit.set_gate(2, Gate::not(SourceId(1))).unwrap();
        circuit.set_gate(3, Gate::not(SourceId(2))).unwrap();
        circuit.set_output_source(1, SourceId(3)).unwrap();

        let report = circuit.simulate_with_report(&[T]).unwrap();
        assert_eq!(report.outputs, vec![F]);
        assert_eq!(report.passes, 1, "slot order already matches data flow");
        assert!(report.unresolved.is_empty());
    }

    #[test_log::test]
    fn test_reverse_chain_needs_one_pass_per_gate() {
        // gate 1 <- gate 2 <- gate 3 <- input 1
        let mut circuit = Circuit::new();
        circuit.resize(1, 1, 3);
        circuit.set_gate(1, Gate::not(SourceId(2))).unwrap();
        circuit.set_gate(2, Gate::not(SourceId(3))).unwrap();
        circuit.set_gate(3, Gate::not(SourceId(-1))).unwrap();
        circuit.set_output_source(1, SourceId(1)).unwrap();

        let report = circuit.simulate_with_report(&[F]).unwrap();
        assert_eq!(report.outputs, vec![T]);
        assert_eq!(report.passes, 3);
    }

    #[test_log::test]
    fn test_ungrounded_cycle_terminates() {
        let mut circuit = Circuit::new();
        circuit.resize(1, 2, 2);
        circuit.set_gate(1, Gate::not(SourceId(2))).unwrap();
        circuit.set_gate(2, Gate::not(SourceId(1))).unwrap();
        circuit.set_output_source(1, SourceId(1)).unwrap();
        circuit.set_output_source(2, SourceId(2)).unwrap();

        let report = circuit.simulate_with_report(&[T]).unwrap();
        assert_eq!(report.outputs, vec![U, U]);
        assert!(report.passes <= circuit.num_gates());
        assert_eq!(report.unresolved, vec![SourceId(1), SourceId(2)]);
    }

    #[test_log::test]
    fn test_short_circuit_breaks_cycle() {
        // gate 1 = AND(input 1, gate 2), gate 2 = NOT(gate 1)
        let mut circuit = Circuit::new();
        circuit.resize(1, 2, 2);
        circuit
            .set_gate(1, Gate::and(SourceId(-1), SourceId(2)))
            .unwrap();
        circuit.set_gate(2, Gate::not(SourceId(1))).unwrap();
        circuit.set_output_source(1, SourceId(1)).unwrap();
        circuit.set_output_source(2, SourceId(2)).unwrap();

        assert_eq!(circuit.simulate(&[F]), Ok(vec![F, T]));
        assert_eq!(circuit.simulate(&[T]), Ok(vec![U, U]));
    }

    #[test]
    fn test_outputs_can_read_inputs_directly() {
        let mut circuit = nand();
        circuit.resize(2, 2, 1);
        circuit
            .set_gate(1, Gate::xor(SourceId(-1), SourceId(-2)))
            .unwrap();
        circuit.set_output_source(1, SourceId(-2)).unwrap();
        circuit.set_output_source(2, SourceId(1)).unwrap();

        assert_eq!(circuit.simulate(&[T, F]), Ok(vec![F, T]));
    }

    #[test]
    fn test_empty_slots_are_skipped() {
        let mut circuit = Circuit::new();
        circuit.resize(1, 1, 3);
        circuit.set_gate(2, Gate::not(SourceId(-1))).unwrap();
        circuit.set_output_source(1, SourceId(2)).unwrap();

        let report = circuit.simulate_with_report(&[F]).unwrap();
        assert_eq!(report.outputs, vec![T]);
        assert!(report.unresolved.is_empty());
    }

    #[test]
    fn test_invalid_circuit_is_rejected() {
        let mut circuit = nand();
        circuit.set_output_source(1, SourceId(4)).unwrap();
        assert_eq!(
            circuit.simulate(&[T, T]),
            Err(CircuitError::Invalid(ValidationError::OutputSource {
                output: 1,
                id: SourceId(4)
            }))
        );

        let mut empty = Circuit::new();
        assert_eq!(
            empty.simulate(&[]),
            Err(CircuitError::Invalid(ValidationError::NoInputs))
        );
    }

    #[test]
    fn test_input_count_is_checked() {
        let mut circuit = nand();
        assert_eq!(
            circuit.simulate(&[T]),
            Err(CircuitError::InputCount {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_previous_run_does_not_leak() {
        let mut circuit = nand();
        circuit.simulate(&[F, F]).unwrap();
        assert_eq!(circuit.gate_output(1), Ok(T));

        assert_eq!(circuit.simulate(&[U, U]), Ok(vec![U]));
        assert_eq!(circuit.gate_output(1), Ok(U));
    }

    #[test]
    fn test_random_circuits_are_deterministic() {
        let mut rng = trng();

        for _ in 0..50 {
            let num_inputs: usize = rng.random_range(1..4);
            let num_gates: usize = rng.random_range(1..8);
            let mut circuit = Circuit::new();
            circuit.resize(num_inputs, 2, num_gates);

            let num_sources = (num_inputs + num_gates) as i32;
            let pick = |rng: &mut rand_chacha::ChaCha20Rng| {
                let k = rng.random_range(0..num_sources);
                if k < num_inputs as i32 {
                    SourceId(-k - 1)
                } else {
                    SourceId(k - num_inputs as i32 + 1)
                }
            };

            for id in 1..=num_gates {
                let gate_type = GateType::ALL[rng.random_range(0..GateType::ALL.len())];
                let arity = if gate_type == GateType::Not {
                    1
                } else {
                    rng.random_range(2..4)
                };
                let inputs = (0..arity).map(|_| pick(&mut rng)).collect();
                circuit
                    .set_gate(id, Gate::with_inputs(gate_type, inputs).unwrap())
                    .unwrap();
            }
            for output in 1..=2 {
                let id = pick(&mut rng);
                circuit.set_output_source(output, id).unwrap();
            }

            let inputs = (0..num_inputs)
                .map(|_| Bool3S::ALL[rng.random_range(0..3)])
                .collect::<Vec<_>>();

            let first = circuit.simulate_with_report(&inputs).unwrap();
            let second = circuit.clone().simulate_with_report(&inputs).unwrap();
            assert_eq!(first, second);
            assert!(first.passes <= num_gates);
        }
    }
}
