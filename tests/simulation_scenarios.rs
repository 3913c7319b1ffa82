// End-to-end scenarios through the public API: build, validate, simulate.

use trilogic::{Bool3S, Circuit, CircuitError, Gate, GateType, SourceId, ValidationError};

use Bool3S::{False as F, True as T, Undef as U};

fn circuit(num_inputs: usize, gates: Vec<Gate>, outputs: &[i32]) -> Circuit {
    let mut circuit = Circuit::new();
    circuit.resize(num_inputs, outputs.len(), gates.len());
    for (position, gate) in gates.into_iter().enumerate() {
        circuit.set_gate(position + 1, gate).unwrap();
    }
    for (position, &id) in outputs.iter().enumerate() {
        circuit.set_output_source(position + 1, SourceId(id)).unwrap();
    }
    circuit
}

#[test_log::test]
fn single_nand_gate() {
    let mut nand = circuit(2, vec![Gate::nand(SourceId(-1), SourceId(-2))], &[1]);

    assert_eq!(nand.simulate(&[T, T]), Ok(vec![F]));
    assert_eq!(nand.simulate(&[F, T]), Ok(vec![T]));
    assert_eq!(nand.simulate(&[U, T]), Ok(vec![U]));
    assert_eq!(nand.simulate(&[U, F]), Ok(vec![T]));
}

#[test_log::test]
fn not_chain_of_three() {
    let mut chain = circuit(
        1,
        vec![
            Gate::not(SourceId(-1)),
            Gate::not(SourceId(1)),
            Gate::not(SourceId(2)),
        ],
        &[3],
    );

    assert_eq!(chain.simulate(&[T]), Ok(vec![F]));
    assert_eq!(chain.simulate(&[F]), Ok(vec![T]));
    assert_eq!(chain.simulate(&[U]), Ok(vec![U]));
}

#[test_log::test]
fn mutual_cycle_stays_undefined() {
    let mut cycle = circuit(
        1,
        vec![Gate::not(SourceId(2)), Gate::not(SourceId(1))],
        &[1, 2],
    );

    let report = cycle.simulate_with_report(&[T]).unwrap();
    assert_eq!(report.outputs, vec![U, U]);
    assert!(report.passes <= cycle.num_gates());
    assert_eq!(report.unresolved.len(), 2);
}

#[test_log::test]
fn full_adder_in_scrambled_order() {
    // sum = a ^ b ^ cin, carry = (a & b) | (cin & (a ^ b)),
    // listed so that every gate reads gates further down the list.
    let mut adder = circuit(
        3,
        vec![
            Gate::or(SourceId(3), SourceId(4)),   // 1: carry
            Gate::xor(SourceId(5), SourceId(-3)), // 2: sum
            Gate::and(SourceId(-1), SourceId(-2)), // 3
            Gate::and(SourceId(5), SourceId(-3)), // 4
            Gate::xor(SourceId(-1), SourceId(-2)), // 5
        ],
        &[2, 1],
    );

    for a in [false, true] {
        for b in [false, true] {
            for cin in [false, true] {
                let total = a as u8 + b as u8 + cin as u8;
                let expected = vec![Bool3S::from(total % 2 == 1), Bool3S::from(total >= 2)];
                let inputs = [a, b, cin].map(Bool3S::from);
                assert_eq!(adder.simulate(&inputs), Ok(expected), "{a} {b} {cin}");
            }
        }
    }

    // Both operands set: the carry is known even with an unknown carry-in.
    assert_eq!(adder.simulate(&[T, T, U]), Ok(vec![U, T]));
    assert_eq!(adder.simulate(&[F, F, U]), Ok(vec![U, F]));
}

#[test]
fn wide_gates() {
    let mut wide = circuit(
        4,
        vec![
            Gate::with_inputs(
                GateType::Nor,
                vec![SourceId(-1), SourceId(-2), SourceId(-3), SourceId(-4)],
            )
            .unwrap(),
            Gate::with_inputs(GateType::Nxor, vec![SourceId(-1), SourceId(-2), SourceId(-3)])
                .unwrap(),
        ],
        &[1, 2],
    );

    assert_eq!(wide.simulate(&[F, F, F, F]), Ok(vec![T, T]));
    assert_eq!(wide.simulate(&[F, U, T, F]), Ok(vec![F, U]));
    assert_eq!(wide.simulate(&[T, T, T, U]), Ok(vec![F, F]));
}

#[test]
fn invalid_circuits_are_rejected_before_simulation() {
    let mut dangling = circuit(1, vec![Gate::not(SourceId(-2))], &[1]);
    assert_eq!(
        dangling.simulate(&[T]),
        Err(CircuitError::Invalid(ValidationError::GateSource {
            gate: 1,
            input: 1,
            id: SourceId(-2)
        }))
    );

    let mut no_outputs = circuit(1, vec![Gate::not(SourceId(-1))], &[]);
    assert!(!no_outputs.valid());
    assert!(matches!(
        no_outputs.simulate(&[T]),
        Err(CircuitError::Invalid(ValidationError::NoOutputs))
    ));
}
