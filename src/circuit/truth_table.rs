use std::fmt;

use itertools::Itertools;

use super::Error;
use crate::{Bool3S, Circuit};

/// Outputs of a circuit for every tri-state input vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TruthTable {
    pub rows: Vec<(Vec<Bool3S>, Vec<Bool3S>)>,
}

impl TruthTable {
    pub fn get(&self, inputs: &[Bool3S]) -> Option<&[Bool3S]> {
        self.rows
            .iter()
            .find(|(row_inputs, _)| row_inputs == inputs)
            .map(|(_, outputs)| outputs.as_slice())
    }
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (inputs, outputs) in &self.rows {
            writeln!(f, "{} | {}", inputs.iter().join(" "), outputs.iter().join(" "))?;
        }
        Ok(())
    }
}

impl Circuit {
    /// Simulates every input vector in `{F, ?, T}^num_inputs`, last input
    /// varying fastest. Runs on a copy so the cached values of `self` are
    /// left untouched.
    pub fn truth_table(&self) -> Result<TruthTable, Error> {
        self.validate()?;
        let mut scratch = self.clone();

        let rows = (0..self.num_inputs)
            .map(|_| Bool3S::ALL)
            .multi_cartesian_product()
            .map(|inputs| -> Result<_, Error> {
                let outputs = scratch.simulate(&inputs)?;
                Ok((inputs, outputs))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TruthTable { rows })
    }
}
