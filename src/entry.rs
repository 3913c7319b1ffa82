//! Interactive circuit entry.
//!
//! Answers come from an [`InputProvider`], one whitespace-separated token per
//! request. An answer that fails its check is logged and asked for again, so
//! the returned circuit is always valid. Running out of answers is the only
//! way to stop early.

use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
};

use tracing::debug;

use crate::{Bool3S, Circuit, CircuitError, Gate, GateError, GateType, SourceId};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Input ended while waiting for: {prompt}")]
    Exhausted { prompt: String },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Circuit(#[from] CircuitError),
    #[error(transparent)]
    Gate(#[from] GateError),
}
pub type EntryError = Error;

/// Largest count or arity accepted as an answer. Slots are allocated up
/// front, so bigger answers are asked for again.
pub const MAX_ANSWER_COUNT: usize = 1 << 16;

/// Source of answers for interactive entry.
pub trait InputProvider {
    /// Shows `prompt` and returns the next token, or `None` once input is
    /// exhausted.
    fn next_token(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Pre-recorded answers. Keeps every prompt it was shown.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    tokens: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Answers taken from the whitespace-separated tokens of `text`.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.split_whitespace())
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }
}

impl InputProvider for ScriptedInput {
    fn next_token(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_owned());
        Ok(self.tokens.pop_front())
    }
}

/// Prompts on a writer and reads tokens from a line-oriented reader.
pub struct ConsoleInput<R, W> {
    reader: R,
    writer: W,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> ConsoleInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            pending: VecDeque::new(),
        }
    }
}

impl ConsoleInput<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> InputProvider for ConsoleInput<R, W> {
    fn next_token(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.writer, "{prompt}")?;
        self.writer.flush()?;

        let mut line = String::new();
        while self.pending.is_empty() {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
        Ok(self.pending.pop_front())
    }
}

/// Asks `prompt` until `accept` takes the answer.
fn ask<T>(
    input: &mut impl InputProvider,
    prompt: &str,
    mut accept: impl FnMut(&str) -> Option<T>,
) -> Result<T, Error> {
    loop {
        let Some(answer) = input.next_token(prompt)? else {
            return Err(Error::Exhausted {
                prompt: prompt.to_owned(),
            });
        };
        match accept(answer.trim()) {
            Some(value) => return Ok(value),
            None => debug!(prompt, answer = %answer, "rejected answer"),
        }
    }
}

fn ask_count(input: &mut impl InputProvider, prompt: &str) -> Result<usize, Error> {
    ask(input, prompt, |answer| {
        answer
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=MAX_ANSWER_COUNT).contains(n))
    })
}

fn ask_source(
    input: &mut impl InputProvider,
    circuit: &Circuit,
    prompt: &str,
) -> Result<SourceId, Error> {
    ask(input, prompt, |answer| {
        answer
            .parse::<i32>()
            .ok()
            .map(SourceId)
            .filter(|&id| circuit.valid_source(id))
    })
}

/// Builds a circuit from answers: input, output and gate counts, then per
/// gate its type code, arity (skipped for NOT) and sources, then the source
/// of each output.
pub fn read_circuit(input: &mut impl InputProvider) -> Result<Circuit, Error> {
    let num_inputs = ask_count(input, "Number of circuit inputs: ")?;
    let num_outputs = ask_count(input, "Number of circuit outputs: ")?;
    let num_gates = ask_count(input, "Number of gates: ")?;

    let mut circuit = Circuit::new();
    circuit.resize(num_inputs, num_outputs, num_gates);

    for id in 1..=num_gates {
        let gate_type = ask(
            input,
            &format!("Type of gate {id} (NT, AN, NA, OR, NO, XO, NX): "),
            GateType::from_code,
        )?;
        let arity = match gate_type {
            GateType::Not => gate_type.default_arity(),
            _ => ask(input, &format!("Number of inputs of gate {id}: "), |answer| {
                answer
                    .parse::<usize>()
                    .ok()
                    .filter(|&n| n <= MAX_ANSWER_COUNT && gate_type.valid_arity(n))
            })?,
        };

        let mut gate = Gate::new(gate_type, arity)?;
        for position in 0..arity {
            let prompt = format!("Source of input {} of gate {id}: ", position + 1);
            let source = ask_source(input, &circuit, &prompt)?;
            gate.set_input_source(position, source)?;
        }
        circuit.set_gate(id, gate)?;
    }

    for id in 1..=num_outputs {
        let prompt = format!("Source of output {id}: ");
        let source = ask_source(input, &circuit, &prompt)?;
        circuit.set_output_source(id, source)?;
    }

    Ok(circuit)
}

/// Reads one tri-state value per primary input (`F`, `?` or `T`).
pub fn read_inputs(input: &mut impl InputProvider, num_inputs: usize) -> Result<Vec<Bool3S>, Error> {
    (1..=num_inputs)
        .map(|id| {
            ask(input, &format!("Value of input {id} (F, ?, T): "), |answer| {
                answer.parse::<Bool3S>().ok()
            })
        })
        .collect()
}
