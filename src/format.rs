//! Text persistence format.
//!
//! ```text
//! CIRCUITO <inputs> <outputs> <gates>
//! PORTAS
//! 1) NA -1 -2
//! SAIDAS
//! 1) 1
//! ```
//!
//! Gate lines carry a two-letter type code (any case on input, upper case
//! on output) followed by one source id per gate input. Indices are 1-based
//! and must be sequential. A load either yields a valid circuit or fails
//! without touching the circuit it was meant to replace.

use std::{fs, path::Path, str::FromStr};

use tracing::debug;

use crate::{Circuit, Gate, GateType, Source, SourceId, ValidationError};

const HEADER: &str = "CIRCUITO";
const GATES: &str = "PORTAS";
const OUTPUTS: &str = "SAIDAS";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Line {line}: expected {expected}, found {found:?}")]
    UnexpectedToken {
        line: usize,
        expected: &'static str,
        found: String,
    },
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },
    #[error("Line {line}: expected index {expected}, found {found:?}")]
    BadIndex {
        line: usize,
        expected: usize,
        found: String,
    },
    #[error("Line {line}: unknown gate type {code:?}")]
    BadType { line: usize, code: String },
    #[error("Line {line}: {gate_type} gate can't have {arity} inputs")]
    BadArity {
        line: usize,
        gate_type: GateType,
        arity: usize,
    },
    #[error("Line {line}: can't read a number from {token:?}")]
    BadNumber { line: usize, token: String },
    #[error("Line {line}: invalid source id {id}")]
    BadSource { line: usize, id: SourceId },
    #[error("Gate slot {0} is empty and can't be written")]
    UnallocatedGate(usize),
    #[error("Circuit is not valid: {0}")]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
pub type FormatError = Error;

/// Non-blank lines of the input, split into whitespace tokens and numbered
/// from 1.
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
        }
    }

    fn next_tokens(&mut self) -> Option<(usize, Vec<&'a str>)> {
        self.inner.by_ref().find_map(|(n, line)| {
            let tokens = line.split_whitespace().collect::<Vec<_>>();
            (!tokens.is_empty()).then_some((n + 1, tokens))
        })
    }

    fn expect_tokens(&mut self, expected: &'static str) -> Result<(usize, Vec<&'a str>), Error> {
        self.next_tokens().ok_or(Error::UnexpectedEof { expected })
    }

    fn expect_keyword(&mut self, keyword: &'static str) -> Result<(), Error> {
        let (line, tokens) = self.expect_tokens(keyword)?;
        match tokens.as_slice() {
            [token] if *token == keyword => Ok(()),
            _ => Err(Error::UnexpectedToken {
                line,
                expected: keyword,
                found: tokens.join(" "),
            }),
        }
    }
}

/// Reads a header count. Counts past what an `i32` source id can address are
/// rejected like any other malformed number.
fn parse_count(line: usize, token: &str) -> Result<usize, Error> {
    token
        .parse::<usize>()
        .ok()
        .filter(|&count| count <= SourceId::MAX_COUNT)
        .ok_or_else(|| Error::BadNumber {
            line,
            token: token.to_owned(),
        })
}

/// Header counts of a circuit being read. Slots are only created once their
/// lines have been read, so a header can't make the parser allocate more than
/// the text holds.
struct Shape {
    num_inputs: usize,
    num_gates: usize,
}

impl Shape {
    fn parse_source(&self, line: usize, token: &str) -> Result<SourceId, Error> {
        let id = token.parse::<i32>().map(SourceId).map_err(|_| Error::BadNumber {
            line,
            token: token.to_owned(),
        })?;
        let known = match id.source() {
            Source::Input(position) => position < self.num_inputs,
            Source::Gate(position) => position < self.num_gates,
            Source::Unset => false,
        };
        if known {
            Ok(id)
        } else {
            Err(Error::BadSource { line, id })
        }
    }
}

/// Splits `<index>) rest...` (or `<index> ) rest...`), checking the index is
/// `expected`.
fn split_index<'t, 'a>(
    line: usize,
    tokens: &'t [&'a str],
    expected: usize,
) -> Result<&'t [&'a str], Error> {
    let (index, rest) = match tokens {
        [first, rest @ ..] if first.len() > 1 && first.ends_with(')') => {
            (&first[..first.len() - 1], rest)
        }
        [first, ")", rest @ ..] => (*first, rest),
        _ => {
            return Err(Error::UnexpectedToken {
                line,
                expected: "<index>)",
                found: tokens.join(" "),
            });
        }
    };

    match index.parse::<usize>() {
        Ok(found) if found == expected => Ok(rest),
        _ => Err(Error::BadIndex {
            line,
            expected,
            found: index.to_owned(),
        }),
    }
}

/// Reads a circuit from its text form and validates it.
pub fn parse(text: &str) -> Result<Circuit, Error> {
    let mut lines = Lines::new(text);

    let (line, tokens) = lines.expect_tokens(HEADER)?;
    let (num_inputs, num_outputs, num_gates) = match tokens.as_slice() {
        [HEADER, inputs, outputs, gates] => (
            parse_count(line, inputs)?,
            parse_count(line, outputs)?,
            parse_count(line, gates)?,
        ),
        _ => {
            return Err(Error::UnexpectedToken {
                line,
                expected: "CIRCUITO <inputs> <outputs> <gates>",
                found: tokens.join(" "),
            });
        }
    };
    let shape = Shape {
        num_inputs,
        num_gates,
    };

    lines.expect_keyword(GATES)?;
    let mut gates = Vec::new();
    for id in 1..=num_gates {
        let (line, tokens) = lines.expect_tokens("gate line")?;
        let (code, sources) = match split_index(line, &tokens, id)? {
            [code, sources @ ..] => (*code, sources),
            [] => {
                return Err(Error::UnexpectedToken {
                    line,
                    expected: "gate type",
                    found: String::new(),
                });
            }
        };

        let gate_type = GateType::from_code(code).ok_or_else(|| Error::BadType {
            line,
            code: code.to_owned(),
        })?;
        let inputs = sources
            .iter()
            .map(|token| shape.parse_source(line, token))
            .collect::<Result<Vec<_>, _>>()?;
        let arity = inputs.len();
        let gate = Gate::with_inputs(gate_type, inputs).map_err(|_| Error::BadArity {
            line,
            gate_type,
            arity,
        })?;
        gates.push(gate);
    }

    lines.expect_keyword(OUTPUTS)?;
    let mut outputs = Vec::new();
    for id in 1..=num_outputs {
        let (line, tokens) = lines.expect_tokens("output line")?;
        match split_index(line, &tokens, id)? {
            [token] => outputs.push(shape.parse_source(line, token)?),
            rest => {
                return Err(Error::UnexpectedToken {
                    line,
                    expected: "one source id",
                    found: rest.join(" "),
                });
            }
        }
    }

    if let Some((line, tokens)) = lines.next_tokens() {
        return Err(Error::UnexpectedToken {
            line,
            expected: "end of input",
            found: tokens.join(" "),
        });
    }

    let circuit = Circuit::from_parts(num_inputs, gates, outputs);
    circuit.validate()?;
    Ok(circuit)
}

/// Renders a valid circuit in text form. Every gate slot must be allocated.
pub fn write(circuit: &Circuit) -> Result<String, Error> {
    circuit.validate()?;

    let mut text = format!(
        "{HEADER} {} {} {}\n{GATES}\n",
        circuit.num_inputs(),
        circuit.num_outputs(),
        circuit.num_gates()
    );
    for id in 1..=circuit.num_gates() {
        let gate = circuit.gate(id).ok_or(Error::UnallocatedGate(id))?;
        text.push_str(&format!("{id}) {gate}\n"));
    }
    text.push_str(OUTPUTS);
    text.push('\n');
    for (position, source) in circuit.output_sources().iter().enumerate() {
        text.push_str(&format!("{}) {source}\n", position + 1));
    }
    Ok(text)
}

impl FromStr for Circuit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl Circuit {
    /// Replaces `self` with the circuit stored at `path`. On any error `self`
    /// is left as it was.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let circuit = parse(&fs::read_to_string(path)?)?;
        debug!(
            path = %path.display(),
            inputs = circuit.num_inputs(),
            outputs = circuit.num_outputs(),
            gates = circuit.num_gates(),
            "loaded circuit"
        );
        *self = circuit;
        Ok(())
    }

    /// Writes the circuit to `path`. An invalid circuit is rejected before the
    /// file is created.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let text = write(self)?;
        fs::write(path, text)?;
        debug!(path = %path.display(), "saved circuit");
        Ok(())
    }
}
