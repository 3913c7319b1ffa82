//! Combinational logic circuits over three-valued signals.
//!
//! A [`Circuit`] owns a fixed number of primary inputs, an arena of [`Gate`]
//! slots and a list of outputs, all wired through signed [`SourceId`]s.
//! [`Circuit::simulate`] resolves the outputs by fixpoint propagation, so
//! gates may be listed in any order and cycles are allowed: a cycle that no
//! defined input breaks simply stays [`Bool3S::Undef`].

pub mod circuit;
mod core;
pub mod entry;
pub mod format;
pub mod logging;

pub use crate::core::{
    bool3s::{Bool3S, ParseBool3SError},
    gate::{Gate, GateError},
    gate_type::{GateType, UnknownGateType},
    source::{Source, SourceId},
};

pub use circuit::{Circuit, CircuitError, SimulationReport, TruthTable, ValidationError};
pub use entry::{ConsoleInput, EntryError, InputProvider, ScriptedInput};
pub use format::FormatError;
pub use logging::init_tracing;
