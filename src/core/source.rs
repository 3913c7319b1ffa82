use std::{fmt, ops::Deref};

use serde::{Deserialize, Serialize};

/// Signed reference to a signal source inside a circuit.
///
/// One id space covers both kinds of source:
/// - `id > 0` is the output of gate `id` (slot `id - 1`)
/// - `id < 0` is primary input `-id` (position `-id - 1`)
/// - `id == 0` is unset and never a legal reference
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(pub i32);

/// A [`SourceId`] decoded into a 0-based position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Source {
    Unset,
    Input(usize),
    Gate(usize),
}

impl SourceId {
    pub const UNSET: SourceId = SourceId(0);

    /// Most inputs, or gates, a circuit can address with an `i32` id.
    pub const MAX_COUNT: usize = i32::MAX as usize;

    /// Id of the primary input at 0-based `position`, which must be below
    /// [`Self::MAX_COUNT`].
    pub const fn input(position: usize) -> Self {
        debug_assert!(position < Self::MAX_COUNT);
        SourceId(-(position as i32) - 1)
    }

    /// Id of the gate at 0-based `position`, which must be below
    /// [`Self::MAX_COUNT`].
    pub const fn gate(position: usize) -> Self {
        debug_assert!(position < Self::MAX_COUNT);
        SourceId(position as i32 + 1)
    }

    pub const fn source(self) -> Source {
        match self.0 {
            0 => Source::Unset,
            id if id < 0 => Source::Input((id.unsigned_abs() - 1) as usize),
            id => Source::Gate((id - 1) as usize),
        }
    }

    pub const fn is_unset(self) -> bool {
        self.0 == 0
    }
}

impl From<i32> for SourceId {
    fn from(id: i32) -> Self {
        SourceId(id)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for SourceId {
    type Target = i32;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
