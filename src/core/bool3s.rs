use std::{
    fmt,
    ops::{BitAnd, BitOr, BitXor, Not},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Three-valued signal: a defined `False`/`True`, or `Undef` for a value
/// that is unknown or not yet computed.
///
/// The binary operators follow strong Kleene logic, so a defined operand can
/// force the result while the other one is still `Undef`:
///
/// ```rust
/// use trilogic::Bool3S;
///
/// assert_eq!(Bool3S::False & Bool3S::Undef, Bool3S::False);
/// assert_eq!(Bool3S::True | Bool3S::Undef, Bool3S::True);
/// assert_eq!(Bool3S::True ^ Bool3S::Undef, Bool3S::Undef);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bool3S {
    False,
    #[default]
    Undef,
    True,
}

impl Bool3S {
    /// All values in the order used for input enumeration.
    pub const ALL: [Bool3S; 3] = [Bool3S::False, Bool3S::Undef, Bool3S::True];

    pub const fn is_defined(self) -> bool {
        !matches!(self, Bool3S::Undef)
    }

    pub const fn to_bool(self) -> Option<bool> {
        match self {
            Bool3S::False => Some(false),
            Bool3S::Undef => None,
            Bool3S::True => Some(true),
        }
    }

    const fn symbol(self) -> char {
        match self {
            Bool3S::False => 'F',
            Bool3S::Undef => '?',
            Bool3S::True => 'T',
        }
    }
}

impl From<bool> for Bool3S {
    fn from(value: bool) -> Self {
        if value { Bool3S::True } else { Bool3S::False }
    }
}

impl From<Option<bool>> for Bool3S {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Bool3S::Undef, Bool3S::from)
    }
}

impl Not for Bool3S {
    type Output = Bool3S;

    fn not(self) -> Self::Output {
        match self {
            Bool3S::False => Bool3S::True,
            Bool3S::Undef => Bool3S::Undef,
            Bool3S::True => Bool3S::False,
        }
    }
}

impl BitAnd for Bool3S {
    type Output = Bool3S;

    fn bitand(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Bool3S::False, _) | (_, Bool3S::False) => Bool3S::False,
            (Bool3S::Undef, _) | (_, Bool3S::Undef) => Bool3S::Undef,
            _ => Bool3S::True,
        }
    }
}

impl BitOr for Bool3S {
    type Output = Bool3S;

    fn bitor(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Bool3S::True, _) | (_, Bool3S::True) => Bool3S::True,
            (Bool3S::Undef, _) | (_, Bool3S::Undef) => Bool3S::Undef,
            _ => Bool3S::False,
        }
    }
}

impl BitXor for Bool3S {
    type Output = Bool3S;

    fn bitxor(self, rhs: Self) -> Self::Output {
        match (self.to_bool(), rhs.to_bool()) {
            (Some(a), Some(b)) => Bool3S::from(a ^ b),
            _ => Bool3S::Undef,
        }
    }
}

impl fmt::Display for Bool3S {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Can't read a tri-state value from {0:?}")]
pub struct ParseBool3SError(pub String);

impl FromStr for Bool3S {
    type Err = ParseBool3SError;

    /// Accepts `F`/`0`/`false`, `T`/`1`/`true` and `?`/`X`/`U`/`undef`,
    /// ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f" | "0" | "false" => Ok(Bool3S::False),
            "t" | "1" | "true" => Ok(Bool3S::True),
            "?" | "x" | "u" | "undef" => Ok(Bool3S::Undef),
            _ => Err(ParseBool3SError(s.to_owned())),
        }
    }
}
