use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Bool3S;

/// The closed catalogue of gate kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateType {
    Not,
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Nxor,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Unknown gate type code {0:?}")]
pub struct UnknownGateType(pub String);

impl GateType {
    pub const ALL: [GateType; 7] = [
        GateType::Not,
        GateType::And,
        GateType::Nand,
        GateType::Or,
        GateType::Nor,
        GateType::Xor,
        GateType::Nxor,
    ];

    /// Canonical two-letter code, as written by the text format.
    pub const fn code(self) -> &'static str {
        match self {
            GateType::Not => "NT",
            GateType::And => "AN",
            GateType::Nand => "NA",
            GateType::Or => "OR",
            GateType::Nor => "NO",
            GateType::Xor => "XO",
            GateType::Nxor => "NX",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            GateType::Not => "NOT",
            GateType::And => "AND",
            GateType::Nand => "NAND",
            GateType::Or => "OR",
            GateType::Nor => "NOR",
            GateType::Xor => "XOR",
            GateType::Nxor => "NXOR",
        }
    }

    /// Looks up a gate kind by its two-letter code, ignoring case.
    pub fn from_code(code: &str) -> Option<Self> {
        if code.len() != 2 {
            return None;
        }
        let code = code.to_ascii_uppercase();
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Arity used when none is given: 1 for NOT, 2 otherwise.
    pub const fn default_arity(self) -> usize {
        match self {
            GateType::Not => 1,
            _ => 2,
        }
    }

    /// NOT takes exactly one input, every other kind two or more.
    pub const fn valid_arity(self, arity: usize) -> bool {
        match self {
            GateType::Not => arity == 1,
            _ => arity >= 2,
        }
    }

    /// Truth table of the gate kind over any number of operands.
    ///
    /// AND/OR/XOR fold left to right from their identity element; the negated
    /// kinds negate that fold. NOT negates its first operand and yields
    /// `Undef` when there is none.
    pub fn eval(self, inputs: &[Bool3S]) -> Bool3S {
        let and = || inputs.iter().fold(Bool3S::True, |acc, &v| acc & v);
        let or = || inputs.iter().fold(Bool3S::False, |acc, &v| acc | v);
        let xor = || inputs.iter().fold(Bool3S::False, |acc, &v| acc ^ v);

        match self {
            GateType::Not => inputs.first().map_or(Bool3S::Undef, |&v| !v),
            GateType::And => and(),
            GateType::Nand => !and(),
            GateType::Or => or(),
            GateType::Nor => !or(),
            GateType::Xor => xor(),
            GateType::Nxor => !xor(),
        }
    }
}

impl fmt::Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GateType {
    type Err = UnknownGateType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownGateType(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use Bool3S::{False as F, True as T, Undef as U};

    #[test]
    fn test_from_code_ignores_case() {
        assert_eq!(GateType::from_code("nt"), Some(GateType::Not));
        assert_eq!(GateType::from_code("Nx"), Some(GateType::Nxor));
        assert_eq!(GateType::from_code("oR"), Some(GateType::Or));
        assert_eq!(GateType::from_code("XX"), None);
        assert_eq!(GateType::from_code("AND"), None);
        assert_eq!(GateType::from_code(""), None);
    }

    #[test]
    fn test_code_round_trip() {
        for t in GateType::ALL {
            assert_eq!(t.code().parse::<GateType>(), Ok(t));
        }
        assert_eq!(
            "zz".parse::<GateType>(),
            Err(UnknownGateType("zz".to_owned()))
        );
    }

    #[test]
    fn test_arity_rules() {
        assert!(GateType::Not.valid_arity(1));
        assert!(!GateType::Not.valid_arity(2));
        for t in GateType::ALL.into_iter().skip(1) {
            assert!(!t.valid_arity(1), "{t}");
            assert!(t.valid_arity(2), "{t}");
            assert!(t.valid_arity(5), "{t}");
            assert!(t.valid_arity(t.default_arity()), "{t}");
        }
    }

    #[test]
    fn test_short_circuit() {
        assert_eq!(GateType::And.eval(&[F, U]), F);
        assert_eq!(GateType::Nand.eval(&[U, F]), T);
        assert_eq!(GateType::Or.eval(&[T, U]), T);
        assert_eq!(GateType::Nor.eval(&[U, T]), F);
        assert_eq!(GateType::Xor.eval(&[T, U]), U);
    }

    #[test]
    fn test_xor_parity() {
        assert_eq!(GateType::Xor.eval(&[T, T, T]), T);
        assert_eq!(GateType::Xor.eval(&[T, T, F]), F);
        assert_eq!(GateType::Nxor.eval(&[T, F, F, F]), F);
        assert_eq!(GateType::Nxor.eval(&[T, T, F, F]), T);
    }

    #[test]
    fn test_not() {
        assert_eq!(GateType::Not.eval(&[T]), F);
        assert_eq!(GateType::Not.eval(&[F]), T);
        assert_eq!(GateType::Not.eval(&[U]), U);
        assert_eq!(GateType::Not.eval(&[]), U);
    }
}
