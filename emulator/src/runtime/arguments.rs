//! Decoding of the raw operand words found in the instruction stream

use thiserror::Error;

use super::registers::{Reg, Registers};
use crate::constants::{self as C, Word};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid operand encoding {word}")]
    InvalidOperand { word: Word },

    #[error("invalid destination encoding {word}, expected a register")]
    InvalidDestination { word: Word },
}

/// An instruction operand, either an immediate value or a register reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Literal(Word),
    Register(Reg),
}

impl Operand {
    /// Decode a raw operand word
    ///
    /// # Errors
    ///
    /// Words above the last register encoding are rejected.
    pub fn decode(word: Word) -> Result<Self, DecodeError> {
        if word <= C::MAX_VALUE {
            Ok(Self::Literal(word))
        } else {
            Reg::from_encoding(word)
                .map(Self::Register)
                .ok_or(DecodeError::InvalidOperand { word })
        }
    }

    /// Decode a raw word used as an assignment target
    ///
    /// # Errors
    ///
    /// Only register encodings are valid destinations.
    pub fn decode_destination(word: Word) -> Result<Reg, DecodeError> {
        Reg::from_encoding(word).ok_or(DecodeError::InvalidDestination { word })
    }

    /// Resolve the value this operand stands for
    #[must_use]
    pub fn resolve(self, registers: &Registers) -> Word {
        match self {
            Self::Literal(value) => value,
            Self::Register(reg) => registers.get(reg),
        }
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Register(reg) => write!(f, "{reg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_test() {
        assert_eq!(Operand::decode(0), Ok(Operand::Literal(0)));
        assert_eq!(Operand::decode(32767), Ok(Operand::Literal(32767)));
        assert_eq!(
            Operand::decode(32768),
            Ok(Operand::Register(Reg::new(0).unwrap()))
        );
        assert_eq!(
            Operand::decode(32775),
            Ok(Operand::Register(Reg::new(7).unwrap()))
        );
        assert_eq!(
            Operand::decode(32776),
            Err(DecodeError::InvalidOperand { word: 32776 })
        );
        assert_eq!(
            Operand::decode(65535),
            Err(DecodeError::InvalidOperand { word: 65535 })
        );
    }

    #[test]
    fn decode_destination_test() {
        assert_eq!(Operand::decode_destination(32770), Ok(Reg::new(2).unwrap()));
        assert_eq!(
            Operand::decode_destination(5),
            Err(DecodeError::InvalidDestination { word: 5 })
        );
        assert_eq!(
            Operand::decode_destination(32776),
            Err(DecodeError::InvalidDestination { word: 32776 })
        );
    }

    #[test]
    fn resolve_test() {
        let mut registers = Registers::default();
        let reg = Reg::new(4).unwrap();
        registers.set(reg, 1234);

        assert_eq!(Operand::Literal(99).resolve(&registers), 99);
        assert_eq!(Operand::Register(reg).resolve(&registers), 1234);
    }
}
