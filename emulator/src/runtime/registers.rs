use parse_display::Display;

use crate::constants::{self as C, Word};

/// One of the eight general purpose registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("r{0}")]
pub struct Reg(u8);

impl Reg {
    /// Build a register from its index, if it is in range
    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        if index < C::REGISTER_COUNT {
            u8::try_from(index).ok().map(Self)
        } else {
            None
        }
    }

    /// Decode a raw operand word naming a register
    #[must_use]
    pub fn from_encoding(word: Word) -> Option<Self> {
        let index = word.checked_sub(C::REGISTER_BASE)?;
        Self::new(usize::from(index))
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw operand word naming this register
    #[must_use]
    pub const fn encoding(self) -> Word {
        C::REGISTER_BASE + self.0 as Word
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..C::REGISTER_COUNT).filter_map(Self::new)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Registers([Word; C::REGISTER_COUNT]);

impl Registers {
    #[must_use]
    pub fn get(&self, reg: Reg) -> Word {
        self.0[reg.index()]
    }

    pub fn set(&mut self, reg: Reg, value: Word) {
        self.0[reg.index()] = value;
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Word] {
        &self.0
    }
}

impl std::fmt::Display for Registers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (reg, value) in Reg::all().zip(self.0.iter()) {
            if reg.index() > 0 {
                write!(f, " ")?;
            }
            write!(f, "{reg}={value}")?;
        }
        Ok(())
    }
}
