use thiserror::Error;

use crate::constants::{Address, Word};

/// Represents errors related to memory manipulations
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    /// The address is past the end of the loaded memory
    #[error("address {0} is out of bounds")]
    OutOfBounds(Address),
}

/// Holds the memory words of the computer.
///
/// Code and data live in the same space. Its size is decided when the program
/// is loaded and never changes afterwards.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Memory {
    inner: Vec<Word>,
}

impl From<Vec<Word>> for Memory {
    fn from(inner: Vec<Word>) -> Self {
        Self { inner }
    }
}

impl Memory {
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Get the word at an address
    ///
    /// # Errors
    ///
    /// It fails if the address is out of bounds.
    pub fn get(&self, address: Address) -> Result<Word, MemoryError> {
        self.inner
            .get(usize::from(address))
            .copied()
            .ok_or(MemoryError::OutOfBounds(address))
    }

    /// Get a mutable reference to the word at an address
    ///
    /// # Errors
    ///
    /// It fails if the address is out of bounds.
    pub fn get_mut(&mut self, address: Address) -> Result<&mut Word, MemoryError> {
        self.inner
            .get_mut(usize::from(address))
            .ok_or(MemoryError::OutOfBounds(address))
    }

    /// Extend the memory with zeroes up to `size` words. It never shrinks.
    pub fn pad_to(&mut self, size: usize) {
        if self.inner.len() < size {
            self.inner.resize(size, 0);
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Word] {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_test() {
        let mut memory = Memory::from(vec![1, 2, 3]);
        assert_eq!(memory.get(2), Ok(3));
        assert_eq!(memory.get(3), Err(MemoryError::OutOfBounds(3)));

        *memory.get_mut(0).unwrap() = 42;
        assert_eq!(memory.get(0), Ok(42));
        assert!(memory.get_mut(100).is_err());
    }

    #[test]
    fn pad_test() {
        let mut memory = Memory::from(vec![1, 2, 3]);
        memory.pad_to(5);
        assert_eq!(memory.as_slice(), &[1, 2, 3, 0, 0]);

        memory.pad_to(2);
        assert_eq!(memory.len(), 5);
    }
}
