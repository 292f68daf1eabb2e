//! Turns a program image into the initial memory

use std::io::Read;

use thiserror::Error;
use tracing::{debug, info};

use crate::constants::{self as C, Word};
use crate::runtime::{Computer, Memory};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read program image")]
    Io(#[from] std::io::Error),

    #[error("program image has an odd length ({length} bytes)")]
    OddLength { length: usize },
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoadOptions {
    /// Extend the memory with zeroes to cover the whole 15-bit address space
    pub pad_to_address_space: bool,
}

/// Decode little-endian words from the raw bytes of a program image
///
/// # Errors
///
/// Fails if the image is not made of whole words.
pub fn decode_image(bytes: &[u8]) -> Result<Vec<Word>, LoadError> {
    if bytes.len() % 2 != 0 {
        return Err(LoadError::OddLength {
            length: bytes.len(),
        });
    }

    Ok(bytes
        .chunks_exact(2)
        .map(|pair| Word::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Read a whole program image into memory
///
/// # Errors
///
/// Fails if the image can't be read or is malformed.
#[tracing::instrument(skip(reader))]
pub fn load<R: Read>(mut reader: R, options: LoadOptions) -> Result<Memory, LoadError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    debug!(bytes = bytes.len(), "Read program image");

    let mut memory = Memory::from(decode_image(&bytes)?);
    let words = memory.len();
    if options.pad_to_address_space {
        memory.pad_to(C::ADDRESS_SPACE);
    }

    info!(words, memory = memory.len(), "Program loaded");
    Ok(memory)
}

impl Computer {
    /// Build a computer from a program image
    ///
    /// # Errors
    ///
    /// Fails if the image can't be read or is malformed.
    pub fn load<R: Read>(reader: R, options: LoadOptions) -> Result<Self, LoadError> {
        Ok(Self::new(load(reader, options)?))
    }
}
