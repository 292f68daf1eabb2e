//! Linear listing of the instructions found in memory

use crate::constants::{Address, Word};
use crate::runtime::{Instruction, Memory};

/// One listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Instruction {
        address: Address,
        instruction: Instruction,
    },
    /// A word that does not start a valid instruction
    Data { address: Address, word: Word },
}

impl std::fmt::Display for Listing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instruction {
                address,
                instruction,
            } => write!(f, "{address:>5}: {instruction}"),
            Self::Data { address, word } => write!(f, "{address:>5}: .word {word}"),
        }
    }
}

/// Walk the memory from `start`, decoding one instruction after the other.
/// Undecodable words are listed as data and the walk resumes right after them.
pub fn disassemble(memory: &Memory, start: Address) -> impl Iterator<Item = Listing> + '_ {
    let mut address = Some(start);
    std::iter::from_fn(move || {
        let current = address?;
        let word = memory.get(current).ok()?;

        let (entry, next) = match Instruction::decode(memory, current) {
            Ok((instruction, next)) => (
                Listing::Instruction {
                    address: current,
                    instruction,
                },
                Some(next),
            ),
            Err(_) => (
                Listing::Data {
                    address: current,
                    word,
                },
                current.checked_add(1),
            ),
        };

        // Stop instead of wrapping around the address space
        address = next.filter(|next| *next > current);
        Some(entry)
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn listing_test() {
        let memory = Memory::from(vec![1, 32768, 65, 19, 32768, 7, 0, 22, 17, 3, 9, 32769]);
        let listing: Vec<String> = disassemble(&memory, 0).map(|l| l.to_string()).collect();

        assert_eq!(
            listing,
            [
                "    0: set  r0, 65",
                "    3: out  r0",
                "    5: jt   0, 22",
                "    8: call 3",
                "   10: .word 9",
                "   11: .word 32769",
            ]
        );
    }

    #[test]
    fn start_test() {
        let memory = Memory::from(vec![0, 21, 18]);
        let listing: Vec<Listing> = disassemble(&memory, 1).collect();
        assert_eq!(
            listing,
            vec![
                Listing::Instruction {
                    address: 1,
                    instruction: Instruction::Noop
                },
                Listing::Instruction {
                    address: 2,
                    instruction: Instruction::Ret
                },
            ]
        );
        assert_eq!(disassemble(&memory, 10).count(), 0);
    }
}
