use parse_display::Display;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::constants::{Address, Word};

mod arguments;
mod console;
mod instructions;
mod memory;
mod registers;
mod stack;
mod trace;

pub use self::arguments::{DecodeError, Operand};
pub use self::console::{Console, LineConsole};
pub use self::instructions::{Instruction, Opcode};
pub use self::memory::{Memory, MemoryError};
pub use self::registers::{Reg, Registers};
pub use self::stack::Stack;
pub use self::trace::{TextTrace, Trace, TraceRecord, TracedOperand};

/// Faults aborting a run
#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("unknown opcode {opcode} at address {address}")]
    UnknownOpcode { opcode: Word, address: Address },

    #[error("invalid memory access ({0})")]
    MemoryOutOfBounds(#[from] MemoryError),

    #[error("division by zero")]
    DivisionByZero,

    #[error("input exhausted")]
    InputExhausted,

    #[error("character {character:?} does not fit in a word")]
    InvalidInput { character: char },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

type Result<T> = std::result::Result<T, ProcessorError>;

/// How a program stopped without faulting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Termination {
    /// A `halt` instruction was executed
    #[display("halted")]
    Halted,

    /// `pop` or `ret` found the stack empty
    #[display("stack exhausted")]
    StackExhausted,
}

#[derive(Default, Clone)]
pub struct Computer {
    pub registers: Registers,
    pub memory: Memory,
    pub stack: Stack,
    /// Program counter
    pub pc: Address,
    pub cycles: usize,
    /// Set once the trace sink failed, it is not fed anymore
    trace_failed: bool,
}

impl std::fmt::Debug for Computer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Computer {{ pc: {}, registers: {:?}, stack: {} words, memory: [...] }}",
            self.pc,
            self.registers,
            self.stack.len()
        )
    }
}

impl Computer {
    /// Build a computer starting at address 0 of the given memory
    #[must_use]
    pub fn new(memory: Memory) -> Self {
        Self {
            memory,
            ..Self::default()
        }
    }

    fn value(&self, operand: Operand) -> Word {
        operand.resolve(&self.registers)
    }

    fn jump(&mut self, address: Address) {
        debug!("Jumping to address {}", address);
        self.pc = address;
    }

    /// Fetch, decode and execute one instruction
    ///
    /// Returns `Some` once the program stopped normally.
    ///
    /// # Errors
    ///
    /// Fails on any fault, leaving the program counter on the faulting
    /// instruction. The computer should not be stepped afterwards.
    pub fn step<C: Console, T: Trace>(
        &mut self,
        console: &mut C,
        trace: &mut T,
    ) -> Result<Option<Termination>> {
        let address = self.pc;
        let (instruction, next) = Instruction::decode(&self.memory, address)?;
        self.pc = next;
        debug!(address, "Executing instruction \"{}\"", instruction);

        let operands = (!self.trace_failed && trace.enabled())
            .then(|| instruction.traced_operands(&self.registers));

        let termination = match instruction.execute(self, console) {
            Ok(termination) => termination,
            Err(e) => {
                self.pc = address;
                return Err(e);
            }
        };
        self.cycles += 1;

        if let Some(operands) = operands {
            let record = TraceRecord {
                address,
                opcode: instruction.opcode(),
                operands: &operands,
                registers: &self.registers,
            };
            if let Err(e) = trace.record(&record) {
                warn!(error = %e, "Could not write trace, disabling it");
                self.trace_failed = true;
            }
        }

        Ok(termination)
    }

    /// Run the program until it stops
    ///
    /// # Errors
    ///
    /// Fails on the first fault, see [`ProcessorError`].
    #[tracing::instrument(skip_all)]
    pub fn run<C: Console, T: Trace>(
        &mut self,
        console: &mut C,
        trace: &mut T,
    ) -> Result<Termination> {
        let result = loop {
            match self.step(console, trace) {
                Ok(None) => {}
                Ok(Some(termination)) => break Ok(termination),
                Err(e) => break Err(e),
            }
        };
        let flushed = console.flush();

        let termination = result?;
        flushed?;
        info!(%termination, cycles = self.cycles, "Program stopped");
        Ok(termination)
    }
}
