//! Per-instruction execution trace

use std::io::Write;

use super::{arguments::Operand, instructions::Opcode, registers::Reg, Registers};
use crate::constants::{Address, Word};

/// An operand as seen when the instruction started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracedOperand {
    Literal(Word),
    Register { reg: Reg, value: Word },
    Destination(Reg),
}

impl TracedOperand {
    pub(crate) fn source(operand: Operand, registers: &Registers) -> Self {
        match operand {
            Operand::Literal(value) => Self::Literal(value),
            Operand::Register(reg) => Self::Register {
                reg,
                value: registers.get(reg),
            },
        }
    }
}

impl std::fmt::Display for TracedOperand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Register { reg, value } => write!(f, "{reg}({value})"),
            Self::Destination(reg) => write!(f, "{reg}"),
        }
    }
}

/// One executed instruction
#[derive(Debug)]
pub struct TraceRecord<'a> {
    pub address: Address,
    pub opcode: Opcode,
    pub operands: &'a [TracedOperand],
    /// Registers after the instruction executed
    pub registers: &'a Registers,
}

impl std::fmt::Display for TraceRecord<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:>5}] {:<4}", self.address, self.opcode.to_string())?;
        for (i, operand) in self.operands.iter().enumerate() {
            let separator = if i == 0 { " " } else { ", " };
            write!(f, "{separator}{operand}")?;
        }
        write!(f, " | {}", self.registers)
    }
}

/// Receives a record for every executed instruction. It can't affect the run.
pub trait Trace {
    /// Whether records should be built at all
    fn enabled(&self) -> bool {
        true
    }

    /// Record an executed instruction
    ///
    /// # Errors
    ///
    /// Fails if the record can't be written.
    fn record(&mut self, record: &TraceRecord<'_>) -> std::io::Result<()>;
}

/// No tracing
impl Trace for () {
    fn enabled(&self) -> bool {
        false
    }

    fn record(&mut self, _record: &TraceRecord<'_>) -> std::io::Result<()> {
        Ok(())
    }
}

/// Writes one line of text per record
pub struct TextTrace<W> {
    output: W,
}

impl<W: Write> TextTrace<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}

impl<W: Write> Trace for TextTrace<W> {
    fn record(&mut self, record: &TraceRecord<'_>) -> std::io::Result<()> {
        writeln!(self.output, "{record}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_trace_test() {
        let r0 = Reg::new(0).unwrap();
        let r1 = Reg::new(1).unwrap();
        let mut registers = Registers::default();
        registers.set(r1, 3);
        registers.set(r0, 7);

        let operands = [
            TracedOperand::Destination(r0),
            TracedOperand::Register { reg: r1, value: 3 },
            TracedOperand::Literal(4),
        ];
        let mut trace = TextTrace::new(Vec::new());
        trace
            .record(&TraceRecord {
                address: 1234,
                opcode: Opcode::Add,
                operands: &operands,
                registers: &registers,
            })
            .unwrap();
        trace
            .record(&TraceRecord {
                address: 1238,
                opcode: Opcode::Noop,
                operands: &[],
                registers: &registers,
            })
            .unwrap();

        let output = String::from_utf8(trace.into_inner()).unwrap();
        insta::assert_snapshot!(output.trim_end(), @r"
        [ 1234] add  r0, r1(3), 4 | r0=7 r1=3 r2=0 r3=0 r4=0 r5=0 r6=0 r7=0
        [ 1238] noop | r0=7 r1=3 r2=0 r3=0 r4=0 r5=0 r6=0 r7=0
        ");
    }
}
