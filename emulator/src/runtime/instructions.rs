use parse_display::Display;
use tracing::debug;

use super::{
    arguments::Operand,
    console::Console,
    memory::Memory,
    registers::{Reg, Registers},
    trace::TracedOperand,
    Computer, ProcessorError, Termination,
};
use crate::constants::{self as C, Address, Word};

/// The 22 operation codes, in encoding order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display(style = "lowercase")]
pub enum Opcode {
    Halt,
    Set,
    Push,
    Pop,
    Eq,
    Gt,
    Jmp,
    Jt,
    Jf,
    Add,
    Mult,
    Mod,
    And,
    Or,
    Not,
    Rmem,
    Wmem,
    Call,
    Ret,
    Out,
    In,
    Noop,
}

impl Opcode {
    const ALL: [Self; 22] = [
        Self::Halt,
        Self::Set,
        Self::Push,
        Self::Pop,
        Self::Eq,
        Self::Gt,
        Self::Jmp,
        Self::Jt,
        Self::Jf,
        Self::Add,
        Self::Mult,
        Self::Mod,
        Self::And,
        Self::Or,
        Self::Not,
        Self::Rmem,
        Self::Wmem,
        Self::Call,
        Self::Ret,
        Self::Out,
        Self::In,
        Self::Noop,
    ];
}

impl TryFrom<Word> for Opcode {
    type Error = Word;

    fn try_from(word: Word) -> Result<Self, Self::Error> {
        Self::ALL.get(usize::from(word)).copied().ok_or(word)
    }
}

/// A decoded instruction. Destinations are plain registers, every other
/// operand may be a literal or a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Instruction {
    /// Stop the execution
    #[display("halt")]
    Halt,

    /// Copy a value to a register
    #[display("set  {0}, {1}")]
    Set(Reg, Operand),

    #[display("push {0}")]
    Push(Operand),

    /// Pop the top of the stack into a register
    #[display("pop  {0}")]
    Pop(Reg),

    #[display("eq   {0}, {1}, {2}")]
    Eq(Reg, Operand, Operand),

    #[display("gt   {0}, {1}, {2}")]
    Gt(Reg, Operand, Operand),

    /// Unconditional jump
    #[display("jmp  {0}")]
    Jmp(Operand),

    /// Jump if the first operand is non-zero
    #[display("jt   {0}, {1}")]
    Jt(Operand, Operand),

    /// Jump if the first operand is zero
    #[display("jf   {0}, {1}")]
    Jf(Operand, Operand),

    #[display("add  {0}, {1}, {2}")]
    Add(Reg, Operand, Operand),

    #[display("mult {0}, {1}, {2}")]
    Mult(Reg, Operand, Operand),

    #[display("mod  {0}, {1}, {2}")]
    Mod(Reg, Operand, Operand),

    #[display("and  {0}, {1}, {2}")]
    And(Reg, Operand, Operand),

    #[display("or   {0}, {1}, {2}")]
    Or(Reg, Operand, Operand),

    /// 15-bit bitwise negation
    #[display("not  {0}, {1}")]
    Not(Reg, Operand),

    /// Read a memory word into a register
    #[display("rmem {0}, {1}")]
    Rmem(Reg, Operand),

    /// Write a value to memory, address first
    #[display("wmem {0}, {1}")]
    Wmem(Operand, Operand),

    /// Push the address of the next instruction and jump
    #[display("call {0}")]
    Call(Operand),

    /// Pop an address and jump to it
    #[display("ret")]
    Ret,

    /// Write a character
    #[display("out  {0}")]
    Out(Operand),

    /// Read a character
    #[display("in   {0}")]
    In(Reg),

    #[display("noop")]
    Noop,
}

/// Reads the words of an instruction one after the other
struct Cursor<'a> {
    memory: &'a Memory,
    address: Address,
}

impl Cursor<'_> {
    fn word(&mut self) -> Result<Word, ProcessorError> {
        let word = self.memory.get(self.address)?;
        self.address = self.address.wrapping_add(1);
        Ok(word)
    }

    fn operand(&mut self) -> Result<Operand, ProcessorError> {
        Ok(Operand::decode(self.word()?)?)
    }

    fn destination(&mut self) -> Result<Reg, ProcessorError> {
        Ok(Operand::decode_destination(self.word()?)?)
    }
}

/// Reduce a widened result back to a word
#[allow(clippy::cast_possible_truncation)]
const fn reduce(value: u32) -> Word {
    (value % C::MODULUS) as Word
}

impl Instruction {
    /// Decode the instruction starting at `address`
    ///
    /// Returns the instruction along with the address following it.
    ///
    /// # Errors
    ///
    /// Fails on an unknown opcode, an invalid operand encoding, or if the
    /// instruction runs past the end of memory.
    pub fn decode(memory: &Memory, address: Address) -> Result<(Self, Address), ProcessorError> {
        use Instruction::*;

        let mut cursor = Cursor { memory, address };
        let opcode = Opcode::try_from(cursor.word()?)
            .map_err(|opcode| ProcessorError::UnknownOpcode { opcode, address })?;

        let c = &mut cursor;
        let instruction = match opcode {
            Opcode::Halt => Halt,
            Opcode::Set => Set(c.destination()?, c.operand()?),
            Opcode::Push => Push(c.operand()?),
            Opcode::Pop => Pop(c.destination()?),
            Opcode::Eq => Eq(c.destination()?, c.operand()?, c.operand()?),
            Opcode::Gt => Gt(c.destination()?, c.operand()?, c.operand()?),
            Opcode::Jmp => Jmp(c.operand()?),
            Opcode::Jt => Jt(c.operand()?, c.operand()?),
            Opcode::Jf => Jf(c.operand()?, c.operand()?),
            Opcode::Add => Add(c.destination()?, c.operand()?, c.operand()?),
            Opcode::Mult => Mult(c.destination()?, c.operand()?, c.operand()?),
            Opcode::Mod => Mod(c.destination()?, c.operand()?, c.operand()?),
            Opcode::And => And(c.destination()?, c.operand()?, c.operand()?),
            Opcode::Or => Or(c.destination()?, c.operand()?, c.operand()?),
            Opcode::Not => Not(c.destination()?, c.operand()?),
            Opcode::Rmem => Rmem(c.destination()?, c.operand()?),
            Opcode::Wmem => Wmem(c.operand()?, c.operand()?),
            Opcode::Call => Call(c.operand()?),
            Opcode::Ret => Ret,
            Opcode::Out => Out(c.operand()?),
            Opcode::In => In(c.destination()?),
            Opcode::Noop => Noop,
        };

        Ok((instruction, cursor.address))
    }

    #[must_use]
    pub const fn opcode(&self) -> Opcode {
        use Instruction::*;

        match self {
            Halt => Opcode::Halt,
            Set(..) => Opcode::Set,
            Push(_) => Opcode::Push,
            Pop(_) => Opcode::Pop,
            Eq(..) => Opcode::Eq,
            Gt(..) => Opcode::Gt,
            Jmp(_) => Opcode::Jmp,
            Jt(..) => Opcode::Jt,
            Jf(..) => Opcode::Jf,
            Add(..) => Opcode::Add,
            Mult(..) => Opcode::Mult,
            Mod(..) => Opcode::Mod,
            And(..) => Opcode::And,
            Or(..) => Opcode::Or,
            Not(..) => Opcode::Not,
            Rmem(..) => Opcode::Rmem,
            Wmem(..) => Opcode::Wmem,
            Call(_) => Opcode::Call,
            Ret => Opcode::Ret,
            Out(_) => Opcode::Out,
            In(_) => Opcode::In,
            Noop => Opcode::Noop,
        }
    }

    /// Operands with the values they resolve to before execution
    #[must_use]
    pub fn traced_operands(&self, registers: &Registers) -> Vec<TracedOperand> {
        use Instruction::*;

        let src = |operand: &Operand| TracedOperand::source(*operand, registers);
        let dst = |reg: &Reg| TracedOperand::Destination(*reg);

        match self {
            Halt | Ret | Noop => vec![],
            Push(a) | Jmp(a) | Call(a) | Out(a) => vec![src(a)],
            Pop(r) | In(r) => vec![dst(r)],
            Set(r, a) | Not(r, a) | Rmem(r, a) => vec![dst(r), src(a)],
            Jt(a, b) | Jf(a, b) | Wmem(a, b) => vec![src(a), src(b)],
            Eq(r, a, b)
            | Gt(r, a, b)
            | Add(r, a, b)
            | Mult(r, a, b)
            | Mod(r, a, b)
            | And(r, a, b)
            | Or(r, a, b) => vec![dst(r), src(a), src(b)],
        }
    }

    /// Execute the instruction
    ///
    /// The program counter must already point after the instruction.
    pub(crate) fn execute<T: Console>(
        &self,
        computer: &mut Computer,
        console: &mut T,
    ) -> Result<Option<Termination>, ProcessorError> {
        use Instruction::*;

        match self {
            Halt => return Ok(Some(Termination::Halted)),

            Set(reg, a) => {
                let a = computer.value(*a);
                computer.registers.set(*reg, a);
            }

            Push(a) => {
                let a = computer.value(*a);
                debug!("push({})", a);
                computer.stack.push(a);
            }

            Pop(reg) => {
                let Some(val) = computer.stack.pop() else {
                    return Ok(Some(Termination::StackExhausted));
                };
                debug!("pop => {}", val);
                computer.registers.set(*reg, val);
            }

            Eq(reg, a, b) => {
                let a = computer.value(*a);
                let b = computer.value(*b);
                computer.registers.set(*reg, Word::from(a == b));
            }

            Gt(reg, a, b) => {
                let a = computer.value(*a);
                let b = computer.value(*b);
                computer.registers.set(*reg, Word::from(a > b));
            }

            Jmp(a) => {
                let a = computer.value(*a);
                computer.jump(a);
            }

            Jt(test, a) => {
                if computer.value(*test) != 0 {
                    let a = computer.value(*a);
                    computer.jump(a);
                }
            }

            Jf(test, a) => {
                if computer.value(*test) == 0 {
                    let a = computer.value(*a);
                    computer.jump(a);
                }
            }

            Add(reg, a, b) => {
                let a = computer.value(*a);
                let b = computer.value(*b);
                let res = reduce(u32::from(a) + u32::from(b));
                debug!("{} + {} = {}", a, b, res);
                computer.registers.set(*reg, res);
            }

            Mult(reg, a, b) => {
                let a = computer.value(*a);
                let b = computer.value(*b);
                let res = reduce(u32::from(a) * u32::from(b));
                debug!("{} * {} = {}", a, b, res);
                computer.registers.set(*reg, res);
            }

            Mod(reg, a, b) => {
                let a = computer.value(*a);
                let b = computer.value(*b);
                let res = a.checked_rem(b).ok_or(ProcessorError::DivisionByZero)?;
                debug!("{} % {} = {}", a, b, res);
                computer.registers.set(*reg, res);
            }

            And(reg, a, b) => {
                let a = computer.value(*a);
                let b = computer.value(*b);
                computer.registers.set(*reg, a & b);
            }

            Or(reg, a, b) => {
                let a = computer.value(*a);
                let b = computer.value(*b);
                computer.registers.set(*reg, a | b);
            }

            Not(reg, a) => {
                let a = computer.value(*a);
                computer.registers.set(*reg, !a & C::MAX_VALUE);
            }

            Rmem(reg, address) => {
                let address = computer.value(*address);
                let val = computer.memory.get(address)?;
                computer.registers.set(*reg, val);
            }

            Wmem(address, a) => {
                let address = computer.value(*address);
                let a = computer.value(*a);
                *computer.memory.get_mut(address)? = a;
            }

            Call(a) => {
                let a = computer.value(*a);
                computer.stack.push(computer.pc);
                computer.jump(a);
            }

            Ret => {
                let Some(ret) = computer.stack.pop() else {
                    return Ok(Some(Termination::StackExhausted));
                };
                debug!("Returning to {}", ret);
                computer.pc = ret;
            }

            Out(a) => {
                let a = computer.value(*a);
                console.write_char(a)?;
            }

            In(reg) => {
                let val = console.read_char()?;
                computer.registers.set(*reg, val);
            }

            Noop => {}
        };

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const R0: Word = 32768;
    const R1: Word = 32769;

    fn reg(index: usize) -> Reg {
        Reg::new(index).unwrap()
    }

    #[test]
    fn opcode_test() {
        assert_eq!(Opcode::try_from(0_u16), Ok(Opcode::Halt));
        assert_eq!(Opcode::try_from(9_u16), Ok(Opcode::Add));
        assert_eq!(Opcode::try_from(21_u16), Ok(Opcode::Noop));
        assert_eq!(Opcode::try_from(22_u16), Err(22));

        for (code, opcode) in Opcode::ALL.iter().enumerate() {
            assert_eq!(Opcode::try_from(Word::try_from(code).unwrap()), Ok(*opcode));
        }

        assert_eq!(Opcode::Rmem.to_string(), "rmem");
    }

    #[test]
    fn decode_test() {
        let memory = Memory::from(vec![9, R0, R1, 4, 19, 65, 0]);

        let (instruction, next) = Instruction::decode(&memory, 0).unwrap();
        assert_eq!(
            instruction,
            Instruction::Add(reg(0), Operand::Register(reg(1)), Operand::Literal(4))
        );
        assert_eq!(next, 4);

        let (instruction, next) = Instruction::decode(&memory, next).unwrap();
        assert_eq!(instruction, Instruction::Out(Operand::Literal(65)));
        assert_eq!(next, 6);

        let (instruction, next) = Instruction::decode(&memory, next).unwrap();
        assert_eq!(instruction, Instruction::Halt);
        assert_eq!(next, 7);
    }

    #[test]
    fn decode_error_test() {
        let memory = Memory::from(vec![22, 1, 5, 19, 32776, 9, R0]);

        assert!(matches!(
            Instruction::decode(&memory, 0),
            Err(ProcessorError::UnknownOpcode {
                opcode: 22,
                address: 0
            })
        ));

        // The destination of `set` must be a register
        assert!(matches!(
            Instruction::decode(&memory, 1),
            Err(ProcessorError::Decode(
                crate::runtime::DecodeError::InvalidDestination { word: 5 }
            ))
        ));

        assert!(matches!(
            Instruction::decode(&memory, 3),
            Err(ProcessorError::Decode(
                crate::runtime::DecodeError::InvalidOperand { word: 32776 }
            ))
        ));

        // Truncated instruction at the end of memory
        assert!(matches!(
            Instruction::decode(&memory, 5),
            Err(ProcessorError::MemoryOutOfBounds(_))
        ));
    }

    #[test]
    fn display_test() {
        let instruction = Instruction::Eq(reg(2), Operand::Register(reg(3)), Operand::Literal(7));
        assert_eq!(instruction.to_string(), "eq   r2, r3, 7");
        assert_eq!(
            Instruction::Wmem(Operand::Literal(100), Operand::Register(reg(0))).to_string(),
            "wmem 100, r0"
        );
        assert_eq!(Instruction::Ret.to_string(), "ret");
    }

    #[test]
    fn traced_operands_test() {
        let mut registers = Registers::default();
        registers.set(reg(1), 12);

        let instruction = Instruction::Add(reg(0), Operand::Register(reg(1)), Operand::Literal(4));
        assert_eq!(
            instruction.traced_operands(&registers),
            vec![
                TracedOperand::Destination(reg(0)),
                TracedOperand::Register {
                    reg: reg(1),
                    value: 12
                },
                TracedOperand::Literal(4),
            ]
        );
        assert!(Instruction::Noop.traced_operands(&registers).is_empty());
    }

    #[test]
    fn reduce_test() {
        assert_eq!(reduce(32758 + 15), 5);
        assert_eq!(reduce(32767 * 32767), 1);
        assert_eq!(reduce(32768), 0);
    }
}
