pub type Word = u16;
pub type Address = u16;

/// Arithmetic is done modulo this value, and it is also the first register encoding
pub const MODULUS: u32 = 32768;

/// Largest value a computation can store
pub const MAX_VALUE: Word = 0x7FFF;

/// Number of general purpose registers
pub const REGISTER_COUNT: usize = 8;

/// Raw operand encoding of the first register
pub const REGISTER_BASE: Word = 32768;

/// Size of the addressable memory, in words
pub const ADDRESS_SPACE: usize = 32768;
