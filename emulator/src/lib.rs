pub mod constants;
pub mod disassembler;
pub mod loader;
pub mod runtime;

pub use self::disassembler::disassemble;
pub use self::loader::{load, LoadError, LoadOptions};
pub use self::runtime::{Computer, ProcessorError, Termination};
