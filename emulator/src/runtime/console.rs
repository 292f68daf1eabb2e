//! Character I/O for the `in` and `out` instructions

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use tracing::debug;

use super::ProcessorError;
use crate::constants::{self as C, Word};

/// Where the `out` instruction writes and the `in` instruction reads
pub trait Console {
    /// Emit the character with the given code point
    ///
    /// # Errors
    ///
    /// Fails if the underlying output fails.
    fn write_char(&mut self, value: Word) -> Result<(), ProcessorError>;

    /// Block until a character is available and return its code point
    ///
    /// # Errors
    ///
    /// Fails once the input is exhausted, or if the character can't be stored
    /// in a word.
    fn read_char(&mut self) -> Result<Word, ProcessorError>;

    /// Push any buffered output out
    ///
    /// # Errors
    ///
    /// Fails if the underlying output fails.
    fn flush(&mut self) -> Result<(), ProcessorError> {
        Ok(())
    }
}

/// A [`Console`] reading whole lines from a buffered input
///
/// Once a line is read, each call to [`Console::read_char`] hands out one of
/// its characters, newline included, before the next line is requested.
pub struct LineConsole<R, W> {
    input: R,
    output: W,
    pending: VecDeque<char>,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            pending: VecDeque::new(),
        }
    }

    /// Give back the output, mostly useful in tests
    pub fn into_output(self) -> W {
        self.output
    }

    fn fill(&mut self) -> Result<(), ProcessorError> {
        // Make sure prompts are visible before blocking
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            return Err(ProcessorError::InputExhausted);
        }

        debug!(line = line.trim_end(), "Read input line");
        self.pending.extend(line.chars());
        Ok(())
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn write_char(&mut self, value: Word) -> Result<(), ProcessorError> {
        let character =
            char::from_u32(u32::from(value)).unwrap_or(char::REPLACEMENT_CHARACTER);
        let mut buffer = [0; 4];
        self.output
            .write_all(character.encode_utf8(&mut buffer).as_bytes())?;
        if character == '\n' {
            self.output.flush()?;
        }
        Ok(())
    }

    fn read_char(&mut self) -> Result<Word, ProcessorError> {
        if self.pending.is_empty() {
            self.fill()?;
        }

        let character = self
            .pending
            .pop_front()
            .ok_or(ProcessorError::InputExhausted)?;

        Word::try_from(u32::from(character))
            .ok()
            .filter(|value| *value <= C::MAX_VALUE)
            .ok_or(ProcessorError::InvalidInput { character })
    }

    fn flush(&mut self) -> Result<(), ProcessorError> {
        self.output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_test() {
        let mut console = LineConsole::new(&b""[..], Vec::new());
        for c in "héllo\n".chars() {
            console.write_char(u32::from(c).try_into().unwrap()).unwrap();
        }
        assert_eq!(console.into_output(), "héllo\n".as_bytes());
    }

    #[test]
    fn read_lines_test() {
        let mut console = LineConsole::new(&b"go\nn\n"[..], Vec::new());
        let read: Vec<Word> = (0..5).map(|_| console.read_char().unwrap()).collect();
        assert_eq!(read, [103, 111, 10, 110, 10]);

        assert!(matches!(
            console.read_char(),
            Err(ProcessorError::InputExhausted)
        ));
    }

    #[test]
    fn unterminated_line_test() {
        let mut console = LineConsole::new(&b"ok"[..], Vec::new());
        assert_eq!(console.read_char().unwrap(), u16::from(b'o'));
        assert_eq!(console.read_char().unwrap(), u16::from(b'k'));
        assert!(matches!(
            console.read_char(),
            Err(ProcessorError::InputExhausted)
        ));
    }

    #[test]
    fn invalid_input_test() {
        let mut console = LineConsole::new("😀\n".as_bytes(), Vec::new());
        assert!(matches!(
            console.read_char(),
            Err(ProcessorError::InvalidInput { character: '😀' })
        ));
    }
}
