use crate::constants::Word;

/// Unbounded LIFO used by `push`, `pop`, `call` and `ret`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stack {
    inner: Vec<Word>,
}

impl Stack {
    pub fn push(&mut self, value: Word) {
        self.inner.push(value);
    }

    /// Remove the top of the stack. `None` means the stack was empty, which
    /// instructions treat as the end of the program.
    pub fn pop(&mut self) -> Option<Word> {
        self.inner.pop()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
