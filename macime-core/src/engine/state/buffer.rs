//! Committed text buffer management

/// Finalized text waiting to be handed to the host
#[derive(Debug, Clone, Default)]
pub struct CommitBuffer {
    content: String,
}

impl CommitBuffer {
    pub fn clear(&mut self) {
        self.content.clear();
    }

    pub fn push(&mut self, ch: char) {
        self.content.push(ch);
    }

    /// Appends text to the buffer
    pub fn append(&mut self, text: &str) {
        self.content.push_str(text);
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Takes the content, leaving an empty buffer
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.content)
    }

    /// Removes the last codepoint (backspace); false if the buffer was empty
    pub fn pop(&mut self) -> bool {
        self.content.pop().is_some()
    }
}
