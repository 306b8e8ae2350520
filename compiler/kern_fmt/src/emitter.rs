//! Output Emitter
//!
//! Abstraction for output production during printing.

/// Trait for emitting printed output.
pub trait Emitter {
    /// Emit a text fragment.
    fn emit(&mut self, text: &str);

    /// Emit a newline (Unix-style `\n`).
    fn emit_newline(&mut self);

    /// Emit indentation (4 spaces per level).
    fn emit_indent(&mut self, level: usize);
}

/// String-based emitter for in-memory printing.
#[derive(Default)]
pub struct StringEmitter {
    buffer: String,
}

impl StringEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
        }
    }

    /// Get the printed output.
    pub fn output(self) -> String {
        self.buffer
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Remove trailing blank lines, leaving content followed by one newline.
    pub fn trim_trailing_blank_lines(&mut self) {
        while self.buffer.ends_with("\n\n") {
            self.buffer.pop();
        }
    }
}

impl Emitter for StringEmitter {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn emit_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn emit_indent(&mut self, level: usize) {
        for _ in 0..level * crate::INDENT_WIDTH {
            self.buffer.push(' ');
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Emitter, StringEmitter};

    #[test]
    fn test_indent_is_four_spaces_per_level() {
        let mut emitter = StringEmitter::new();
        emitter.emit_indent(2);
        emitter.emit("x");
        emitter.emit_newline();
        assert_eq!(emitter.output(), "        x\n");
    }

    #[test]
    fn test_trim_trailing_blank_lines() {
        let mut emitter = StringEmitter::with_capacity(8);
        emitter.emit("a\n\n\n");
        emitter.trim_trailing_blank_lines();
        assert_eq!(emitter.as_str(), "a\n");
    }
}
