//! Error types and reporting for the shell.
//!
//! Functions return `ShellError` instead of bare strings so the REPL can
//! render a single diagnostic line, optionally pointing into the offending
//! input. No error here is fatal to the shell process; each one aborts only
//! the line being executed.

use std::fmt;

/// Categorized error types for better diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Syntax error during tokenization
    Parse,
    /// Error opening or applying an output/error redirection
    Redirection,
    /// Error resolving or spawning a command
    Execution,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Parse => write!(f, "parse error"),
            ErrorKind::Redirection => write!(f, "redirection error"),
            ErrorKind::Execution => write!(f, "execution error"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShellError {
    pub kind: ErrorKind,
    pub message: String,
    /// Additional context explaining what was being processed
    pub context: Option<String>,
    /// Character position in the input where the error occurred
    pub position: Option<usize>,
}

impl ShellError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ShellError {
            kind,
            message: message.into(),
            context: None,
            position: None,
        }
    }

    /// Add a context string (e.g., "expected: cmd > filename")
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add the character position in the input where the error occurred
    pub fn with_position(mut self, pos: usize) -> Self {
        self.position = Some(pos);
        self
    }

    /// Format the error with a snippet of the input showing where the problem is
    pub fn display_with_input(&self, input: &str) -> String {
        let mut msg = format!("{}: {}", self.kind, self.message);

        if let Some(pos) = self.position {
            if pos < input.len() {
                // Snippet bounds must land on char boundaries.
                let mut start = pos.saturating_sub(15);
                while !input.is_char_boundary(start) {
                    start -= 1;
                }
                let mut end = (pos + 15).min(input.len());
                while !input.is_char_boundary(end) {
                    end += 1;
                }
                let snippet = &input[start..end];

                msg.push_str(&format!("\n  near: '{}'", snippet.replace('\n', "↵")));
                msg.push('\n');

                let offset = pos - start;
                msg.push_str(&format!("  {}{}", " ".repeat(offset + 9), "^"));
            } else {
                msg.push_str(&format!("\n  at position {} (end of input)", pos));
            }
        } else if let Some(context) = &self.context {
            msg.push_str(&format!("\n  hint: {}", context));
        }

        msg
    }

    /// Simplified display without input context
    pub fn display_simple(&self) -> String {
        let mut msg = format!("{}: {}", self.kind, self.message);
        if let Some(context) = &self.context {
            msg.push_str(&format!("\n  hint: {}", context));
        }
        msg
    }
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_simple())
    }
}

impl std::error::Error for ShellError {}

/// Convenience type alias for Results with ShellError
pub type ShellResult<T> = Result<T, ShellError>;
