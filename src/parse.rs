//! Tokenizer for shell input.
//!
//! Uses Normal/Single/Double modes to apply the quoting rules while emitting
//! a flat vector of owned argument strings. Whitespace outside quotes
//! separates arguments; quote characters never survive into the output.
//!
//! Escape rules differ by mode:
//! - outside quotes, a backslash escapes the very next character;
//! - inside double quotes, a backslash is special only before `"`, `$`,
//!   `\`, and a literal newline;
//! - inside single quotes nothing is special, including backslash.

use crate::error::{ErrorKind, ShellError, ShellResult};

#[derive(Copy, Clone, Eq, PartialEq)]
enum ParseMode {
    Normal,
    Single,
    Double,
}

fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

/// Split one input line into arguments.
///
/// An empty or whitespace-only line yields an empty vector; the caller
/// treats that as a no-op iteration. An unterminated quote fails the line
/// with a `Parse` error rather than consuming past the line boundary.
pub fn tokenize(input: &str) -> ShellResult<Vec<String>> {
    let mut args = Vec::new();
    let mut buf = String::new();
    let mut chars = input.chars().peekable();
    let mut mode = ParseMode::Normal;
    // Distinguishes "no token yet" from an empty quoted token like "".
    let mut in_token = false;

    while let Some(ch) = chars.next() {
        match mode {
            ParseMode::Normal => match ch {
                c if is_space(c) => {
                    if in_token {
                        args.push(std::mem::take(&mut buf));
                        in_token = false;
                    }
                }
                '\\' => {
                    in_token = true;
                    match chars.next() {
                        Some(next) => buf.push(next),
                        // Trailing backslash stays literal.
                        None => buf.push('\\'),
                    }
                }
                '\'' => {
                    in_token = true;
                    mode = ParseMode::Single;
                }
                '"' => {
                    in_token = true;
                    mode = ParseMode::Double;
                }
                _ => {
                    in_token = true;
                    buf.push(ch);
                }
            },
            ParseMode::Single => {
                if ch == '\'' {
                    mode = ParseMode::Normal;
                } else {
                    buf.push(ch);
                }
            }
            ParseMode::Double => match ch {
                '"' => mode = ParseMode::Normal,
                '\\' => {
                    if matches!(chars.peek(), Some('"' | '$' | '\\' | '\n')) {
                        if let Some(next) = chars.next() {
                            buf.push(next);
                        }
                    } else {
                        buf.push('\\');
                    }
                }
                _ => buf.push(ch),
            },
        }
    }

    if mode != ParseMode::Normal {
        let quote_char = match mode {
            ParseMode::Single => "'",
            ParseMode::Double => "\"",
            ParseMode::Normal => unreachable!(),
        };
        return Err(
            ShellError::new(ErrorKind::Parse, format!("unterminated {quote_char} quote"))
                .with_position(input.len()),
        );
    }

    if in_token {
        args.push(buf);
    }

    Ok(args)
}
