//! Output and error stream redirection for a single command.
//!
//! `setup_redirection` scans the argument vector for `>`, `1>`, `>>`,
//! `1>>`, `2>`, and `2>>`, strips each operator together with its filename,
//! and opens the targets. The resulting `Redirections` value is scoped to
//! one command: dropping it closes any opened files, so release happens on
//! every exit path without explicit cleanup calls.

use std::fs;
use std::io::{self, Write};
use std::process::Stdio;

use crate::error::{ErrorKind, ShellError, ShellResult};

/// Where a command's output or error stream goes.
#[derive(Debug)]
pub enum OutputTarget {
    /// The process's own standard stream; never opened or closed here.
    Inherit,
    /// An opened file, owned for the duration of the command.
    File(fs::File),
}

/// Per-command pair of stream targets, built fresh for every line.
#[derive(Debug)]
pub struct Redirections {
    pub out: OutputTarget,
    pub err: OutputTarget,
}

#[derive(Copy, Clone)]
enum Stream {
    Out,
    Err,
}

impl Redirections {
    pub fn inherit() -> Self {
        Redirections {
            out: OutputTarget::Inherit,
            err: OutputTarget::Inherit,
        }
    }

    /// Writer for the command's output stream, honoring any `>` target.
    pub fn out_writer(&mut self) -> Box<dyn Write + '_> {
        match &mut self.out {
            OutputTarget::File(file) => Box::new(file),
            OutputTarget::Inherit => Box::new(io::stdout()),
        }
    }

    /// Writer for the command's error stream, honoring any `2>` target.
    pub fn err_writer(&mut self) -> Box<dyn Write + '_> {
        match &mut self.err {
            OutputTarget::File(file) => Box::new(file),
            OutputTarget::Inherit => Box::new(io::stderr()),
        }
    }

    /// Stdout handle for a spawned child. The file is duplicated so the
    /// parent keeps its own handle until the command finishes.
    pub fn child_stdout(&self) -> io::Result<Stdio> {
        match &self.out {
            OutputTarget::File(file) => Ok(Stdio::from(file.try_clone()?)),
            OutputTarget::Inherit => Ok(Stdio::inherit()),
        }
    }

    /// Stderr handle for a spawned child.
    pub fn child_stderr(&self) -> io::Result<Stdio> {
        match &self.err {
            OutputTarget::File(file) => Ok(Stdio::from(file.try_clone()?)),
            OutputTarget::Inherit => Ok(Stdio::inherit()),
        }
    }
}

/// Scan `args` for redirection operators, removing each operator and its
/// filename from the vector and opening the named targets.
///
/// The scan is left-to-right; a later operator for the same stream replaces
/// an earlier one, dropping (closing) the earlier file.
pub fn setup_redirection(args: &mut Vec<String>) -> ShellResult<Redirections> {
    let mut redir = Redirections::inherit();

    let mut i = 0;
    while i < args.len() {
        let (stream, append) = match args[i].as_str() {
            ">" | "1>" => (Stream::Out, false),
            ">>" | "1>>" => (Stream::Out, true),
            "2>" => (Stream::Err, false),
            "2>>" => (Stream::Err, true),
            _ => {
                i += 1;
                continue;
            }
        };
        if i + 1 >= args.len() {
            return Err(ShellError::new(
                ErrorKind::Redirection,
                format!("missing target after {}", args[i]),
            )
            .with_context("expected: cmd > filename"));
        }
        args.remove(i);
        let path = args.remove(i);
        let file = open_target(&path, append)
            .map_err(|err| ShellError::new(ErrorKind::Redirection, format!("{path}: {err}")))?;
        match stream {
            Stream::Out => redir.out = OutputTarget::File(file),
            Stream::Err => redir.err = OutputTarget::File(file),
        }
        // The next argument shifted into slot i; do not advance.
    }

    Ok(redir)
}

fn open_target(path: &str, append: bool) -> io::Result<fs::File> {
    let mut opts = fs::OpenOptions::new();
    opts.write(true).create(true);
    if append {
        opts.append(true);
    } else {
        opts.truncate(true);
    }
    opts.open(path)
}
