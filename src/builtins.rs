//! Builtin commands and their handlers.
//!
//! The registry is a fixed enumeration: lookup is an exact, case-sensitive
//! whole-name match, so a name that is merely a prefix or suffix of a
//! builtin (`echoo`, `ech`) never matches. Handlers write only to the
//! redirection-aware streams, never to the raw process stdio.

use std::env;
use std::io::{self, Write};

use crate::dispatch::CommandOutcome;
use crate::path_resolver::resolve;
use crate::redirect::Redirections;

/// Commands handled in-process instead of spawning an executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Echo,
    Type,
    Pwd,
    Cd,
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Builtin> {
        match name {
            "exit" => Some(Builtin::Exit),
            "echo" => Some(Builtin::Echo),
            "type" => Some(Builtin::Type),
            "pwd" => Some(Builtin::Pwd),
            "cd" => Some(Builtin::Cd),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Exit => "exit",
            Builtin::Echo => "echo",
            Builtin::Type => "type",
            Builtin::Pwd => "pwd",
            Builtin::Cd => "cd",
        }
    }
}

/// Run one builtin synchronously with the per-command streams.
///
/// `exit` does not terminate the process here; it reports the request so
/// the REPL can save history and release per-command state first.
pub fn execute_builtin(
    builtin: Builtin,
    args: &[String],
    redir: &mut Redirections,
) -> io::Result<CommandOutcome> {
    match builtin {
        Builtin::Exit => {
            // A non-numeric argument falls back to 0.
            let code = args.get(1).and_then(|s| s.parse::<i32>().ok()).unwrap_or(0);
            return Ok(CommandOutcome::Exit(code));
        }
        Builtin::Echo => {
            writeln!(redir.out_writer(), "{}", args[1..].join(" "))?;
        }
        Builtin::Type => {
            let Some(name) = args.get(1) else {
                return Ok(CommandOutcome::Continue);
            };
            if let Some(builtin) = Builtin::lookup(name) {
                writeln!(redir.out_writer(), "{} is a shell builtin", builtin.name())?;
            } else if let Some(path) = resolve(name) {
                writeln!(redir.out_writer(), "{} is {}", name, path.display())?;
            } else {
                writeln!(redir.err_writer(), "{name}: not found")?;
            }
        }
        Builtin::Pwd => {
            let cwd = env::current_dir()?;
            writeln!(redir.out_writer(), "{}", cwd.display())?;
        }
        Builtin::Cd => {
            let target = args.get(1).map(String::as_str).unwrap_or("~");
            let expanded = if let Some(rest) = target.strip_prefix('~') {
                match env::var("HOME") {
                    Ok(home) => format!("{home}{rest}"),
                    Err(_) => target.to_string(),
                }
            } else {
                target.to_string()
            };
            if env::set_current_dir(&expanded).is_err() {
                writeln!(
                    redir.err_writer(),
                    "cd: {expanded}: No such file or directory"
                )?;
            }
        }
    }

    Ok(CommandOutcome::Continue)
}
