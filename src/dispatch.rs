//! Command dispatch: one full execution cycle per tokenized line.
//!
//! Order per iteration: set up redirection (mutating the argument vector),
//! try the builtin registry, fall back to `PATH` resolution and a spawned
//! child that the shell blocks on. All redirection handles are released when
//! the `Redirections` value drops at the end of the cycle.

use std::io::{self, Write};
use std::path::Path;
use std::process::Command;

use log::debug;

use crate::builtins::{execute_builtin, Builtin};
use crate::error::{ErrorKind, ShellError, ShellResult};
use crate::path_resolver::resolve;
use crate::redirect::{setup_redirection, Redirections};

/// What the REPL should do after a command cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    /// The `exit` builtin ran; terminate the shell with this code.
    Exit(i32),
}

/// Run one parsed command to completion.
///
/// The caller filters empty lines, so `args` normally has at least one
/// element; an empty vector is still accepted as a no-op. Termination
/// requests surface as an outcome rather than exiting here, so the
/// redirection handles drop (closing any files) before the REPL acts.
pub fn dispatch(mut args: Vec<String>) -> ShellResult<CommandOutcome> {
    if args.is_empty() {
        return Ok(CommandOutcome::Continue);
    }
    let mut redir = setup_redirection(&mut args)?;
    if args.is_empty() {
        // The line held only redirections; the targets were still opened
        // (and truncated where requested), but there is nothing to run.
        return Ok(CommandOutcome::Continue);
    }

    if let Some(builtin) = Builtin::lookup(&args[0]) {
        return execute_builtin(builtin, &args, &mut redir)
            .map_err(|err| ShellError::new(ErrorKind::Execution, format!("{}: {err}", args[0])));
    }

    match resolve(&args[0]) {
        Some(path) => {
            run_external(&path, &args, &redir)?;
            Ok(CommandOutcome::Continue)
        }
        None => {
            let _ = writeln!(redir.err_writer(), "{}: command not found", args[0]);
            Ok(CommandOutcome::Continue)
        }
    }
}

/// Spawn the resolved executable with the redirection targets attached and
/// block until it exits. Stdio handles are duplicated for the child; files
/// opened here carry close-on-exec, so nothing else leaks into it.
fn run_external(path: &Path, args: &[String], redir: &Redirections) -> ShellResult<()> {
    let mut command = Command::new(path);
    command.args(&args[1..]);
    command.stdout(
        redir
            .child_stdout()
            .map_err(|err| exec_error(&args[0], &err))?,
    );
    command.stderr(
        redir
            .child_stderr()
            .map_err(|err| exec_error(&args[0], &err))?,
    );

    let mut child = command
        .spawn()
        .map_err(|err| exec_error(&args[0], &err))?;
    debug!("job event=spawn pid={} path={}", child.id(), path.display());

    let status = child.wait().map_err(|err| exec_error(&args[0], &err))?;
    debug!("job event=exit pid={} status={:?}", child.id(), status.code());

    Ok(())
}

fn exec_error(cmd: &str, err: &io::Error) -> ShellError {
    let message = match err.kind() {
        io::ErrorKind::NotFound => format!("{cmd}: command not found"),
        io::ErrorKind::PermissionDenied => format!("{cmd}: permission denied"),
        _ => format!("{cmd}: {err}"),
    };
    ShellError::new(ErrorKind::Execution, message)
}
