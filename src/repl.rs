//! The read-eval loop: one iteration per input line.
//!
//! State across iterations is only the editor and interactivity flag; the
//! working directory and environment persist process-wide and are mutated
//! solely by builtin handlers.

use std::env;
use std::io;
use std::path::PathBuf;

use rustyline::history::DefaultHistory;
use rustyline::{Config, EditMode, Editor};

use crate::dispatch::{dispatch, CommandOutcome};
use crate::io_helpers::read_input_line;
use crate::parse::tokenize;

pub struct ShellState {
    editor: Editor<(), DefaultHistory>,
    interactive: bool,
}

pub fn init_state(interactive: bool) -> io::Result<ShellState> {
    let edit_mode = match env::var("HUSK_EDITMODE").ok().as_deref() {
        Some("vi") | Some("VI") => EditMode::Vi,
        _ => EditMode::Emacs,
    };
    let config = Config::builder()
        .auto_add_history(true)
        .edit_mode(edit_mode)
        .build();
    let mut editor =
        Editor::<(), DefaultHistory>::with_config(config).map_err(io::Error::other)?;
    let _ = editor.load_history(&history_path());

    Ok(ShellState {
        editor,
        interactive,
    })
}

/// Run one full command cycle: read, tokenize, dispatch.
///
/// Every failure is reported as a single-line diagnostic and the loop
/// carries on; only `exit` and end-of-input terminate the process, and
/// both save the history file first.
pub fn run_once(state: &mut ShellState) -> io::Result<()> {
    let prompt = if state.interactive { "$ " } else { "" };
    let line = match read_input_line(&mut state.editor, state.interactive, prompt)? {
        Some(line) => line,
        None => {
            // End of input is an implicit `exit 0`.
            if state.interactive {
                println!();
            }
            let _ = state.editor.save_history(&history_path());
            std::process::exit(0);
        }
    };

    if line.trim().is_empty() {
        return Ok(());
    }

    // The raw line goes to the tokenizer untrimmed: a trailing
    // backslash-escaped whitespace character is part of the last argument.
    let tokens = match tokenize(&line) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("{}", err.display_with_input(&line));
            return Ok(());
        }
    };
    if tokens.is_empty() {
        return Ok(());
    }

    match dispatch(tokens) {
        Ok(CommandOutcome::Continue) => {}
        Ok(CommandOutcome::Exit(code)) => {
            let _ = state.editor.save_history(&history_path());
            std::process::exit(code);
        }
        Err(err) => eprintln!("{err}"),
    }
    Ok(())
}

fn history_path() -> PathBuf {
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(".husk_history")
}
