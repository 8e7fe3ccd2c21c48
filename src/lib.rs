//! Core pieces of the husk shell.
//!
//! The crate exposes the tokenizer, redirection setup, path resolution, and
//! dispatch logic as a library so unit and property tests can link them
//! without the interactive front end.

pub mod builtins;
pub mod dispatch;
mod error;
mod io_helpers;
pub mod parse;
pub mod path_resolver;
pub mod redirect;
pub mod repl;

pub use error::{ErrorKind, ShellError, ShellResult};
pub use parse::tokenize;
