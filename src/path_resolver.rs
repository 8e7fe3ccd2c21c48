//! External command resolution against the search path.

use std::env;
use std::path::PathBuf;

use nix::unistd::{access, AccessFlags};

/// Resolve a command name to the first executable match on `PATH`.
///
/// `PATH` is read freshly on every call so environment changes made during
/// the session are always honored. Returns `None` when `PATH` is unset or
/// no directory holds an executable with the given name.
pub fn resolve(command: &str) -> Option<PathBuf> {
    let path = env::var("PATH").ok()?;
    for dir in path.split(':') {
        if dir.is_empty() {
            continue;
        }
        let candidate = PathBuf::from(dir).join(command);
        if access(&candidate, AccessFlags::X_OK).is_ok() {
            return Some(candidate);
        }
    }
    None
}
