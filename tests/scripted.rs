#![cfg(target_os = "linux")]

//! Black-box tests: feed a script to the shell over piped stdin and inspect
//! stdout, stderr, the exit code, and any files the script produced.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tempfile::TempDir;

struct Run {
    stdout: String,
    stderr: String,
    code: i32,
}

fn run_script_in(script: &str, dir: &Path) -> Result<Run> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_husk"))
        .current_dir(dir)
        // Isolate history and ~ expansion from the host environment.
        .env("HOME", dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .context("spawn shell")?;
    {
        let stdin = child.stdin.as_mut().context("stdin")?;
        stdin.write_all(script.as_bytes()).context("write")?;
    }
    let output = child.wait_with_output().context("wait")?;
    Ok(Run {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        code: output.status.code().unwrap_or(1),
    })
}

fn run_script(script: &str) -> Result<(Run, TempDir)> {
    let dir = TempDir::new().context("tempdir")?;
    let run = run_script_in(script, dir.path())?;
    Ok((run, dir))
}

#[test]
fn whitespace_only_lines_are_noops() -> Result<()> {
    let (run, _dir) = run_script("   \n\t\t\n \t \nexit 0\n")?;
    assert!(run.stdout.is_empty(), "stdout: {}", run.stdout);
    assert!(run.stderr.is_empty(), "stderr: {}", run.stderr);
    assert_eq!(run.code, 0);
    Ok(())
}

#[test]
fn eof_is_an_implicit_exit_zero() -> Result<()> {
    let (run, _dir) = run_script("echo done\n")?;
    assert_eq!(run.stdout, "done\n");
    assert_eq!(run.code, 0);
    Ok(())
}

#[test]
fn quoting_rules_shape_arguments() -> Result<()> {
    let (run, _dir) = run_script("echo 'a b' \"c\\\"d\" e\nexit 0\n")?;
    assert!(run.stderr.is_empty(), "stderr: {}", run.stderr);
    assert_eq!(run.stdout, "a b c\"d e\n");
    Ok(())
}

#[test]
fn trailing_escaped_space_is_preserved() -> Result<()> {
    let (run, _dir) = run_script("echo a\\ \nexit 0\n")?;
    assert!(run.stderr.is_empty(), "stderr: {}", run.stderr);
    assert_eq!(run.stdout, "a \n");
    Ok(())
}

#[test]
fn unquoted_backslash_joins_words() -> Result<()> {
    let (run, _dir) = run_script("echo a\\ b\nexit 0\n")?;
    assert!(run.stderr.is_empty(), "stderr: {}", run.stderr);
    assert_eq!(run.stdout, "a b\n");
    Ok(())
}

#[test]
fn redirection_truncates_idempotently() -> Result<()> {
    let (run, dir) = run_script("echo hi > out.txt\necho hi > out.txt\nexit 0\n")?;
    assert!(run.stderr.is_empty(), "stderr: {}", run.stderr);
    assert!(run.stdout.is_empty(), "stdout: {}", run.stdout);
    let contents = fs::read_to_string(dir.path().join("out.txt"))?;
    assert_eq!(contents, "hi\n");
    Ok(())
}

#[test]
fn append_keeps_order() -> Result<()> {
    let (run, dir) = run_script("echo a >> out.txt\necho b >> out.txt\nexit 0\n")?;
    assert!(run.stderr.is_empty(), "stderr: {}", run.stderr);
    let contents = fs::read_to_string(dir.path().join("out.txt"))?;
    assert_eq!(contents, "a\nb\n");
    Ok(())
}

#[test]
fn stderr_redirection_captures_not_found() -> Result<()> {
    let (run, dir) = run_script("type nope_cmd_xyz 2> err.txt\nexit 0\n")?;
    assert!(run.stderr.is_empty(), "stderr: {}", run.stderr);
    let contents = fs::read_to_string(dir.path().join("err.txt"))?;
    assert_eq!(contents, "nope_cmd_xyz: not found\n");
    Ok(())
}

#[test]
fn type_classifies_builtins_and_externals() -> Result<()> {
    let (run, _dir) = run_script("type cd\ntype sh\nexit 0\n")?;
    assert!(run.stdout.contains("cd is a shell builtin"));
    assert!(run.stdout.contains("sh is /"));
    assert_eq!(run.code, 0);
    Ok(())
}

#[test]
fn type_not_found_does_not_terminate() -> Result<()> {
    let (run, _dir) = run_script("type nonexistent_cmd_xyz\necho still here\nexit 0\n")?;
    assert!(run.stderr.contains("nonexistent_cmd_xyz: not found"));
    assert!(run.stdout.contains("still here"));
    assert_eq!(run.code, 0);
    Ok(())
}

#[test]
fn cd_tilde_goes_home() -> Result<()> {
    let dir = TempDir::new()?;
    let home = fs::canonicalize(dir.path())?;
    let sub = home.join("sub");
    fs::create_dir(&sub)?;
    let script = format!("cd {}\ncd ~\npwd\nexit 0\n", sub.display());
    let run = run_script_in(&script, &home)?;
    assert!(run.stderr.is_empty(), "stderr: {}", run.stderr);
    assert_eq!(run.stdout, format!("{}\n", home.display()));
    Ok(())
}

#[test]
fn cd_to_missing_directory_reports_and_stays() -> Result<()> {
    let (run, dir) = run_script("cd /nonexistent_dir_xyz\npwd\nexit 0\n")?;
    assert!(run.stderr.contains("No such file or directory"));
    let cwd = fs::canonicalize(dir.path())?;
    assert_eq!(run.stdout, format!("{}\n", cwd.display()));
    Ok(())
}

#[test]
fn prefix_of_a_builtin_is_not_a_builtin() -> Result<()> {
    let (run, _dir) = run_script("echoo hi\nexit 0\n")?;
    assert!(run.stderr.contains("echoo: command not found"));
    assert!(!run.stdout.contains("hi"));
    assert_eq!(run.code, 0);
    Ok(())
}

#[test]
fn command_not_found_names_the_token_only() -> Result<()> {
    let (run, _dir) = run_script("no_such_tool --flag value\nexit 0\n")?;
    assert!(run.stderr.contains("no_such_tool: command not found"));
    assert!(!run.stderr.contains("--flag"));
    Ok(())
}

#[test]
fn exit_codes_propagate() -> Result<()> {
    let (run, _dir) = run_script("exit 3\n")?;
    assert_eq!(run.code, 3);

    let (run, _dir) = run_script("exit\n")?;
    assert_eq!(run.code, 0);

    // Non-numeric argument falls back to 0.
    let (run, _dir) = run_script("exit notanumber\n")?;
    assert_eq!(run.code, 0);
    Ok(())
}

#[test]
fn unterminated_quote_fails_only_that_line() -> Result<()> {
    let (run, _dir) = run_script("echo 'abc\necho recovered\nexit 0\n")?;
    assert!(run.stderr.contains("unterminated"));
    assert!(!run.stdout.contains("abc"));
    assert!(run.stdout.contains("recovered"));
    assert_eq!(run.code, 0);
    Ok(())
}

#[test]
fn external_command_with_redirection() -> Result<()> {
    let (run, dir) = run_script("uname > u.txt\nexit 0\n")?;
    assert!(run.stderr.is_empty(), "stderr: {}", run.stderr);
    let contents = fs::read_to_string(dir.path().join("u.txt"))?;
    assert!(!contents.trim().is_empty());
    Ok(())
}

#[test]
fn later_redirection_overrides_earlier() -> Result<()> {
    let (run, dir) = run_script("echo hi > a.txt > b.txt\nexit 0\n")?;
    assert!(run.stderr.is_empty(), "stderr: {}", run.stderr);
    assert_eq!(fs::read_to_string(dir.path().join("a.txt"))?, "");
    assert_eq!(fs::read_to_string(dir.path().join("b.txt"))?, "hi\n");
    Ok(())
}

#[test]
fn redirection_open_failure_aborts_only_the_line() -> Result<()> {
    let (run, _dir) = run_script("echo hi > missing_dir/out.txt\necho next\nexit 0\n")?;
    assert!(run.stderr.contains("redirection error"));
    assert!(run.stdout.contains("next"));
    assert_eq!(run.code, 0);
    Ok(())
}
