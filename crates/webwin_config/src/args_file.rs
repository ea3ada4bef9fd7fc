//! Arguments stored next to the program in a `<program>.args` file.
//!
//! The file uses shell quoting rules, lines starting with `#` are comments.
//! Arguments from the file are placed before the command line arguments so
//! anything given on the command line takes precedence.

use camino::Utf8Path;
use tracing::debug;

use crate::ConfigError;

/// Splits the content of an args file into arguments
///
/// # Errors
///
/// This function will return an error if the content has unbalanced quotes
pub fn parse_args(content: &str) -> Result<Vec<String>, ConfigError> {
    let without_comments = content
        .lines()
        .filter(|l| !l.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");

    shlex::split(&without_comments).ok_or_else(|| ConfigError::ArgsFile(content.trim().into()))
}

/// Reads the args file, a missing file yields no arguments
///
/// # Errors
///
/// This function will return an error if the file exists but cannot be read or parsed
pub fn read_args_file(path: &Utf8Path) -> anyhow::Result<Vec<String>> {
    if !path.exists() {
        return Ok(vec![]);
    }

    let content = std::fs::read_to_string(path)?;
    let args = parse_args(&content)?;
    debug!(args =? args, "args file: {path}");

    Ok(args)
}

/// Builds the full argument list handed to the CLI parser: program name,
/// args file arguments, then the command line arguments.
pub fn merge_args(
    program: String,
    from_file: Vec<String>,
    cmdline: impl IntoIterator<Item = String>,
) -> Vec<String> {
    let mut merged = vec![program];
    merged.extend(from_file);
    merged.extend(cmdline);
    merged
}
