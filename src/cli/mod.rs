//! CLI module for the C-Flat front end
//!
//! ## Usage
//!
//! - `cflat <file>` - Parse a file and print its syntax tree
//! - `cflat` - Start a REPL; every line is parsed and printed on its own
//! - `--lex <file>` - Print the token stream
//! - `--parse <file>` - Print the syntax tree without positions
//! - `--annotate <file>` - Print the syntax tree with type annotations
//! - `--fmt <file>` - Print the file as formatted C-Flat source (`--check` only reports)
//!
//! ## Design
//!
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::version::CFLAT_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Front end for the C-Flat programming language
#[derive(Parser, Debug)]
#[command(name = "cflat")]
#[command(version = CFLAT_VERSION)]
#[command(about = "Lexer, parser and formatter for the C-Flat language", long_about = None)]
pub struct Cli {
    /// File to parse (starts a REPL when omitted)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Tokenize only
    #[arg(long = "lex", value_name = "FILE", conflicts_with = "file")]
    pub lex_file: Option<PathBuf>,

    /// Parse and print the tree without positions
    #[arg(long = "parse", value_name = "FILE", conflicts_with = "file")]
    pub parse_file: Option<PathBuf>,

    /// Parse, annotate types and print the tree
    #[arg(long = "annotate", value_name = "FILE", conflicts_with = "file")]
    pub annotate_file: Option<PathBuf>,

    /// Print the file as formatted source
    #[arg(long = "fmt", value_name = "FILE", conflicts_with = "file")]
    pub fmt_file: Option<PathBuf>,

    /// With --fmt: report whether the file is formatted instead of printing it
    #[arg(long = "check", requires = "fmt_file")]
    pub check: bool,

    /// Indentation width for printed trees and formatted source
    #[arg(long = "indent", value_name = "N", default_value_t = 4)]
    pub indent: usize,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = crate::format::FormatConfig::new().with_indent_width(cli.indent);

    if let Some(file) = cli.lex_file {
        return commands::lex_file(&file.to_string_lossy());
    }
    if let Some(file) = cli.parse_file {
        return commands::parse_file(&file.to_string_lossy(), &config.with_positions(false));
    }
    if let Some(file) = cli.annotate_file {
        return commands::annotate_file(&file.to_string_lossy(), &config);
    }
    if let Some(file) = cli.fmt_file {
        return commands::format_file(&file.to_string_lossy(), config, cli.check);
    }

    match cli.file {
        Some(file) => commands::parse_file(&file.to_string_lossy(), &config),
        None => commands::repl(&config),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_file() {
        let cli = Cli::try_parse_from(["cflat", "prog.cb"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("prog.cb")));
        assert_eq!(cli.indent, 4);
    }

    #[test]
    fn test_cli_parse_no_args_means_repl() {
        let cli = Cli::try_parse_from(["cflat"]).unwrap();
        assert!(cli.file.is_none());
        assert!(cli.lex_file.is_none());
        assert!(cli.parse_file.is_none());
    }

    #[test]
    fn test_cli_parse_debug_flags() {
        let cli = Cli::try_parse_from(["cflat", "--lex", "a.cb"]).unwrap();
        assert!(cli.lex_file.is_some());

        let cli = Cli::try_parse_from(["cflat", "--parse", "a.cb"]).unwrap();
        assert!(cli.parse_file.is_some());

        let cli = Cli::try_parse_from(["cflat", "--annotate", "a.cb", "--indent", "2"]).unwrap();
        assert!(cli.annotate_file.is_some());
        assert_eq!(cli.indent, 2);

        let cli = Cli::try_parse_from(["cflat", "--fmt", "a.cb", "--check"]).unwrap();
        assert!(cli.fmt_file.is_some());
        assert!(cli.check);
    }

    #[test]
    fn test_cli_rejects_file_with_flag() {
        assert!(Cli::try_parse_from(["cflat", "a.cb", "--lex", "b.cb"]).is_err());
    }

    #[test]
    fn test_cli_check_requires_fmt() {
        assert!(Cli::try_parse_from(["cflat", "--check"]).is_err());
    }
}
