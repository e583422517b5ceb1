//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::io::{self, BufRead, Write};

use miette::{NamedSource, Report};

use cflat_syntax::diagnostics::CompileError;
use cflat_syntax::parser::Parsed;
use cflat_syntax::{lexer, parse_source};

use crate::annotate;
use crate::format::{FormatConfig, check_formatted, format_source_with_config, format_tree};

use super::{CliError, CliResult, ExitCode};

/// Maximum source file size (100 MB)
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read a source file, refusing unreadable or oversized files.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(file_path: &str) -> CliResult<String> {
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file_path, e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file_path,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path, e)))
}

/// Render diagnostics with a source snippet, one report per diagnostic.
pub fn render_diagnostics<'a>(
    file_name: &str,
    source: &str,
    diagnostics: impl IntoIterator<Item = &'a CompileError>,
) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics {
        let report =
            Report::new(diagnostic.clone()).with_source_code(NamedSource::new(file_name, source.to_string()));
        out.push_str(&format!("{:?}\n", report));
    }
    out
}

/// Print warnings to stderr and turn errors into a failing `CliError`.
fn report(file_name: &str, source: &str, parsed: &Parsed) -> CliResult<()> {
    let warnings = render_diagnostics(file_name, source, parsed.warnings());
    if !warnings.is_empty() {
        eprint!("{}", warnings);
    }
    if parsed.has_errors() {
        let errors = render_diagnostics(file_name, source, parsed.errors());
        return Err(CliError::failure(errors.trim_end()));
    }
    Ok(())
}

/// Lex and display tokens.
pub fn lex_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let lexed = lexer::lex(&source);

    for tok in &lexed.tokens {
        println!("{} @{}", tok.kind, tok.pos);
    }
    if lexed.errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        let errors = render_diagnostics(file_path, &source, &lexed.errors);
        Err(CliError::failure(errors.trim_end()))
    }
}

/// Parse and display the syntax tree.
///
/// The tree is printed even when errors were reported, so recovered declarations stay visible.
pub fn parse_file(file_path: &str, config: &FormatConfig) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let parsed = parse_source(&source);
    print!("{}", format_tree(&parsed.program, config));
    report(file_path, &source, &parsed)?;
    Ok(ExitCode::SUCCESS)
}

/// Parse, annotate types and display the syntax tree.
pub fn annotate_file(file_path: &str, config: &FormatConfig) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let parsed = parse_source(&source);
    report(file_path, &source, &parsed)?;
    let filled = annotate::annotate(&parsed.program);
    tracing::info!(file = file_path, annotated = filled, "annotated");
    print!("{}", format_tree(&parsed.program, config));
    Ok(ExitCode::SUCCESS)
}

/// Print the file as formatted source, or with `check` only report whether it already is.
pub fn format_file(file_path: &str, config: FormatConfig, check: bool) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let to_cli_error = |errors: Vec<CompileError>| {
        CliError::failure(render_diagnostics(file_path, &source, &errors).trim_end())
    };

    if check {
        return if check_formatted(&source).map_err(to_cli_error)? {
            println!("✓ {} is formatted", file_path);
            Ok(ExitCode::SUCCESS)
        } else {
            Err(CliError::failure(format!("Would reformat: {}", file_path)))
        };
    }

    let formatted = format_source_with_config(&source, config).map_err(to_cli_error)?;
    print!("{}", formatted);
    Ok(ExitCode::SUCCESS)
}

/// Read lines from stdin and print the tree of each one. An empty line or end of input ends the session.
pub fn repl(config: &FormatConfig) -> CliResult<ExitCode> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    println!("C-Flat {} (empty line to quit)", crate::version::CFLAT_VERSION);

    let mut failed = false;
    for line in prompt_lines(stdin.lock(), &mut stdout) {
        let line = line.map_err(|e| CliError::failure(format!("Error reading input: {}", e)))?;
        if line.trim().is_empty() {
            break;
        }
        let parsed = parse_source(&line);
        print!("{}", format_tree(&parsed.program, config));
        if let Err(e) = report("<repl>", &line, &parsed) {
            eprintln!("{}", e.message);
            failed = true;
        }
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

/// Lines of `input`, writing a `> ` prompt before each read.
fn prompt_lines<'a, R: BufRead + 'a>(input: R, out: &'a mut impl Write) -> impl Iterator<Item = io::Result<String>> + 'a {
    let mut lines = input.lines();
    std::iter::from_fn(move || {
        if let Err(e) = write!(out, "> ").and_then(|_| out.flush()) {
            tracing::debug!(error = %e, "could not write the prompt");
        }
        lines.next()
    })
}
