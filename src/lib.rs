#![forbid(unsafe_code)]
//! C-Flat Programming Language Front End
//!
//! C-Flat is a small statically typed language with C-like statements, classes, enums and lambdas.
//! This crate provides the driver around the syntax front end: the CLI, the source formatter and tree dump,
//! and a shallow type annotation pass over the parsed tree.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a front end bug (logic error), use `.expect("INVARIANT: reason")`
//!   with a clear explanation. Setting a node's type annotation twice is such a bug.

pub mod annotate;
pub mod cli;
pub mod format;
pub mod version;

pub use cflat_syntax::ast;
pub use cflat_syntax::diagnostics;
pub use cflat_syntax::lexer;
pub use cflat_syntax::parse_source;
pub use cflat_syntax::parser;

pub use annotate::annotate;
pub use format::{FormatConfig, check_formatted, format_source, format_source_with_config, format_tree};
