//! C-Flat front end version information.
//!
//! The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time, so the CLI banner and the
//! REPL greeting agree on the same string.

/// The front end version string (for example, `0.1.0`).
pub const CFLAT_VERSION: &str = env!("CARGO_PKG_VERSION");
