//! CLI integration tests for supermd.
//!
//! These tests execute the compiled binary and verify CLI behavior including:
//! - Subcommand behavior (check, parse)
//! - Stdin/stdout handling
//! - Exit codes
//! - Error handling

mod check;
mod common;
mod parse;
