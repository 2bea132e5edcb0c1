//! CLI integration tests for rjlink.
//!
//! These tests execute the compiled binary and verify CLI behavior including:
//! - Subcommand behavior (convert, tokens)
//! - Stdin/stdout handling
//! - Exit codes
//! - File I/O operations

mod common;
mod convert;
mod tokens;
