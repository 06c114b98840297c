// ABOUTME: Configuration and constants for the Lox interpreter
// This module contains version info, the REPL prompt, and process exit codes

#[allow(dead_code)]
pub const VERSION: &str = "1.0.0";

pub const REPL_PROMPT: &str = "> ";

/// Process exit codes, matching the sysexits.h convention the original
/// interpreter used: 64 for a command-line usage error, 65 for a static
/// (scan/parse) error, 70 for a runtime error.
pub const EXIT_USAGE: i32 = 64;
pub const EXIT_DATAERR: i32 = 65;
pub const EXIT_SOFTWARE: i32 = 70;
