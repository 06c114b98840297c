// ABOUTME: Library module exposing internal components for testing and for main.rs

pub mod ast;
pub mod ast_printer;
pub mod callable;
pub mod config;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod value;

use error::Reporter;
use interpreter::Interpreter;
use parser::Parser;
use scanner::Scanner;

/// Scans, parses and interprets `source` against a throwaway interpreter and
/// reporter, returning the exit code a CLI run over the same source would
/// produce. The black-box entry point integration tests drive.
pub fn run_source(source: &str) -> i32 {
    let mut reporter = Reporter::new();
    let interpreter = Interpreter::new();
    run_with(source, &mut reporter, &interpreter)
}

/// Runs `source` against an existing `interpreter`/`reporter` pair, so a REPL
/// can keep global state (and the had_error flag) across successive lines.
pub fn run_with(source: &str, reporter: &mut Reporter, interpreter: &Interpreter) -> i32 {
    let tokens = Scanner::new(source).scan_tokens(reporter);
    let statements = Parser::new(tokens, reporter).parse();

    if reporter.had_error {
        return config::EXIT_DATAERR;
    }

    if let Err(err) = interpreter.interpret(&statements) {
        reporter.runtime_error(&err);
        return config::EXIT_SOFTWARE;
    }

    0
}
