// ABOUTME: Error types and reporting for scan/parse (static) and evaluation (runtime) failures

use crate::token::{Token, TokenType};
use thiserror::Error;

/// A single runtime fault, carrying the token whose line it should be
/// blamed on. Every Lox runtime error has this shape, so a struct (not an
/// enum of variants) is the right fit here.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}\n[line {}]", token.line)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: Token, message: impl Into<String>) -> Self {
        RuntimeError {
            token,
            message: message.into(),
        }
    }
}

/// Signalled by the parser when it cannot continue parsing the current
/// statement; caught at the `declaration` boundary where `synchronize`
/// resumes scanning for the next statement.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("parse error")]
pub struct ParseError;

/// Tracks the two process-wide static-error flags from spec.md (`had_error`,
/// `had_runtime_error`) as fields on a value threaded explicitly through the
/// pipeline, rather than as module-level globals (see DESIGN.md).
#[derive(Debug, Default)]
pub struct Reporter {
    pub had_error: bool,
    pub had_runtime_error: bool,
}

impl Reporter {
    pub fn new() -> Self {
        Reporter::default()
    }

    /// Reset the static-error flag between REPL prompts (spec.md §6).
    pub fn reset(&mut self) {
        self.had_error = false;
    }

    pub fn error(&mut self, line: usize, message: &str) {
        self.report(line, "", message);
    }

    pub fn token_error(&mut self, token: &Token, message: &str) {
        if token.token_type == TokenType::Eof {
            self.report(token.line, " at end", message);
        } else {
            self.report(token.line, &format!(" at '{}'", token.lexeme), message);
        }
    }

    pub fn runtime_error(&mut self, error: &RuntimeError) {
        eprintln!("{}", error);
        self.had_runtime_error = true;
    }

    fn report(&mut self, line: usize, where_: &str, message: &str) {
        eprintln!("[line {line}] Error{where_}: {message}");
        self.had_error = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporter_sets_had_error() {
        let mut reporter = Reporter::new();
        assert!(!reporter.had_error);
        reporter.error(3, "Unexpected character.");
        assert!(reporter.had_error);
    }

    #[test]
    fn reporter_reset_clears_only_static_flag() {
        let mut reporter = Reporter::new();
        reporter.error(1, "boom");
        reporter.had_runtime_error = true;
        reporter.reset();
        assert!(!reporter.had_error);
        assert!(reporter.had_runtime_error);
    }

    #[test]
    fn token_error_at_eof_reports_at_end() {
        let mut reporter = Reporter::new();
        let eof = Token::new(TokenType::Eof, String::new(), None, 5);
        reporter.token_error(&eof, "Expect expression.");
        assert!(reporter.had_error);
    }

    #[test]
    fn runtime_error_display_matches_contract() {
        let token = Token::new(TokenType::Identifier, "x".to_string(), None, 7);
        let err = RuntimeError::new(token, "Undefined variable 'x'.");
        assert_eq!(format!("{err}"), "Undefined variable 'x'.\n[line 7]");
    }
}
