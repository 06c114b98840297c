// ABOUTME: CLI entry point — runs a script file or starts an interactive REPL

use clap::Parser as ClapParser;
use loxrs::config;
use loxrs::error::Reporter;
use loxrs::interpreter::Interpreter;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// A tree-walking interpreter for Lox
#[derive(ClapParser, Debug)]
#[command(name = "loxrs")]
#[command(version = config::VERSION)]
#[command(about = "A tree-walking interpreter for Lox")]
struct CliArgs {
    /// Script file to execute (if omitted, starts the REPL). Accepts more
    /// than one positional so a second argument can be rejected with the
    /// usage-error exit code below instead of clap's generic one.
    #[arg(value_name = "FILE")]
    script: Vec<PathBuf>,
}

fn main() {
    let args = CliArgs::parse();

    let exit_code = match args.script.as_slice() {
        [] => run_prompt(),
        [path] => run_file(path),
        _ => {
            eprintln!("Usage: loxrs [script]");
            config::EXIT_USAGE
        }
    };

    std::process::exit(exit_code);
}

fn run_file(path: &PathBuf) -> i32 {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Cannot read script file {}: {}", path.display(), e);
            return config::EXIT_USAGE;
        }
    };

    let mut reporter = Reporter::new();
    let interpreter = Interpreter::new();
    loxrs::run_with(&source, &mut reporter, &interpreter)
}

/// Interactive loop: each line runs against the same interpreter (so
/// variables and functions persist across prompts) but clears `had_error`
/// beforehand, so a bad line doesn't poison the ones after it.
fn run_prompt() -> i32 {
    let mut reporter = Reporter::new();
    let interpreter = Interpreter::new();

    let Ok(mut rl) = DefaultEditor::new() else {
        eprintln!("Failed to initialize REPL");
        return config::EXIT_SOFTWARE;
    };

    loop {
        match rl.readline(config::REPL_PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());
                reporter.reset();
                loxrs::run_with(&line, &mut reporter, &interpreter);
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    0
}
