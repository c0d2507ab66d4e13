use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use monkey::repl::{self, format_token, write_syntax_errors};
use monkey::{
    interpret_with, parse_source, read_source, tokens, Config, Mode, MonkeyError, Session,
    DEFAULT_MAX_DEPTH,
};

/// Run Monkey programs, or start an interactive session when no file is given.
#[derive(Parser, Debug)]
#[command(name = "monkey", version)]
struct Cli {
    /// Path of source file
    file: Option<PathBuf>,
    /// Print the token stream instead of evaluating
    #[arg(long, default_value_t = false, conflicts_with = "ast")]
    tokens: bool,
    /// Print the parsed program in canonical form instead of evaluating
    #[arg(long, default_value_t = false)]
    ast: bool,
    /// Print a JSON report (success, output, syntax errors) for a file run
    #[arg(long, default_value_t = false, requires = "file")]
    json: bool,
    /// Maximum nested function calls
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.tokens {
            Mode::Tokens
        } else if self.ast {
            Mode::Ast
        } else {
            Mode::Evaluate
        }
    }

    fn config(&self) -> Config {
        Config {
            max_depth: self.max_depth,
        }
    }
}

fn main() -> ExitCode {
    monkey::init_tracing();
    let cli = Cli::parse();

    let result = match &cli.file {
        Some(path) => run_file(path, &cli),
        None => {
            let mut session = Session::new(cli.config());
            repl::start(io::stdin().lock(), io::stdout().lock(), &mut session, cli.mode())
                .map(|()| true)
                .map_err(MonkeyError::from)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("monkey: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Run one file in the selected mode. `Ok(false)` means the program had
/// syntax errors or ended in a runtime error.
fn run_file(path: &Path, cli: &Cli) -> Result<bool, MonkeyError> {
    let source = read_source(path)?;
    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();

    match cli.mode() {
        Mode::Tokens => {
            for token in tokens(&source) {
                writeln!(out, "{}", format_token(&token))?;
            }
            Ok(true)
        }
        Mode::Ast => {
            let result = parse_source(&source);
            if result.errors.has_errors() {
                write_syntax_errors(&mut err, &result.errors)?;
            }
            writeln!(out, "{}", result.program)?;
            Ok(result.errors.is_empty())
        }
        Mode::Evaluate => {
            let interpretation = interpret_with(&source, &cli.config());
            if cli.json {
                let json = serde_json::to_string_pretty(&interpretation.report())?;
                writeln!(out, "{json}")?;
            } else {
                if interpretation.errors.has_errors() {
                    write_syntax_errors(&mut err, &interpretation.errors)?;
                }
                writeln!(out, "{}", interpretation.value.inspect())?;
            }
            Ok(interpretation.success())
        }
    }
}
