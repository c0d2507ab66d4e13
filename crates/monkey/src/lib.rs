//! Monkey interpreter: orchestrates the full pipeline.
//!
//! ```text
//! Monkey Source → Lexer → Parser → Evaluator → Object
//! ```
//!
//! Syntax errors and runtime errors travel separately: the parser's
//! [`SyntaxErrors`] are reported alongside the value of the (possibly
//! partial) program, and runtime failures come back as [`Object::Error`].

pub mod repl;

use std::path::{Path, PathBuf};
use std::sync::Once;

use serde::{Deserialize, Serialize};

pub use monkey_eval::{new_env, Env, Environment, EvalError, Evaluator, Object, DEFAULT_MAX_DEPTH};
pub use monkey_lexer::{lex, Lexer, Token, TokenKind};
pub use monkey_parser::{ParseResult, Parser};
pub use monkey_types::ast::Program;
pub use monkey_types::{ErrorCode, Span, SyntaxError, SyntaxErrors};

/// Host-level failures, outside the language's own error channels.
#[derive(Debug, thiserror::Error)]
pub enum MonkeyError {
    #[error("cannot read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Interpreter settings shared by the file runner and the REPL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Nested user-function calls allowed before evaluation stops.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// What a front end does with each piece of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Parse and evaluate, printing the inspected value.
    #[default]
    Evaluate,
    /// Print the token stream.
    Tokens,
    /// Print the canonical rendering of the parsed program.
    Ast,
}

// ══════════════════════════════════════════════════════════════════════════════
// Pipeline
// ══════════════════════════════════════════════════════════════════════════════

/// Lex the whole source, including the trailing EOF token.
pub fn tokens(source: &str) -> Vec<Token> {
    lex(source).collect()
}

/// Lex and parse source text.
pub fn parse_source(source: &str) -> ParseResult {
    monkey_parser::parse(lex(source))
}

/// Outcome of running one source text from scratch.
#[derive(Debug, Clone)]
pub struct Interpretation {
    /// The parsed program; statements that failed to parse are absent.
    pub program: Program,
    pub errors: SyntaxErrors,
    /// Value of the last statement, or [`Object::Error`].
    pub value: Object,
}

impl Interpretation {
    /// True when the source parsed cleanly and evaluated without error.
    pub fn success(&self) -> bool {
        self.errors.is_empty() && !self.value.is_error()
    }

    /// Serializable summary for `--json` output.
    pub fn report(&self) -> Report {
        Report {
            success: self.success(),
            output: self.value.inspect(),
            errors: self.errors.clone(),
        }
    }
}

/// JSON-friendly view of an [`Interpretation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub success: bool,
    /// Inspected result value.
    pub output: String,
    pub errors: SyntaxErrors,
}

/// Run source text in a fresh environment with default settings.
pub fn interpret(source: &str) -> Interpretation {
    interpret_with(source, &Config::default())
}

/// Run source text in a fresh environment.
///
/// The program is evaluated even when it has syntax errors: whatever
/// statements parsed still run.
#[tracing::instrument(level = "debug", skip_all)]
pub fn interpret_with(source: &str, config: &Config) -> Interpretation {
    let ParseResult { program, errors } = parse_source(source);
    if errors.has_errors() {
        tracing::debug!(errors = errors.len(), "evaluating partial program");
    }
    let value = Evaluator::with_max_depth(config.max_depth).eval(&program, &new_env());
    Interpretation {
        program,
        errors,
        value,
    }
}

/// Read and run a source file.
pub fn run_file(path: &Path, config: &Config) -> Result<Interpretation, MonkeyError> {
    let source = read_source(path)?;
    Ok(interpret_with(&source, config))
}

/// Read a source file.
pub fn read_source(path: &Path) -> Result<String, MonkeyError> {
    std::fs::read_to_string(path).map_err(|source| MonkeyError::Read {
        path: path.to_path_buf(),
        source,
    })
}

// ══════════════════════════════════════════════════════════════════════════════
// Session
// ══════════════════════════════════════════════════════════════════════════════

/// Result of one line fed to a [`Session`].
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// The line did not parse; nothing was evaluated.
    Errors(SyntaxErrors),
    Value(Object),
}

/// Persistent interpreter state for line-at-a-time input: bindings made by
/// one line are visible to the next.
pub struct Session {
    env: Env,
    evaluator: Evaluator,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            env: new_env(),
            evaluator: Evaluator::with_max_depth(config.max_depth),
        }
    }

    /// Parse one line and, if it parsed cleanly, evaluate it against the
    /// session environment.
    pub fn eval_line(&mut self, line: &str) -> LineOutcome {
        let ParseResult { program, errors } = parse_source(line);
        if errors.has_errors() {
            return LineOutcome::Errors(errors);
        }
        LineOutcome::Value(self.evaluator.eval(&program, &self.env))
    }

    /// The session's top-level environment.
    pub fn env(&self) -> &Env {
        &self.env
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Logging
// ══════════════════════════════════════════════════════════════════════════════

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set; safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}
