//! Line-at-a-time front end.

use std::io::{self, BufRead, Write};

use crate::{parse_source, tokens, LineOutcome, Mode, Session, SyntaxErrors, Token};

pub const PROMPT: &str = ">> ";

/// Read lines from `input` until end of input or `.exit`, writing results
/// to `output`. Every line runs against the same `session`.
pub fn start<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    session: &mut Session,
    mode: Mode,
) -> io::Result<()> {
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(());
        }
        let line = line.trim_end_matches(['\n', '\r']);

        match line {
            "" => {}
            ".exit" => return Ok(()),
            _ => eval_line(&mut output, session, mode, line)?,
        }
    }
}

fn eval_line<W: Write>(output: &mut W, session: &mut Session, mode: Mode, line: &str) -> io::Result<()> {
    match mode {
        Mode::Tokens => {
            for token in tokens(line) {
                writeln!(output, "{}", format_token(&token))?;
            }
        }
        Mode::Ast => {
            let result = parse_source(line);
            if result.errors.has_errors() {
                write_syntax_errors(output, &result.errors)?;
            } else {
                writeln!(output, "{}", result.program)?;
            }
        }
        Mode::Evaluate => match session.eval_line(line) {
            LineOutcome::Errors(errors) => write_syntax_errors(output, &errors)?,
            LineOutcome::Value(value) => writeln!(output, "{}", value.inspect())?,
        },
    }
    Ok(())
}

/// `line:col KIND "literal"`
pub fn format_token(token: &Token) -> String {
    format!("{} {} {:?}", token.span, token.kind, token.literal)
}

/// One tab-indented line per error, after a header.
pub fn write_syntax_errors<W: Write>(output: &mut W, errors: &SyntaxErrors) -> io::Result<()> {
    writeln!(output, "parser errors:")?;
    for error in errors {
        writeln!(output, "\t{}: {}", error.span, error.message)?;
    }
    Ok(())
}
