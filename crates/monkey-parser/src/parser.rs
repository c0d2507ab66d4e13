//! Core parser infrastructure: token cursor, rule tables, error reporting.

use std::collections::HashMap;

use monkey_lexer::{Lexer, Token, TokenKind};
use monkey_types::ast::{Expression, Program};
use monkey_types::{ErrorCode, Span, SyntaxError, SyntaxErrors};

use crate::parse_expr::Precedence;

/// Parses the expression that starts at the current token.
pub(crate) type PrefixParseFn = fn(&mut Parser) -> Option<Expression>;
/// Extends an already parsed left operand; called with the operator as the
/// current token.
pub(crate) type InfixParseFn = fn(&mut Parser, Expression) -> Option<Expression>;

/// The Monkey parser.
///
/// Pulls tokens from a [`Lexer`] with one token of lookahead and builds a
/// [`Program`]. Syntax errors are recorded and parsing resumes at the next
/// statement, so one malformed statement never hides the rest.
pub struct Parser {
    lexer: Lexer,
    /// Token under examination.
    pub(crate) cur_token: Token,
    /// Token after `cur_token`.
    pub(crate) peek_token: Token,
    errors: SyntaxErrors,
    prefix_parse_fns: HashMap<TokenKind, PrefixParseFn>,
    infix_parse_fns: HashMap<TokenKind, InfixParseFn>,
    /// Current expression nesting depth.
    pub(crate) expr_depth: u32,
    /// Number of enclosing `{ ... }` blocks.
    pub(crate) block_depth: u32,
}

/// Result of parsing: the (possibly partial) program plus any syntax errors.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub program: Program,
    pub errors: SyntaxErrors,
}

impl Parser {
    /// Create a parser reading from `lexer`, with every prefix and infix
    /// rule registered.
    pub fn new(mut lexer: Lexer) -> Self {
        let cur_token = lexer.next_token();
        let peek_token = lexer.next_token();
        let mut parser = Self {
            lexer,
            cur_token,
            peek_token,
            errors: SyntaxErrors::empty(),
            prefix_parse_fns: HashMap::new(),
            infix_parse_fns: HashMap::new(),
            expr_depth: 0,
            block_depth: 0,
        };
        parser.register_rules();
        parser
    }

    // ── Rule tables ───────────────────────────────────────────────────────────

    pub(crate) fn register_prefix(&mut self, kind: TokenKind, rule: PrefixParseFn) {
        self.prefix_parse_fns.insert(kind, rule);
    }

    pub(crate) fn register_infix(&mut self, kind: TokenKind, rule: InfixParseFn) {
        self.infix_parse_fns.insert(kind, rule);
    }

    pub(crate) fn prefix_rule(&self, kind: TokenKind) -> Option<PrefixParseFn> {
        self.prefix_parse_fns.get(&kind).copied()
    }

    pub(crate) fn infix_rule(&self, kind: TokenKind) -> Option<InfixParseFn> {
        self.infix_parse_fns.get(&kind).copied()
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Shift the lookahead window by one token.
    pub(crate) fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.cur_token = std::mem::replace(&mut self.peek_token, next);
    }

    pub(crate) fn cur_token_is(&self, kind: TokenKind) -> bool {
        self.cur_token.kind == kind
    }

    pub(crate) fn peek_token_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    pub(crate) fn peek_precedence(&self) -> Precedence {
        Precedence::from(self.peek_token.kind)
    }

    pub(crate) fn cur_precedence(&self) -> Precedence {
        Precedence::from(self.cur_token.kind)
    }

    /// If the next token is `kind`, advance onto it and return `true`.
    /// Otherwise record an error and leave the cursor where it is.
    pub(crate) fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_token_is(kind) {
            self.next_token();
            true
        } else {
            self.peek_error(kind);
            false
        }
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    pub(crate) fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        self.errors.push(SyntaxError::new(code, message, span));
    }

    fn peek_error(&mut self, expected: TokenKind) {
        let message = format!(
            "Expected next token to be {}, got {} instead.",
            expected, self.peek_token.kind
        );
        let span = self.peek_token.span;
        self.error_at(ErrorCode::UNEXPECTED_TOKEN, message, span);
    }

    pub(crate) fn no_prefix_parse_fn_error(&mut self) {
        let message = format!("No prefix parse function for {} found.", self.cur_token.kind);
        let span = self.cur_token.span;
        self.error_at(ErrorCode::NO_PREFIX_RULE, message, span);
    }

    /// Syntax errors recorded so far.
    pub fn errors(&self) -> &SyntaxErrors {
        &self.errors
    }

    // ── Synchronization ───────────────────────────────────────────────────────

    /// Skip to the start of the next statement after a failed one.
    ///
    /// `start` is the span of the token the failed statement began with.
    /// Stops after a `;`, on a `let`/`return` other than that first token, on
    /// the `}` closing the enclosing block, or at end of input.
    pub(crate) fn synchronize(&mut self, start: Span) {
        loop {
            match self.cur_token.kind {
                TokenKind::Eof => return,
                TokenKind::Semicolon => {
                    self.next_token();
                    return;
                }
                TokenKind::RBrace if self.block_depth > 0 => return,
                TokenKind::Let | TokenKind::Return if self.cur_token.span != start => return,
                _ => self.next_token(),
            }
        }
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse statements until end of input.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.cur_token_is(TokenKind::Eof) {
            let start = self.cur_token.span;
            match self.parse_statement() {
                Some(statement) => {
                    statements.push(statement);
                    self.next_token();
                }
                None => self.synchronize(start),
            }
        }
        tracing::debug!(
            statements = statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        Program::new(statements)
    }

    /// Parse the whole token stream into a [`ParseResult`].
    pub fn parse(mut self) -> ParseResult {
        let program = self.parse_program();
        ParseResult {
            program,
            errors: self.errors,
        }
    }
}
