//! Core Monkey lexer — converts source text to tokens on demand.
//!
//! - Whitespace, newlines included, is insignificant and skipped
//! - One character of lookahead splits `==`/`!=` from `=`/`!`
//! - Unrecognised characters become [`TokenKind::Illegal`]; the lexer never fails
//! - Once the input is exhausted every call yields [`TokenKind::Eof`]

use monkey_types::{Span, Token, TokenKind};

/// The Monkey lexer.
///
/// Tokens are produced lazily by [`Lexer::next_token`]. The lexer can only be
/// restarted by constructing a new one over the same source.
#[derive(Debug, Clone)]
pub struct Lexer {
    /// The source text as characters.
    source: Vec<char>,
    /// Index of the next unread character.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
    /// Set once the iterator has handed out `Eof`.
    finished: bool,
}

impl Lexer {
    /// Create a new lexer over `source`.
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            finished: false,
        }
    }

    /// Scan and return the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start_line = self.line;
        let start_col = self.col;
        let ch = match self.advance() {
            Some(ch) => ch,
            None => return Token::new(TokenKind::Eof, "", self.current_span()),
        };

        match ch {
            '=' => self.one_or_two(ch, TokenKind::Assign, TokenKind::Eq, start_line, start_col),
            '!' => self.one_or_two(ch, TokenKind::Bang, TokenKind::NotEq, start_line, start_col),
            '+' => self.single(TokenKind::Plus, ch, start_line, start_col),
            '-' => self.single(TokenKind::Minus, ch, start_line, start_col),
            '*' => self.single(TokenKind::Asterisk, ch, start_line, start_col),
            '/' => self.single(TokenKind::Slash, ch, start_line, start_col),
            '<' => self.single(TokenKind::Lt, ch, start_line, start_col),
            '>' => self.single(TokenKind::Gt, ch, start_line, start_col),
            ',' => self.single(TokenKind::Comma, ch, start_line, start_col),
            ';' => self.single(TokenKind::Semicolon, ch, start_line, start_col),
            '(' => self.single(TokenKind::LParen, ch, start_line, start_col),
            ')' => self.single(TokenKind::RParen, ch, start_line, start_col),
            '{' => self.single(TokenKind::LBrace, ch, start_line, start_col),
            '}' => self.single(TokenKind::RBrace, ch, start_line, start_col),
            '[' => self.single(TokenKind::LBracket, ch, start_line, start_col),
            ']' => self.single(TokenKind::RBracket, ch, start_line, start_col),
            '"' => self.scan_string(start_line, start_col),
            c if is_letter(c) => self.scan_identifier(c, start_line, start_col),
            c if c.is_ascii_digit() => self.scan_number(c, start_line, start_col),
            c => self.single(TokenKind::Illegal, c, start_line, start_col),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Token scanners
    // ─────────────────────────────────────────────────────────────

    fn single(&self, kind: TokenKind, ch: char, start_line: u32, start_col: u32) -> Token {
        Token::new(kind, ch.to_string(), self.span_from(start_line, start_col))
    }

    /// `=`/`==` and `!`/`!=`: the two-character form wins when followed by `=`.
    fn one_or_two(
        &mut self,
        ch: char,
        one: TokenKind,
        two: TokenKind,
        start_line: u32,
        start_col: u32,
    ) -> Token {
        if self.peek() == Some('=') {
            self.advance();
            Token::new(two, format!("{ch}="), self.span_from(start_line, start_col))
        } else {
            self.single(one, ch, start_line, start_col)
        }
    }

    fn scan_identifier(&mut self, first: char, start_line: u32, start_col: u32) -> Token {
        let mut literal = String::from(first);
        while let Some(ch) = self.peek().filter(|&c| is_letter(c)) {
            literal.push(ch);
            self.advance();
        }
        let kind = TokenKind::from_keyword(&literal).unwrap_or(TokenKind::Ident);
        Token::new(kind, literal, self.span_from(start_line, start_col))
    }

    fn scan_number(&mut self, first: char, start_line: u32, start_col: u32) -> Token {
        let mut literal = String::from(first);
        while let Some(ch) = self.peek().filter(char::is_ascii_digit) {
            literal.push(ch);
            self.advance();
        }
        Token::new(TokenKind::Int, literal, self.span_from(start_line, start_col))
    }

    /// Scan a string literal after the opening `"`.
    ///
    /// The token literal holds the unescaped contents. An unterminated string
    /// runs to the end of the input.
    fn scan_string(&mut self, start_line: u32, start_col: u32) -> Token {
        let mut buf = String::new();
        loop {
            match self.advance() {
                None | Some('"') => break,
                Some('\\') => match self.advance() {
                    Some('n') => buf.push('\n'),
                    Some('t') => buf.push('\t'),
                    Some('r') => buf.push('\r'),
                    Some('"') => buf.push('"'),
                    Some('\\') => buf.push('\\'),
                    Some(other) => {
                        buf.push('\\');
                        buf.push(other);
                    }
                    None => buf.push('\\'),
                },
                Some(ch) => buf.push(ch),
            }
        }
        Token::new(TokenKind::String, buf, self.span_from(start_line, start_col))
    }
}

impl Iterator for Lexer {
    type Item = Token;

    /// Yields every token including the final `Eof`, then `None`.
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}

fn is_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}
