//! Expression parsing with Pratt (top-down operator precedence) rules.
//!
//! Binding power (lowest → highest):
//! 1. `==`, `!=`
//! 2. `<`, `>`
//! 3. `+`, `-`
//! 4. `*`, `/`
//! 5. unary `-`, `!`
//! 6. `(` (call)
//! 7. `[` (index)

use std::rc::Rc;

use monkey_lexer::TokenKind;
use monkey_types::ast::*;
use monkey_types::ErrorCode;

use crate::parser::Parser;

/// Deepest expression nesting the parser accepts. Blocks share the limit.
pub const MAX_EXPR_DEPTH: u32 = 256;

/// Remaining native stack below which parsing grows the stack.
pub(crate) const RED_ZONE: usize = 100 * 1024;
/// Size of each stack extension.
pub(crate) const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Binding power of an operator token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

impl From<TokenKind> for Precedence {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Eq | TokenKind::NotEq => Self::Equals,
            TokenKind::Lt | TokenKind::Gt => Self::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Self::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Self::Product,
            TokenKind::LParen => Self::Call,
            TokenKind::LBracket => Self::Index,
            _ => Self::Lowest,
        }
    }
}

impl Parser {
    // ══════════════════════════════════════════════════════════════════════════
    // Rule Registration
    // ══════════════════════════════════════════════════════════════════════════

    pub(crate) fn register_rules(&mut self) {
        self.register_prefix(TokenKind::Ident, Parser::parse_identifier);
        self.register_prefix(TokenKind::Int, Parser::parse_integer_literal);
        self.register_prefix(TokenKind::String, Parser::parse_string_literal);
        self.register_prefix(TokenKind::True, Parser::parse_boolean);
        self.register_prefix(TokenKind::False, Parser::parse_boolean);
        self.register_prefix(TokenKind::Bang, Parser::parse_prefix_expression);
        self.register_prefix(TokenKind::Minus, Parser::parse_prefix_expression);
        self.register_prefix(TokenKind::LParen, Parser::parse_grouped_expression);
        self.register_prefix(TokenKind::If, Parser::parse_if_expression);
        self.register_prefix(TokenKind::Function, Parser::parse_function_literal);
        self.register_prefix(TokenKind::LBracket, Parser::parse_array_literal);

        for kind in [
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Asterisk,
            TokenKind::Slash,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::Eq,
            TokenKind::NotEq,
        ] {
            self.register_infix(kind, Parser::parse_infix_expression);
        }
        self.register_infix(TokenKind::LParen, Parser::parse_call_expression);
        self.register_infix(TokenKind::LBracket, Parser::parse_index_expression);
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression starting at the current token, folding in infix
    /// operators that bind tighter than `precedence`.
    pub(crate) fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        self.expr_depth += 1;
        if self.expr_depth > MAX_EXPR_DEPTH {
            let span = self.cur_token.span;
            self.error_at(
                ErrorCode::NESTING_LIMIT_EXCEEDED,
                format!("Expression nesting exceeds the maximum depth of {MAX_EXPR_DEPTH}."),
                span,
            );
            self.expr_depth -= 1;
            return None;
        }
        let result = stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || {
            self.parse_pratt(precedence)
        });
        self.expr_depth -= 1;
        result
    }

    fn parse_pratt(&mut self, precedence: Precedence) -> Option<Expression> {
        let Some(prefix) = self.prefix_rule(self.cur_token.kind) else {
            self.no_prefix_parse_fn_error();
            return None;
        };
        let mut left = prefix(self)?;

        while !self.peek_token_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            let Some(infix) = self.infix_rule(self.peek_token.kind) else {
                return Some(left);
            };
            self.next_token();
            left = infix(self, left)?;
        }

        Some(left)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Prefix Rules
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_identifier(&mut self) -> Option<Expression> {
        Some(Expression::Identifier(Identifier::new(self.cur_token.clone())))
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::Integer(IntegerLiteral { token, value })),
            Err(_) => {
                self.error_at(
                    ErrorCode::INVALID_INTEGER,
                    format!("Could not parse {} as integer.", token.literal),
                    token.span,
                );
                None
            }
        }
    }

    fn parse_string_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let value = token.literal.clone();
        Some(Expression::String(StringLiteral { token, value }))
    }

    fn parse_boolean(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let value = token.kind == TokenKind::True;
        Some(Expression::Boolean(BooleanLiteral { token, value }))
    }

    /// `!<expr>` or `-<expr>`
    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let operator = PrefixOp::from_token_kind(token.kind)?;
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix(PrefixExpression {
            token,
            operator,
            right: Box::new(right),
        }))
    }

    /// `( <expr> )`
    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expression)
    }

    /// `if ( <cond> ) { ... } [ else { ... } ]`
    fn parse_if_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) || !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_token_is(TokenKind::Else) {
            self.next_token();
            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Some(Expression::If(IfExpression {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        }))
    }

    /// `fn ( <params> ) { <body> }`
    fn parse_function_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement()?;
        Some(Expression::Function(FunctionLiteral {
            token,
            parameters,
            body: Rc::new(body),
        }))
    }

    /// Comma-separated identifiers up to and including the closing `)`.
    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();
        if self.peek_token_is(TokenKind::RParen) {
            self.next_token();
            return Some(parameters);
        }

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        parameters.push(Identifier::new(self.cur_token.clone()));

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            if !self.expect_peek(TokenKind::Ident) {
                return None;
            }
            parameters.push(Identifier::new(self.cur_token.clone()));
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(parameters)
    }

    /// `[ <expr>, ... ]`
    fn parse_array_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Some(Expression::Array(ArrayLiteral { token, elements }))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Infix Rules
    // ══════════════════════════════════════════════════════════════════════════

    /// `<left> <op> <right>`; left-associative, so the right operand only
    /// takes operators binding tighter than this one.
    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        let operator = InfixOp::from_token_kind(token.kind)?;
        let precedence = self.cur_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix(InfixExpression {
            token,
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }))
    }

    /// `<function>( <args> )`
    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expression::Call(CallExpression {
            token,
            function: Box::new(function),
            arguments,
        }))
    }

    /// `<left>[ <index> ]`
    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }
        Some(Expression::Index(IndexExpression {
            token,
            left: Box::new(left),
            index: Box::new(index),
        }))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Helpers
    // ══════════════════════════════════════════════════════════════════════════

    /// Comma-separated expressions after an opening delimiter, up to and
    /// including `end`.
    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();
        if self.peek_token_is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }
        Some(list)
    }
}
