//! Statement parsing: `let`, `return`, expression statements and blocks.
//!
//! On success each parser leaves the cursor on the statement's last token
//! (its `;` when one is present).

use monkey_lexer::TokenKind;
use monkey_types::ast::*;
use monkey_types::ErrorCode;

use crate::parse_expr::{Precedence, MAX_EXPR_DEPTH, RED_ZONE, STACK_PER_RECURSION};
use crate::parser::Parser;

impl Parser {
    /// Dispatch on the leading token.
    pub(crate) fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur_token.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::LBrace => {
                let block = self.parse_block_statement()?;
                self.skip_optional_semicolon();
                Some(Statement::Block(block))
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// `let <ident> = <expr> [;]`
    fn parse_let_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Identifier::new(self.cur_token.clone());
        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();
        Some(Statement::Let(LetStatement { token, name, value }))
    }

    /// `return <expr> [;]`
    fn parse_return_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();
        Some(Statement::Return(ReturnStatement { token, value }))
    }

    /// `<expr> [;]`
    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();
        Some(Statement::Expression(ExpressionStatement { token, expression }))
    }

    /// `{ <statements> }`, entered with the `{` as current token.
    ///
    /// Runs until the matching `}` or end of input, leaving the cursor on
    /// whichever it stopped at. Failed statements inside the block are
    /// dropped the same way as at top level.
    ///
    /// A block nested deeper than [`MAX_EXPR_DEPTH`] records one error, is
    /// skipped past its matching `}`, and yields `None`.
    pub(crate) fn parse_block_statement(&mut self) -> Option<BlockStatement> {
        if self.block_depth >= MAX_EXPR_DEPTH {
            let span = self.cur_token.span;
            self.error_at(
                ErrorCode::NESTING_LIMIT_EXCEEDED,
                format!("Block nesting exceeds the maximum depth of {MAX_EXPR_DEPTH}."),
                span,
            );
            self.skip_block();
            return None;
        }
        self.block_depth += 1;
        let block = stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || {
            self.parse_block_body()
        });
        self.block_depth -= 1;
        Some(block)
    }

    fn parse_block_body(&mut self) -> BlockStatement {
        let token = self.cur_token.clone();
        let mut statements = Vec::new();
        self.next_token();

        while !self.cur_token_is(TokenKind::RBrace) && !self.cur_token_is(TokenKind::Eof) {
            let start = self.cur_token.span;
            match self.parse_statement() {
                Some(statement) => {
                    statements.push(statement);
                    self.next_token();
                }
                None => self.synchronize(start),
            }
        }

        BlockStatement { token, statements }
    }

    /// Advance from a `{` past its matching `}` (or to end of input)
    /// without building anything.
    fn skip_block(&mut self) {
        let mut open = 0usize;
        loop {
            match self.cur_token.kind {
                TokenKind::Eof => return,
                TokenKind::LBrace => open += 1,
                TokenKind::RBrace => {
                    open -= 1;
                    if open == 0 {
                        self.next_token();
                        return;
                    }
                }
                _ => {}
            }
            self.next_token();
        }
    }

    fn skip_optional_semicolon(&mut self) {
        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }
    }
}
