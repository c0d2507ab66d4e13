//! AST node types for the Monkey language.
//!
//! Every node keeps the [`Token`] that introduced it. Nodes are built once by
//! the parser and never mutated; function bodies sit behind an [`Rc`] so that
//! closures created at runtime can share them without copying the tree.
//!
//! `Display` on any node renders its canonical form: prefix and infix
//! expressions are fully parenthesised (`-a * b` renders as `((-a) * b)`), and
//! the output of a well-formed program parses back to the same tree.

use crate::token::{Token, TokenKind};
use std::fmt;
use std::rc::Rc;

// ══════════════════════════════════════════════════════════════════════════════
// Program & Statements
// ══════════════════════════════════════════════════════════════════════════════

/// Root node: the ordered top-level statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// Literal of the first statement's token, or `""` for an empty program.
    pub fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map(|s| s.token().literal.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
    Block(BlockStatement),
}

impl Statement {
    pub fn token(&self) -> &Token {
        match self {
            Statement::Let(s) => &s.token,
            Statement::Return(s) => &s.token,
            Statement::Expression(s) => &s.token,
            Statement::Block(s) => &s.token,
        }
    }
}

/// `let <name> = <value>;`
#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub token: Token,
    pub name: Identifier,
    pub value: Expression,
}

/// `return <value>;`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub token: Token,
    pub value: Expression,
}

/// A bare expression in statement position.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub token: Token,
    pub expression: Expression,
}

/// `{ statements }`
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Integer(IntegerLiteral),
    String(StringLiteral),
    Boolean(BooleanLiteral),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    If(IfExpression),
    Function(FunctionLiteral),
    Call(CallExpression),
    Array(ArrayLiteral),
    Index(IndexExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

impl Identifier {
    pub fn new(token: Token) -> Self {
        let value = token.literal.clone();
        Self { token, value }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegerLiteral {
    pub token: Token,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub token: Token,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub token: Token,
    pub value: bool,
}

/// `<op><right>`
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpression {
    pub token: Token,
    pub operator: PrefixOp,
    pub right: Box<Expression>,
}

/// `<left> <op> <right>`
#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpression {
    pub token: Token,
    pub left: Box<Expression>,
    pub operator: InfixOp,
    pub right: Box<Expression>,
}

/// `if (<condition>) { ... } else { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct IfExpression {
    pub token: Token,
    pub condition: Box<Expression>,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

/// `fn(<parameters>) { <body> }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub token: Token,
    pub parameters: Vec<Identifier>,
    pub body: Rc<BlockStatement>,
}

/// `<function>(<arguments>)`; the token is the `(`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub token: Token,
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
}

/// `[<elements>]`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub token: Token,
    pub elements: Vec<Expression>,
}

/// `<left>[<index>]`; the token is the `[`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub token: Token,
    pub left: Box<Expression>,
    pub index: Box<Expression>,
}

// ══════════════════════════════════════════════════════════════════════════════
// Operators
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixOp {
    /// `!`
    Not,
    /// `-`
    Neg,
}

impl PrefixOp {
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Bang => Some(PrefixOp::Not),
            TokenKind::Minus => Some(PrefixOp::Neg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrefixOp::Not => "!",
            PrefixOp::Neg => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Less,
    Greater,
    Eq,
    NotEq,
}

impl InfixOp {
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Plus => InfixOp::Add,
            TokenKind::Minus => InfixOp::Sub,
            TokenKind::Asterisk => InfixOp::Mul,
            TokenKind::Slash => InfixOp::Div,
            TokenKind::Lt => InfixOp::Less,
            TokenKind::Gt => InfixOp::Greater,
            TokenKind::Eq => InfixOp::Eq,
            TokenKind::NotEq => InfixOp::NotEq,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Less => "<",
            InfixOp::Greater => ">",
            InfixOp::Eq => "==",
            InfixOp::NotEq => "!=",
        }
    }
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Canonical rendering
// ══════════════════════════════════════════════════════════════════════════════

/// Writes statements separated by a space. A `;` follows every expression
/// statement that has a successor, so `a; -b` does not come back as `a(-b)`.
fn write_statements(f: &mut fmt::Formatter<'_>, statements: &[Statement]) -> fmt::Result {
    for (i, statement) in statements.iter().enumerate() {
        if i > 0 {
            if let Statement::Expression(_) = statements[i - 1] {
                f.write_str(";")?;
            }
            f.write_str(" ")?;
        }
        write!(f, "{statement}")?;
    }
    Ok(())
}

fn write_comma_separated<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statements(f, &self.statements)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(s) => write!(f, "{s}"),
            Statement::Return(s) => write!(f, "{s}"),
            Statement::Expression(s) => write!(f, "{s}"),
            Statement::Block(s) => write!(f, "{s}"),
        }
    }
}

impl fmt::Display for LetStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "let {} = {};", self.name, self.value)
    }
}

impl fmt::Display for ReturnStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "return {};", self.value)
    }
}

impl fmt::Display for ExpressionStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return f.write_str("{ }");
        }
        f.write_str("{ ")?;
        write_statements(f, &self.statements)?;
        f.write_str(" }")
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(e) => write!(f, "{e}"),
            Expression::Integer(e) => write!(f, "{}", e.value),
            Expression::String(e) => write!(f, "{e}"),
            Expression::Boolean(e) => write!(f, "{}", e.value),
            Expression::Prefix(e) => write!(f, "({}{})", e.operator, e.right),
            Expression::Infix(e) => write!(f, "({} {} {})", e.left, e.operator, e.right),
            Expression::If(e) => write!(f, "{e}"),
            Expression::Function(e) => write!(f, "{e}"),
            Expression::Call(e) => {
                write!(f, "{}(", e.function)?;
                write_comma_separated(f, &e.arguments)?;
                f.write_str(")")
            }
            Expression::Array(e) => {
                f.write_str("[")?;
                write_comma_separated(f, &e.elements)?;
                f.write_str("]")
            }
            Expression::Index(e) => write!(f, "({}[{}])", e.left, e.index),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl fmt::Display for StringLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for ch in self.value.chars() {
            match ch {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\t' => f.write_str("\\t")?,
                '\r' => f.write_str("\\r")?,
                other => write!(f, "{other}")?,
            }
        }
        f.write_str("\"")
    }
}

impl fmt::Display for IfExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if ({}) {}", self.condition, self.consequence)?;
        if let Some(alternative) = &self.alternative {
            write!(f, " else {alternative}")?;
        }
        Ok(())
    }
}

impl fmt::Display for FunctionLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn(")?;
        write_comma_separated(f, &self.parameters)?;
        write!(f, ") {}", self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Span;

    fn tok(kind: TokenKind, literal: &str) -> Token {
        Token::new(kind, literal, Span::point(1, 1))
    }

    fn ident(name: &str) -> Identifier {
        Identifier::new(tok(TokenKind::Ident, name))
    }

    #[test]
    fn test_let_statement_string() {
        let program = Program::new(vec![Statement::Let(LetStatement {
            token: tok(TokenKind::Let, "let"),
            name: ident("myVar"),
            value: Expression::Identifier(ident("anotherVar")),
        })]);
        assert_eq!(program.to_string(), "let myVar = anotherVar;");
        assert_eq!(program.token_literal(), "let");
    }

    #[test]
    fn test_expression_statements_are_separated() {
        let stmt = |name: &str| {
            Statement::Expression(ExpressionStatement {
                token: tok(TokenKind::Ident, name),
                expression: Expression::Identifier(ident(name)),
            })
        };
        let program = Program::new(vec![stmt("a"), stmt("b")]);
        assert_eq!(program.to_string(), "a; b");
    }

    #[test]
    fn test_string_literal_is_quoted_and_escaped() {
        let lit = StringLiteral {
            token: tok(TokenKind::String, "say \"hi\""),
            value: "say \"hi\"".into(),
        };
        assert_eq!(lit.to_string(), r#""say \"hi\"""#);
    }

    #[test]
    fn test_empty_program() {
        let program = Program::default();
        assert_eq!(program.to_string(), "");
        assert_eq!(program.token_literal(), "");
    }

    #[test]
    fn test_operator_round_trip_through_token_kind() {
        for kind in [TokenKind::Plus, TokenKind::Lt, TokenKind::NotEq, TokenKind::Slash] {
            let op = InfixOp::from_token_kind(kind).unwrap();
            assert_eq!(op.as_str(), kind.name());
        }
        assert_eq!(PrefixOp::from_token_kind(TokenKind::Bang), Some(PrefixOp::Not));
        assert_eq!(PrefixOp::from_token_kind(TokenKind::Plus), None);
    }
}
