// src/marker/parser.rs

//! Streaming parser for environment markers
//!
//! Tokens are reduced into the AST in a single left-to-right pass. Each
//! operation collects its left operand, then its operator, then its right
//! operand. A connective (`and`/`or`) wraps everything parsed so far as its
//! left side, so connectives group strictly in textual order:
//!
//! ```text
//! a and b or c   =>  (a and b) or c
//! a or b and c   =>  (a or b) and c
//! ```
//!
//! There is no precedence between `and` and `or`, and no parentheses.

use std::fmt;

use super::lexer::{is_quoted, Lexer, Operator, Token};
use crate::error::{Error, Result};

/// One side of a comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// A variable reference such as `sys.platform`
    Variable(String),
    /// A quoted literal, quotes included
    Literal(String),
}

impl Operand {
    /// Literal value without its quotes; `None` for variables and for
    /// malformed literals
    pub fn literal_value(&self) -> Option<&str> {
        match self {
            Self::Literal(raw) if is_quoted(raw) => Some(&raw[1..raw.len() - 1]),
            _ => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(name) => f.write_str(name),
            Self::Literal(raw) => f.write_str(raw),
        }
    }
}

/// A single comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub left: Operand,
    pub op: Operator,
    pub right: Operand,
}

/// Marker AST
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Operation(Operation),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operation(op) => write!(f, "{} {} {}", op.left, op.op, op.right),
            Self::And(left, right) => write!(f, "({} and {})", left, right),
            Self::Or(left, right) => write!(f, "({} or {})", left, right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connective {
    And,
    Or,
}

impl Connective {
    fn join(self, left: Expr, right: Expr) -> Expr {
        match self {
            Self::And => Expr::And(Box::new(left), Box::new(right)),
            Self::Or => Expr::Or(Box::new(left), Box::new(right)),
        }
    }
}

/// Where the parser is within the current operation
#[derive(Debug)]
enum State {
    CollectingLeft,
    CollectingOperator { left: Operand },
    CollectingRight { left: Operand, op: Operator },
    AwaitingConnective,
}

/// Token-at-a-time marker parser
#[derive(Debug)]
pub struct Parser {
    state: State,
    /// Everything reduced so far
    done: Option<Expr>,
    /// Connective waiting for the operation being collected
    pending: Option<Connective>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: State::CollectingLeft,
            done: None,
            pending: None,
        }
    }

    fn unexpected(token: &Token, expected: &str) -> Error {
        let found = match token {
            Token::Name(name) => format!("name '{}'", name),
            Token::Str(raw) => format!("string {}", raw),
            Token::Op(op) => format!("operator '{}'", op),
            Token::And => "'and'".to_string(),
            Token::Or => "'or'".to_string(),
            Token::End => "end of marker".to_string(),
        };
        Error::MarkerSyntax(format!("expected {}, found {}", expected, found))
    }

    /// Hands the token back when it is not an operand
    fn operand(token: Token) -> std::result::Result<Operand, Token> {
        match token {
            Token::Name(name) => Ok(Operand::Variable(name)),
            Token::Str(raw) => Ok(Operand::Literal(raw)),
            other => Err(other),
        }
    }

    /// Feed one token; returns the finished AST on [`Token::End`]
    pub fn feed(&mut self, token: Token) -> Result<Option<Expr>> {
        let state = std::mem::replace(&mut self.state, State::AwaitingConnective);

        self.state = match state {
            State::CollectingLeft => match Self::operand(token) {
                Ok(left) => State::CollectingOperator { left },
                Err(other) => return Err(Self::unexpected(&other, "a name or a string")),
            },
            State::CollectingOperator { left } => match token {
                Token::Op(op) => State::CollectingRight { left, op },
                other => return Err(Self::unexpected(&other, "a comparison operator")),
            },
            State::CollectingRight { left, op } => match Self::operand(token) {
                Ok(right) => {
                    self.reduce(Expr::Operation(Operation { left, op, right }));
                    State::AwaitingConnective
                }
                Err(other) => return Err(Self::unexpected(&other, "a name or a string")),
            },
            State::AwaitingConnective => match token {
                Token::And => {
                    self.pending = Some(Connective::And);
                    State::CollectingLeft
                }
                Token::Or => {
                    self.pending = Some(Connective::Or);
                    State::CollectingLeft
                }
                Token::End => {
                    return self
                        .done
                        .take()
                        .map(Some)
                        .ok_or_else(|| Error::MarkerSyntax("empty marker".to_string()));
                }
                other => return Err(Self::unexpected(&other, "'and', 'or' or end of marker")),
            },
        };

        Ok(None)
    }

    fn reduce(&mut self, operation: Expr) {
        self.done = Some(match (self.done.take(), self.pending.take()) {
            (Some(previous), Some(connective)) => connective.join(previous, operation),
            _ => operation,
        });
    }
}

/// Parse a marker string into its AST
pub fn parse(source: &str) -> Result<Expr> {
    let mut lexer = Lexer::new(source);
    let mut parser = Parser::new();
    loop {
        let token = lexer.next_token()?;
        if let Some(expr) = parser.feed(token)? {
            return Ok(expr);
        }
    }
}
