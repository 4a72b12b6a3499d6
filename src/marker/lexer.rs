// src/marker/lexer.rs

//! Tokenizer for environment markers
//!
//! Produces identifiers (dotted names are one token), the `and`/`or`
//! keywords, comparison operators (including the two-word `not in`), quoted
//! strings and a final end-of-input token. Anything else is a syntax error.

use std::fmt;

use crate::error::{Error, Result};

/// Comparison operator of a marker operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    In,
    NotIn,
}

impl Operator {
    /// Marker spelling of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::In => "in",
            Self::NotIn => "not in",
        }
    }

    /// Apply the operator to two resolved string values
    ///
    /// Ordering operators compare strings lexicographically. `in` tests
    /// whether `left` occurs inside `right`.
    pub fn apply(&self, left: &str, right: &str) -> bool {
        match self {
            Self::Equal => left == right,
            Self::NotEqual => left != right,
            Self::Greater => left > right,
            Self::GreaterOrEqual => left >= right,
            Self::Less => left < right,
            Self::LessOrEqual => left <= right,
            Self::In => right.contains(left),
            Self::NotIn => !right.contains(left),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A marker token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Identifier such as `os.name`
    Name(String),
    /// Quoted literal, quotes included
    Str(String),
    /// Comparison operator
    Op(Operator),
    And,
    Or,
    End,
}

/// Whether `value` is a quoted literal: same quote character on both ends
/// and at least two characters long
pub fn is_quoted(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 2
        && matches!(bytes[0], b'\'' | b'"')
        && bytes[bytes.len() - 1] == bytes[0]
}

/// Streaming tokenizer over a marker string
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            finished: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(offset)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn error(&self, message: impl fmt::Display) -> Error {
        Error::MarkerSyntax(format!(
            "{} at offset {} in {:?}",
            message, self.pos, self.source
        ))
    }

    /// Produce the next token; [`Token::End`] once input is exhausted
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let Some(c) = self.peek() else {
            self.finished = true;
            return Ok(Token::End);
        };

        if c.is_ascii_alphabetic() || c == '_' {
            return self.name_or_keyword();
        }
        if c == '\'' || c == '"' {
            return self.string(c);
        }
        if c.is_ascii_digit() {
            return Err(self.error("unquoted numbers are not supported"));
        }
        self.operator(c)
    }

    fn identifier(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }
            self.pos += 1;
        }
        &self.source[start..self.pos]
    }

    fn name_or_keyword(&mut self) -> Result<Token> {
        let start = self.pos;
        self.identifier();

        // sys.platform, platform.machine, ...
        while self.peek() == Some('.')
            && self
                .peek_at(1)
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        {
            self.pos += 1;
            self.identifier();
        }

        let word = &self.source[start..self.pos];
        match word {
            "and" => Ok(Token::And),
            "or" => Ok(Token::Or),
            "in" => Ok(Token::Op(Operator::In)),
            "not" => {
                self.skip_whitespace();
                let follow_start = self.pos;
                if self.identifier() == "in" {
                    Ok(Token::Op(Operator::NotIn))
                } else {
                    self.pos = follow_start;
                    Err(self.error("expected 'in' after 'not'"))
                }
            }
            _ => Ok(Token::Name(word.to_string())),
        }
    }

    fn string(&mut self, quote: char) -> Result<Token> {
        let start = self.pos;
        self.pos += quote.len_utf8();
        match self.source[self.pos..].find(quote) {
            Some(offset) => {
                self.pos += offset + quote.len_utf8();
                Ok(Token::Str(self.source[start..self.pos].to_string()))
            }
            None => {
                self.pos = start;
                Err(self.error("unterminated string"))
            }
        }
    }

    fn operator(&mut self, c: char) -> Result<Token> {
        let two = (c, self.peek_at(1));
        let (op, len) = match two {
            ('=', Some('=')) => (Operator::Equal, 2),
            ('!', Some('=')) => (Operator::NotEqual, 2),
            ('>', Some('=')) => (Operator::GreaterOrEqual, 2),
            ('<', Some('=')) => (Operator::LessOrEqual, 2),
            ('>', _) => (Operator::Greater, 1),
            ('<', _) => (Operator::Less, 1),
            _ => return Err(self.error(format!("unsupported token {:?}", c))),
        };
        self.pos += len;
        Ok(Token::Op(op))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.is_err() {
            self.finished = true;
        }
        Some(token)
    }
}

/// Tokenize a whole marker, including the trailing [`Token::End`]
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple_comparison() {
        let tokens = tokenize("sys.platform == 'linux2'").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Name("sys.platform".to_string()),
                Token::Op(Operator::Equal),
                Token::Str("'linux2'".to_string()),
                Token::End,
            ]
        );
    }

    #[test]
    fn test_tokenize_connectives_and_not_in() {
        let tokens = tokenize("'win' not in sys.platform or os.name != \"nt\"").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Str("'win'".to_string()),
                Token::Op(Operator::NotIn),
                Token::Name("sys.platform".to_string()),
                Token::Or,
                Token::Name("os.name".to_string()),
                Token::Op(Operator::NotEqual),
                Token::Str("\"nt\"".to_string()),
                Token::End,
            ]
        );
    }

    #[test]
    fn test_tokenize_all_operators() {
        let tokens = tokenize("< <= > >= == != in").unwrap();
        let ops: Vec<Operator> = tokens
            .into_iter()
            .filter_map(|t| match t {
                Token::Op(op) => Some(op),
                _ => None,
            })
            .collect();
        assert_eq!(
            ops,
            vec![
                Operator::Less,
                Operator::LessOrEqual,
                Operator::Greater,
                Operator::GreaterOrEqual,
                Operator::Equal,
                Operator::NotEqual,
                Operator::In,
            ]
        );
    }

    #[test]
    fn test_tokenize_rejects_unsupported_tokens() {
        assert!(matches!(tokenize("python_version >= 2.6"), Err(Error::MarkerSyntax(_))));
        assert!(matches!(tokenize("(os.name == 'nt')"), Err(Error::MarkerSyntax(_))));
        assert!(matches!(tokenize("os.name = 'nt'"), Err(Error::MarkerSyntax(_))));
        assert!(matches!(tokenize("os.name == 'nt"), Err(Error::MarkerSyntax(_))));
        assert!(matches!(tokenize("'a' not 'b'"), Err(Error::MarkerSyntax(_))));
    }

    #[test]
    fn test_is_quoted() {
        assert!(is_quoted("'x'"));
        assert!(is_quoted("\"\""));
        assert!(!is_quoted("'"));
        assert!(!is_quoted("'x\""));
        assert!(!is_quoted("os.name"));
    }

    #[test]
    fn test_operator_apply() {
        assert!(Operator::GreaterOrEqual.apply("2.7", "2.6"));
        assert!(Operator::Less.apply("2.10", "2.6")); // string ordering
        assert!(Operator::In.apply("linux", "linux2"));
        assert!(Operator::NotIn.apply("win", "linux2"));
    }
}
