//! Parser for the filter query syntax.
//!
//! Grammar (case-insensitive keywords, `OR` binding loosest):
//!
//! ```text
//! expression ::= and ( OR and )*
//! and        ::= unary ( AND unary )*
//! unary      ::= ( NOT | ! | ~ ) unary | primary
//! primary    ::= '(' expression ')' | true | false | field operator value
//! value      ::= string | number | true | false | null | literal
//!              | '[' value ( ',' value )* ']'
//! ```
//!
//! Binary operators associate left, producing two-child nodes. The parser
//! never fabricates expression nodes itself: everything is constructed
//! through the supplied builder, so parsing into a typed tree validates
//! terms as they are built.

use std::str::FromStr;

use crate::builder::{ExpressionBuilder, TreeBuilder};
use crate::errors::FilterError;
use crate::expression::Expression;
use crate::operator::Operator;
use crate::value::Value;

/// Parse query text, building the result through the given builder over
/// string field names.
pub fn parse_with<B: ExpressionBuilder<String>>(
    input: &str,
    builder: &B,
) -> Result<B::Output, FilterError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        builder,
    };
    let result = parser.or_expression()?;
    match parser.peek() {
        None => Ok(result),
        Some(token) => Err(FilterError::parse(format!(
            "unexpected input after expression: {:?}",
            token
        ))),
    }
}

impl FromStr for Expression<String> {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_with(s, &TreeBuilder::<String>::new())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    /// Identifier, keyword or bare literal.
    Word(String),
    /// Double-quoted string (quotes stripped).
    Str(String),
    /// Unparsed numeric text.
    Number(String),
    /// Operator symbol such as `=`, `!=`, `<=`, `!`, `~`.
    Symbol(String),
}

fn tokenize(input: &str) -> Result<Vec<Token>, FilterError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '[' => {
                chars.next();
                tokens.push(Token::LBracket);
            }
            ']' => {
                chars.next();
                tokens.push(Token::RBracket);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => s.push(c),
                        None => return Err(FilterError::parse("unterminated string")),
                    }
                }
                tokens.push(Token::Str(s));
            }
            '=' | '!' | '<' | '>' | '~' => {
                chars.next();
                let mut sym = c.to_string();
                if let Some(&next) = chars.peek() {
                    let two = format!("{}{}", c, next);
                    if matches!(two.as_str(), "==" | "!=" | "<>" | "<=" | ">=" | "~=") {
                        sym = two;
                        chars.next();
                    }
                }
                tokens.push(Token::Symbol(sym));
            }
            c if c.is_ascii_digit() || c == '-' => {
                chars.next();
                let mut num = c.to_string();
                if c == '-' && !chars.peek().is_some_and(|n| n.is_ascii_digit()) {
                    return Err(FilterError::parse("unexpected character: -"));
                }
                while let Some(&n) = chars.peek() {
                    if n.is_ascii_digit() || n == '.' {
                        num.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Number(num));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut word = String::new();
                while let Some(&n) = chars.peek() {
                    if n.is_alphanumeric() || n == '_' || n == '.' {
                        word.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Word(word));
            }
            other => {
                return Err(FilterError::parse(format!(
                    "unexpected character: {}",
                    other
                )))
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a, B> {
    tokens: Vec<Token>,
    pos: usize,
    builder: &'a B,
}

impl<'a, B: ExpressionBuilder<String>> Parser<'a, B> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w.eq_ignore_ascii_case(keyword))
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), FilterError> {
        if self.at_keyword(keyword) {
            self.pos += 1;
            Ok(())
        } else {
            Err(FilterError::parse(format!(
                "expected {}, found {:?}",
                keyword,
                self.peek()
            )))
        }
    }

    fn or_expression(&mut self) -> Result<B::Output, FilterError> {
        let mut left = self.and_expression()?;
        while self.at_keyword("OR") {
            self.pos += 1;
            let right = self.and_expression()?;
            left = self.builder.or(vec![left, right])?;
        }
        Ok(left)
    }

    fn and_expression(&mut self) -> Result<B::Output, FilterError> {
        let mut left = self.unary_expression()?;
        while self.at_keyword("AND") {
            self.pos += 1;
            let right = self.unary_expression()?;
            left = self.builder.and(vec![left, right])?;
        }
        Ok(left)
    }

    fn unary_expression(&mut self) -> Result<B::Output, FilterError> {
        let negated = match self.peek() {
            Some(Token::Word(w)) if w.eq_ignore_ascii_case("NOT") => true,
            Some(Token::Symbol(s)) if s == "!" || s == "~" => true,
            _ => false,
        };
        if negated {
            self.pos += 1;
            let inner = self.unary_expression()?;
            return self.builder.not(inner);
        }
        self.primary_expression()
    }

    fn primary_expression(&mut self) -> Result<B::Output, FilterError> {
        if self.peek() == Some(&Token::LParen) {
            self.pos += 1;
            let inner = self.or_expression()?;
            match self.advance() {
                Some(Token::RParen) => return Ok(inner),
                other => {
                    return Err(FilterError::parse(format!(
                        "expected ), found {:?}",
                        other
                    )))
                }
            }
        }
        // true/false are keywords, so no field may carry those names.
        if self.at_keyword("true") || self.at_keyword("false") {
            let value = self.at_keyword("true");
            self.pos += 1;
            return self.builder.literal(value);
        }
        let field = match self.advance() {
            Some(Token::Word(w)) => w,
            other => {
                return Err(FilterError::parse(format!(
                    "expected a field or (, found {:?}",
                    other
                )))
            }
        };
        let op = self.operator()?;
        let value = self.value()?;
        if op.is_membership() && !value.is_list() {
            return Err(FilterError::parse(format!(
                "{} requires a list value",
                op
            )));
        }
        self.builder.term(field, op, value)
    }

    fn operator(&mut self) -> Result<Operator, FilterError> {
        match self.advance() {
            Some(Token::Symbol(s)) => s.parse(),
            Some(Token::Word(w)) => {
                if w.eq_ignore_ascii_case("IS") {
                    Ok(Operator::Eq)
                } else if w.eq_ignore_ascii_case("IN") {
                    Ok(Operator::In)
                } else if w.eq_ignore_ascii_case("NOT") {
                    self.expect_keyword("IN")?;
                    Ok(Operator::NotIn)
                } else if w.eq_ignore_ascii_case("CONTAINS") {
                    Ok(Operator::Contains)
                } else if w.eq_ignore_ascii_case("STARTS") {
                    self.expect_keyword("WITH")?;
                    Ok(Operator::StartsWith)
                } else if w.eq_ignore_ascii_case("ENDS") {
                    self.expect_keyword("WITH")?;
                    Ok(Operator::EndsWith)
                } else {
                    Err(FilterError::parse(format!(
                        "expected a comparison operator, found {}",
                        w
                    )))
                }
            }
            other => Err(FilterError::parse(format!(
                "expected a comparison operator, found {:?}",
                other
            ))),
        }
    }

    fn value(&mut self) -> Result<Value, FilterError> {
        match self.advance() {
            Some(Token::Str(s)) => Ok(Value::Text(s)),
            Some(Token::Number(raw)) => parse_number(&raw),
            Some(Token::Word(w)) => {
                if w.eq_ignore_ascii_case("true") {
                    Ok(Value::Bool(true))
                } else if w.eq_ignore_ascii_case("false") {
                    Ok(Value::Bool(false))
                } else if w.eq_ignore_ascii_case("null") {
                    Ok(Value::Null)
                } else {
                    Ok(Value::Symbol(w))
                }
            }
            Some(Token::LBracket) => {
                let mut values = Vec::new();
                if self.peek() == Some(&Token::RBracket) {
                    self.pos += 1;
                    return Ok(Value::List(values));
                }
                loop {
                    values.push(self.value()?);
                    match self.advance() {
                        Some(Token::Comma) => continue,
                        Some(Token::RBracket) => break,
                        other => {
                            return Err(FilterError::parse(format!(
                                "expected , or ], found {:?}",
                                other
                            )))
                        }
                    }
                }
                Ok(Value::List(values))
            }
            other => Err(FilterError::parse(format!(
                "expected a value, found {:?}",
                other
            ))),
        }
    }
}

fn parse_number(raw: &str) -> Result<Value, FilterError> {
    if let Ok(n) = raw.parse::<i64>() {
        return Ok(Value::Integer(n));
    }
    raw.parse::<f64>()
        .map(Value::Decimal)
        .map_err(|_| FilterError::parse(format!("invalid number: {}", raw)))
}
