//! Recursive-descent parser for rule strings
//!
//! Grammar:
//!
//! ```text
//! Rule    := Expr EOF
//! Expr    := Operand (("&&" | "||") Operand)*
//! Operand := "(" Expr ")" | Cond
//! Cond    := Ident Op Literal
//! Op      := ">" | ">=" | "<" | "<=" | "==" | "!=" | "~" | "!~"
//! Literal := Number | String | Age | Date
//! ```
//!
//! `&&` and `||` share one precedence level and group to the right, so
//! `a && b || c` is read as `a && (b || c)`. Rules that mix the two without
//! parentheses depend on this.
//!
//! Operator chains are read in a loop and folded from the right, so only
//! parentheses add recursion. The total number of conditions is capped,
//! which bounds the height of every tree the parser returns.

use super::lexer::Lexer;
use super::token::{Field, Token, TokenKind};
use crate::age::{convert_age_to_time, parse_date};
use crate::ast::nodes::{Comparator, CountBound, FieldRule, LogicalOp, ParseNode, ParsedRule, TextPattern};
use chrono::{DateTime, Utc};
use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Maximum parenthesis nesting accepted by default
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Maximum number of conditions in one rule accepted by default
pub const DEFAULT_MAX_CONDITIONS: usize = 1024;

/// Parse error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("No token matches the input at position {position}")]
    UnrecognizedToken { position: usize },

    #[error("Unbalanced '{paren}' at position {position}")]
    UnbalancedParen { paren: char, position: usize },

    #[error("Unexpected token: expected {expected}, got {found} '{value}' (col {position})")]
    UnexpectedToken {
        expected: String,
        found: TokenKind,
        value: String,
        position: usize,
    },

    #[error("{message}: '{value}' ({kind}, col {position})")]
    InvalidCondition {
        message: String,
        value: String,
        kind: TokenKind,
        position: usize,
    },

    #[error("Parentheses nested deeper than {max_depth} levels (col {position})")]
    NestingTooDeep { max_depth: usize, position: usize },

    #[error("Rule has more than {max_conditions} conditions (col {position})")]
    TooManyConditions {
        max_conditions: usize,
        position: usize,
    },
}

impl ParseError {
    /// Byte offset in the input the error refers to
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnrecognizedToken { position }
            | ParseError::UnbalancedParen { position, .. }
            | ParseError::UnexpectedToken { position, .. }
            | ParseError::InvalidCondition { position, .. }
            | ParseError::NestingTooDeep { position, .. }
            | ParseError::TooManyConditions { position, .. } => *position,
        }
    }

    fn unexpected(expected: impl Into<String>, token: &Token) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: token.kind,
            value: token.value.clone(),
            position: token.position,
        }
    }

    fn invalid(message: impl Into<String>, token: &Token) -> Self {
        ParseError::InvalidCondition {
            message: message.into(),
            value: token.value.clone(),
            kind: token.kind,
            position: token.position,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Options controlling how a rule is parsed
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Reference instant age literals are counted back from
    pub now: DateTime<Utc>,
    /// Maximum parenthesis nesting
    pub max_depth: usize,
    /// Maximum number of conditions
    pub max_conditions: usize,
}

impl ParseOptions {
    /// Count ages back from `now` instead of the current time
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_conditions(mut self, max_conditions: usize) -> Self {
        self.max_conditions = max_conditions;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            now: Utc::now(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_conditions: DEFAULT_MAX_CONDITIONS,
        }
    }
}

/// Parse a rule string with default options
pub fn parse(input: &str) -> ParseResult<ParsedRule> {
    Parser::new(input).parse()
}

/// Parse a rule string with explicit options
pub fn parse_with(input: &str, options: ParseOptions) -> ParseResult<ParsedRule> {
    Parser::with_options(input, options).parse()
}

/// Check that every parenthesis outside a string literal is matched
pub fn check_parens(input: &str) -> ParseResult<()> {
    let mut open = Vec::new();
    let mut in_string = false;

    for (position, ch) in input.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '(' if !in_string => open.push(position),
            ')' if !in_string => {
                if open.pop().is_none() {
                    return Err(ParseError::UnbalancedParen { paren: ')', position });
                }
            }
            _ => {}
        }
    }

    match open.pop() {
        Some(position) => Err(ParseError::UnbalancedParen { paren: '(', position }),
        None => Ok(()),
    }
}

/// LL(1) parser for rule strings
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    options: ParseOptions,
    num_nodes: usize,
    num_conditions: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser over `input`
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, ParseOptions::default())
    }

    pub fn with_options(input: &'a str, options: ParseOptions) -> Self {
        Self {
            lexer: Lexer::new(input),
            current: Token::eof(0),
            options,
            num_nodes: 0,
            num_conditions: 0,
        }
    }

    /// Point this parser at a new input
    pub fn reset(&mut self, input: &'a str) {
        self.lexer = Lexer::new(input);
        self.current = Token::eof(0);
        self.num_nodes = 0;
        self.num_conditions = 0;
    }

    /// Parse the complete input into a rule
    pub fn parse(&mut self) -> ParseResult<ParsedRule> {
        let input = self.lexer.input();
        check_parens(input)?;

        self.lexer.reset();
        self.num_nodes = 0;
        self.num_conditions = 0;
        self.current = self.lexer.next_token()?;

        let root = self.expr(0)?;

        if self.current.kind != TokenKind::Eof {
            return Err(ParseError::unexpected("end of input", &self.current));
        }

        debug!(
            rule = input,
            num_nodes = self.num_nodes,
            height = root.depth(),
            tokens = self.lexer.num_tokens(),
            "parsed rule"
        );

        Ok(ParsedRule::new(root, self.num_nodes, input))
    }

    /// Expr := Operand (("&&" | "||") Operand)*
    fn expr(&mut self, depth: usize) -> ParseResult<ParseNode> {
        let mut node = self.operand(depth)?;
        let mut pending = Vec::new();

        while let Some(op) = LogicalOp::from_token(self.current.kind) {
            self.advance()?;
            let next = self.operand(depth)?;
            pending.push((std::mem::replace(&mut node, next), op));
        }

        // a && b || c groups as a && (b || c)
        while let Some((left, op)) = pending.pop() {
            node = ParseNode::logical(op, left, node);
            self.num_nodes += 1;
        }

        Ok(node)
    }

    /// Operand := "(" Expr ")" | Cond
    fn operand(&mut self, depth: usize) -> ParseResult<ParseNode> {
        let node = if self.current.kind == TokenKind::LParen {
            if depth >= self.options.max_depth {
                return Err(ParseError::NestingTooDeep {
                    max_depth: self.options.max_depth,
                    position: self.current.position,
                });
            }

            self.expect(TokenKind::LParen)?;
            let inner = self.expr(depth + 1)?;
            self.expect(TokenKind::RParen)?;
            inner
        } else {
            self.cond()?
        };

        self.num_nodes += 1;
        Ok(node)
    }

    /// Cond := Ident Op Literal
    fn cond(&mut self) -> ParseResult<ParseNode> {
        if self.num_conditions >= self.options.max_conditions {
            return Err(ParseError::TooManyConditions {
                max_conditions: self.options.max_conditions,
                position: self.current.position,
            });
        }
        self.num_conditions += 1;

        let ident = self.expect(TokenKind::Ident)?;
        let op = self.operator()?;
        let literal = self.literal()?;

        let field = Field::from_ident(&ident.value)
            .ok_or_else(|| ParseError::invalid("Invalid identifier", &ident))?;

        if !field.operators().contains(&op.kind) {
            return Err(ParseError::invalid(
                format!("Invalid operator for \"{}\"", field),
                &op,
            ));
        }

        if literal.kind != field.literal() {
            return Err(ParseError::invalid(
                format!("Invalid literal for \"{}\"", field),
                &literal,
            ));
        }

        let rule = match field {
            Field::Age => {
                let instant = convert_age_to_time(&literal.value, self.options.now).map_err(|e| {
                    ParseError::invalid(format!("Invalid format for \"age\": {}", e), &literal)
                })?;

                // Older than the age means created before the instant
                match op.kind {
                    TokenKind::Gt | TokenKind::GtEq => FieldRule::new().before(instant),
                    _ => FieldRule::new().after(instant),
                }
            }
            Field::Created => {
                let instant = parse_date(&literal.value).map_err(|e| {
                    ParseError::invalid(format!("Invalid format for \"created\": {}", e), &literal)
                })?;

                match op.kind {
                    TokenKind::Lt | TokenKind::LtEq => FieldRule::new().before(instant),
                    _ => FieldRule::new().after(instant),
                }
            }
            Field::Text => {
                let pattern = strip_quotes(&literal.value);
                let regex = Regex::new(pattern).map_err(|e| {
                    ParseError::invalid(format!("Invalid pattern for \"text\": {}", e), &literal)
                })?;

                FieldRule::new().matching(TextPattern::new(regex, op.kind == TokenKind::NotMatches))
            }
            Field::Likes | Field::Retweets => {
                let threshold: u64 = literal.value.parse().map_err(|_| {
                    ParseError::invalid(format!("Invalid number for \"{}\"", field), &literal)
                })?;
                let comparator = Comparator::from_token(op.kind).ok_or_else(|| {
                    ParseError::invalid(format!("Invalid operator for \"{}\"", field), &op)
                })?;
                let bound = CountBound::new(comparator, threshold);

                if field == Field::Likes {
                    FieldRule::new().likes(bound)
                } else {
                    FieldRule::new().retweets(bound)
                }
            }
        };

        Ok(ParseNode::condition(field, op.kind, rule))
    }

    fn operator(&mut self) -> ParseResult<Token> {
        if self.current.kind.is_operator() {
            self.advance()
        } else {
            Err(ParseError::unexpected("comparison operator", &self.current))
        }
    }

    fn literal(&mut self) -> ParseResult<Token> {
        if self.current.kind.is_literal() {
            self.advance()
        } else {
            Err(ParseError::unexpected("literal", &self.current))
        }
    }

    // Helper methods

    /// Consume the current token and return it
    fn advance(&mut self) -> ParseResult<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn expect(&mut self, expected: TokenKind) -> ParseResult<Token> {
        if self.current.kind == expected {
            self.advance()
        } else {
            Err(ParseError::unexpected(expected.to_string(), &self.current))
        }
    }
}

fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
