//! Token definitions for the rule language

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// A token in a rule string with position information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The matched source text, trimmed
    pub value: String,
    /// Byte offset of the match in the original input
    pub position: usize,
    /// Length of the match in bytes
    pub length: usize,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, value: impl Into<String>, position: usize, length: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
            length,
        }
    }

    /// End-of-input token located at `position`
    pub fn eof(position: usize) -> Self {
        Self::new(TokenKind::Eof, "", position, 0)
    }

    /// Byte offset just past the end of this token
    pub fn end(&self) -> usize {
        self.position + self.length
    }
}

/// The kind of token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Ident,
    Number,
    String,
    Age,
    Date,

    // Grouping
    LParen, // (
    RParen, // )

    // Logical operators
    Or,  // ||
    And, // &&

    // Comparison operators
    Gt,         // >
    GtEq,       // >=
    Lt,         // <
    LtEq,       // <=
    Eq,         // ==
    Neq,        // !=
    Matches,    // ~
    NotMatches, // !~

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident => write!(f, "identifier"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::String => write!(f, "string"),
            TokenKind::Age => write!(f, "age"),
            TokenKind::Date => write!(f, "date"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Or => write!(f, "||"),
            TokenKind::And => write!(f, "&&"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::Eq => write!(f, "=="),
            TokenKind::Neq => write!(f, "!="),
            TokenKind::Matches => write!(f, "~"),
            TokenKind::NotMatches => write!(f, "!~"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

impl TokenKind {
    /// Check if this token is a comparison operator
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Gt
                | TokenKind::GtEq
                | TokenKind::Lt
                | TokenKind::LtEq
                | TokenKind::Eq
                | TokenKind::Neq
                | TokenKind::Matches
                | TokenKind::NotMatches
        )
    }

    /// Check if this token is a literal that may appear on the right of a condition
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Number | TokenKind::String | TokenKind::Age | TokenKind::Date
        )
    }

    /// Check if this token joins two expressions
    pub fn is_logical(&self) -> bool {
        matches!(self, TokenKind::And | TokenKind::Or)
    }
}

/// Source pattern for each token kind, in priority order.
///
/// When two patterns match the same length at the same offset the earlier
/// entry wins, so `Date` and `Age` sit ahead of `Number`.
pub const TOKEN_PATTERNS: &[(TokenKind, &str)] = &[
    (TokenKind::Date, r"[0-9]{2}-[A-Za-z]{3}-[0-9]{4}"),
    (TokenKind::Age, r"[0-9]+y(?:[0-9]+m)?(?:[0-9]+d)?|[0-9]+m(?:[0-9]+d)?|[0-9]+d"),
    (TokenKind::Number, r"[0-9]+"),
    (TokenKind::Ident, r"[A-Za-z_]+"),
    (TokenKind::String, r#""[^"]*""#),
    (TokenKind::LParen, r"\("),
    (TokenKind::RParen, r"\)"),
    (TokenKind::Or, r"\|\|"),
    (TokenKind::And, r"&&"),
    (TokenKind::GtEq, r">="),
    (TokenKind::Gt, r">"),
    (TokenKind::LtEq, r"<="),
    (TokenKind::Lt, r"<"),
    (TokenKind::Eq, r"=="),
    (TokenKind::Neq, r"!="),
    (TokenKind::NotMatches, r"!~"),
    (TokenKind::Matches, r"~"),
];

/// Compiled token table, anchored at the start of the remaining input
pub(crate) static TOKEN_TABLE: Lazy<Vec<(TokenKind, Regex)>> = Lazy::new(|| {
    TOKEN_PATTERNS
        .iter()
        .map(|(kind, pattern)| {
            let anchored = format!("^(?:{})", pattern);
            (*kind, Regex::new(&anchored).unwrap())
        })
        .collect()
});

/// A field a condition may test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Age,
    Created,
    Text,
    Likes,
    Retweets,
}

impl Field {
    /// Look up a field by its identifier in a rule string
    pub fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "age" => Some(Field::Age),
            "created" => Some(Field::Created),
            "text" => Some(Field::Text),
            "likes" => Some(Field::Likes),
            "retweets" => Some(Field::Retweets),
            _ => None,
        }
    }

    /// Identifier as written in a rule string
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::Created => "created",
            Field::Text => "text",
            Field::Likes => "likes",
            Field::Retweets => "retweets",
        }
    }

    /// Operators accepted for this field
    pub fn operators(&self) -> &'static [TokenKind] {
        const ORDERING: &[TokenKind] =
            &[TokenKind::Gt, TokenKind::GtEq, TokenKind::Lt, TokenKind::LtEq];
        const COUNTS: &[TokenKind] = &[
            TokenKind::Gt,
            TokenKind::GtEq,
            TokenKind::Lt,
            TokenKind::LtEq,
            TokenKind::Eq,
            TokenKind::Neq,
        ];

        match self {
            Field::Age | Field::Created => ORDERING,
            Field::Text => &[TokenKind::Matches, TokenKind::NotMatches],
            Field::Likes | Field::Retweets => COUNTS,
        }
    }

    /// Literal kind accepted for this field
    pub fn literal(&self) -> TokenKind {
        match self {
            Field::Age => TokenKind::Age,
            Field::Created => TokenKind::Date,
            Field::Text => TokenKind::String,
            Field::Likes | Field::Retweets => TokenKind::Number,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
