//! Parse tree node definitions

use super::visitor::{FieldCollector, TreePrinter, Visitor};
use crate::parser::token::{Field, TokenKind};
use crate::post::Post;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::fmt;

/// Relational comparator used by count conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    Gt,
    GtEq,
    Lt,
    LtEq,
    Eq,
    Neq,
}

impl Comparator {
    /// Map a comparison token onto a comparator
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Gt => Some(Comparator::Gt),
            TokenKind::GtEq => Some(Comparator::GtEq),
            TokenKind::Lt => Some(Comparator::Lt),
            TokenKind::LtEq => Some(Comparator::LtEq),
            TokenKind::Eq => Some(Comparator::Eq),
            TokenKind::Neq => Some(Comparator::Neq),
            _ => None,
        }
    }

    /// Compare `lhs` against `rhs`
    pub fn apply(&self, lhs: u64, rhs: u64) -> bool {
        match self {
            Comparator::Gt => lhs > rhs,
            Comparator::GtEq => lhs >= rhs,
            Comparator::Lt => lhs < rhs,
            Comparator::LtEq => lhs <= rhs,
            Comparator::Eq => lhs == rhs,
            Comparator::Neq => lhs != rhs,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Comparator::Gt => ">",
            Comparator::GtEq => ">=",
            Comparator::Lt => "<",
            Comparator::LtEq => "<=",
            Comparator::Eq => "==",
            Comparator::Neq => "!=",
        };
        f.write_str(s)
    }
}

/// Logical operator joining two nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::And => Some(LogicalOp::And),
            TokenKind::Or => Some(LogicalOp::Or),
            _ => None,
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOp::And => write!(f, "AND"),
            LogicalOp::Or => write!(f, "OR"),
        }
    }
}

/// A count threshold, e.g. `likes >= 10`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountBound {
    pub comparator: Comparator,
    pub threshold: u64,
}

impl CountBound {
    pub fn new(comparator: Comparator, threshold: u64) -> Self {
        Self { comparator, threshold }
    }

    /// Check whether `count` satisfies this bound
    pub fn matches(&self, count: u64) -> bool {
        self.comparator.apply(count, self.threshold)
    }
}

/// A compiled text pattern; `inverted` is set by the `!~` operator
#[derive(Debug, Clone)]
pub struct TextPattern {
    pub regex: Regex,
    pub inverted: bool,
}

impl TextPattern {
    pub fn new(regex: Regex, inverted: bool) -> Self {
        Self { regex, inverted }
    }

    /// Unanchored search in `text`
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text) != self.inverted
    }
}

impl PartialEq for TextPattern {
    fn eq(&self, other: &Self) -> bool {
        self.inverted == other.inverted && self.regex.as_str() == other.regex.as_str()
    }
}

/// The typed condition extracted from one `ident op literal` triple.
///
/// Unset fields do not constrain a match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRule {
    /// Post must be created strictly before this instant
    pub before: Option<DateTime<Utc>>,
    /// Post must be created strictly after this instant
    pub after: Option<DateTime<Utc>>,
    pub match_pattern: Option<TextPattern>,
    /// Plain substring the text must contain
    pub contains_text: Option<String>,
    pub likes: Option<CountBound>,
    pub retweets: Option<CountBound>,
}

impl FieldRule {
    /// Create an empty rule that matches every post
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before(mut self, instant: DateTime<Utc>) -> Self {
        self.before = Some(instant);
        self
    }

    pub fn after(mut self, instant: DateTime<Utc>) -> Self {
        self.after = Some(instant);
        self
    }

    pub fn matching(mut self, pattern: TextPattern) -> Self {
        self.match_pattern = Some(pattern);
        self
    }

    pub fn containing(mut self, text: impl Into<String>) -> Self {
        self.contains_text = Some(text.into());
        self
    }

    pub fn likes(mut self, bound: CountBound) -> Self {
        self.likes = Some(bound);
        self
    }

    pub fn retweets(mut self, bound: CountBound) -> Self {
        self.retweets = Some(bound);
        self
    }

    /// Check whether no field is populated
    pub fn is_empty(&self) -> bool {
        self.before.is_none()
            && self.after.is_none()
            && self.match_pattern.is_none()
            && self.contains_text.is_none()
            && self.likes.is_none()
            && self.retweets.is_none()
    }

    /// Check every populated field against `post`
    pub fn matches(&self, post: &Post) -> bool {
        self.before.map_or(true, |t| post.created_at < t)
            && self.after.map_or(true, |t| post.created_at > t)
            && self
                .match_pattern
                .as_ref()
                .map_or(true, |p| p.matches(&post.text))
            && self
                .contains_text
                .as_deref()
                .map_or(true, |s| post.text.contains(s))
            && self.likes.map_or(true, |b| b.matches(post.num_likes))
            && self.retweets.map_or(true, |b| b.matches(post.num_retweets))
    }
}

impl fmt::Display for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if let Some(t) = self.before {
            parts.push(format!("created < {}", t.to_rfc3339()));
        }
        if let Some(t) = self.after {
            parts.push(format!("created > {}", t.to_rfc3339()));
        }
        if let Some(p) = &self.match_pattern {
            let op = if p.inverted { "!~" } else { "~" };
            parts.push(format!("text {} /{}/", op, p.regex.as_str()));
        }
        if let Some(s) = &self.contains_text {
            parts.push(format!("text contains {:?}", s));
        }
        if let Some(b) = self.likes {
            parts.push(format!("likes {} {}", b.comparator, b.threshold));
        }
        if let Some(b) = self.retweets {
            parts.push(format!("retweets {} {}", b.comparator, b.threshold));
        }

        if parts.is_empty() {
            write!(f, "(any)")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// A node in the parse tree
#[derive(Debug, Clone, PartialEq)]
pub enum ParseNode {
    /// Leaf holding one resolved condition
    Condition {
        field: Field,
        op: TokenKind,
        rule: FieldRule,
    },

    /// Two subtrees joined by `&&` or `||`
    Logical {
        op: LogicalOp,
        left: Box<ParseNode>,
        right: Box<ParseNode>,
    },
}

impl ParseNode {
    /// Create a condition leaf
    pub fn condition(field: Field, op: TokenKind, rule: FieldRule) -> Self {
        Self::Condition { field, op, rule }
    }

    /// Create a logical node
    pub fn logical(op: LogicalOp, left: ParseNode, right: ParseNode) -> Self {
        Self::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Height of the subtree rooted here
    pub fn depth(&self) -> usize {
        match self {
            ParseNode::Condition { .. } => 1,
            ParseNode::Logical { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// A successfully parsed rule, ready to evaluate against any number of posts
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRule {
    pub(crate) root: ParseNode,
    pub(crate) num_nodes: usize,
    pub(crate) source: String,
}

impl ParsedRule {
    pub fn new(root: ParseNode, num_nodes: usize, source: impl Into<String>) -> Self {
        Self {
            root,
            num_nodes,
            source: source.into(),
        }
    }

    pub fn root(&self) -> &ParseNode {
        &self.root
    }

    /// Parser bookkeeping: one per expression operand plus one per logical join
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// The rule string this tree was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Distinct fields tested anywhere in the rule
    pub fn fields(&self) -> Vec<Field> {
        let mut collector = FieldCollector::default();
        collector.visit_node(&self.root, 0);
        collector.fields
    }
}

impl fmt::Display for ParsedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TreePrinter::print(&self.root))
    }
}
