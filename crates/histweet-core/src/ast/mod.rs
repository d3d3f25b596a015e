//! Parse tree for rule strings
//!
//! A parsed rule is a strict binary tree: condition leaves joined by
//! logical nodes.

pub mod nodes;
pub mod visitor;

pub use nodes::{
    Comparator, CountBound, FieldRule, LogicalOp, ParseNode, ParsedRule, TextPattern,
};
pub use visitor::{walk_node, FieldCollector, NodeCounter, TreePrinter, Visitor};
