//! Visitor pattern for traversing parse trees

use super::nodes::{FieldRule, LogicalOp, ParseNode};
use crate::parser::token::{Field, TokenKind};
use std::fmt::Write;

/// Visitor trait for parse tree traversal
pub trait Visitor: Sized {
    /// Visit any node
    fn visit_node(&mut self, node: &ParseNode, depth: usize) {
        walk_node(self, node, depth);
    }

    /// Visit a condition leaf
    fn visit_condition(&mut self, _field: Field, _op: TokenKind, _rule: &FieldRule, _depth: usize) {
        // Leaf node, no children
    }

    /// Visit a logical node before its children
    fn visit_logical(&mut self, _op: LogicalOp, _depth: usize) {}
}

/// Walk a node, left subtree first
pub fn walk_node<V: Visitor>(visitor: &mut V, node: &ParseNode, depth: usize) {
    match node {
        ParseNode::Condition { field, op, rule } => {
            visitor.visit_condition(*field, *op, rule, depth);
        }

        ParseNode::Logical { op, left, right } => {
            visitor.visit_logical(*op, depth);
            visitor.visit_node(left, depth + 1);
            visitor.visit_node(right, depth + 1);
        }
    }
}

/// Renders a depth-annotated dump of a tree, one node per line
#[derive(Default)]
pub struct TreePrinter {
    out: String,
}

impl TreePrinter {
    pub fn print(node: &ParseNode) -> String {
        let mut printer = Self::default();
        printer.visit_node(node, 0);
        printer.out
    }
}

impl Visitor for TreePrinter {
    fn visit_condition(&mut self, field: Field, op: TokenKind, rule: &FieldRule, depth: usize) {
        let _ = writeln!(
            self.out,
            "depth = {}, kind: condition, field: {}, op: {}, children: 0, rule: {}",
            depth, field, op, rule
        );
    }

    fn visit_logical(&mut self, op: LogicalOp, depth: usize) {
        let _ = writeln!(
            self.out,
            "depth = {}, kind: logical, op: {}, children: 2",
            depth, op
        );
    }
}

/// Collects the distinct fields a tree tests, in first-seen order
#[derive(Default)]
pub struct FieldCollector {
    pub fields: Vec<Field>,
}

impl Visitor for FieldCollector {
    fn visit_condition(&mut self, field: Field, _op: TokenKind, _rule: &FieldRule, _depth: usize) {
        if !self.fields.contains(&field) {
            self.fields.push(field);
        }
    }
}

/// Counts leaves and logical joins
#[derive(Default)]
pub struct NodeCounter {
    pub conditions: usize,
    pub logicals: usize,
}

impl Visitor for NodeCounter {
    fn visit_condition(&mut self, _field: Field, _op: TokenKind, _rule: &FieldRule, _depth: usize) {
        self.conditions += 1;
    }

    fn visit_logical(&mut self, _op: LogicalOp, _depth: usize) {
        self.logicals += 1;
    }
}
