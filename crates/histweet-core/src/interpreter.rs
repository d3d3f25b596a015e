//! Tree-walking evaluation of parsed rules

use crate::ast::nodes::{LogicalOp, ParseNode, ParsedRule};
use crate::post::Post;

/// Evaluate a subtree against a post
///
/// Operator chains hang off the right spine, which is followed in a loop.
pub fn evaluate_node(mut node: &ParseNode, post: &Post) -> bool {
    loop {
        match node {
            ParseNode::Condition { rule, .. } => return rule.matches(post),

            ParseNode::Logical { op, left, right } => {
                match (op, evaluate_node(left, post)) {
                    (LogicalOp::And, false) => return false,
                    (LogicalOp::Or, true) => return true,
                    _ => node = &**right,
                }
            }
        }
    }
}

impl ParsedRule {
    /// Check whether `post` matches this rule
    pub fn evaluate(&self, post: &Post) -> bool {
        evaluate_node(&self.root, post)
    }
}
