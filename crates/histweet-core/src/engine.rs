use crate::ast::ParsedRule;
use crate::post::Post;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Deletion decision for a single post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub kind: DecisionKind,
    pub post_id: u64,
}

impl Decision {
    pub fn from_bool(post_id: u64, delete: bool) -> Self {
        Self {
            kind: if delete { DecisionKind::Delete } else { DecisionKind::Keep },
            post_id,
        }
    }

    pub fn is_delete(&self) -> bool {
        self.kind == DecisionKind::Delete
    }
}

/// Decision kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    Delete,
    Keep,
}

/// Applies a parsed rule to batches of posts
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rule: ParsedRule,
    invert: bool,
}

impl RuleEngine {
    pub fn new(rule: ParsedRule) -> Self {
        Self { rule, invert: false }
    }

    /// Select posts that do not match the rule instead of those that do
    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Decide whether a single post should be deleted
    pub fn decide(&self, post: &Post) -> Decision {
        let matched = self.rule.evaluate(post);
        Decision::from_bool(post.id, matched != self.invert)
    }

    /// Posts selected for deletion, in input order
    pub fn select<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        let selected: Vec<&Post> = posts
            .iter()
            .filter(|post| self.decide(post).is_delete())
            .collect();

        debug!(
            rule = self.rule.source(),
            invert = self.invert,
            total = posts.len(),
            selected = selected.len(),
            "evaluated rule"
        );

        selected
    }

    /// Ids of posts selected for deletion
    pub fn matching_ids(&self, posts: &[Post]) -> Vec<u64> {
        let ids: Vec<u64> = self.select(posts).into_iter().map(|post| post.id).collect();
        info!("{} of {} posts match the rule", ids.len(), posts.len());
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use chrono::Utc;

    fn posts() -> Vec<Post> {
        (0..5)
            .map(|i| Post::new(i, Utc::now(), format!("post {}", i)).with_likes(i))
            .collect()
    }

    #[test]
    fn test_decision_from_bool() {
        assert_eq!(Decision::from_bool(3, true).kind, DecisionKind::Delete);
        assert_eq!(Decision::from_bool(3, false).kind, DecisionKind::Keep);
        assert_eq!(Decision::from_bool(3, false).post_id, 3);
    }

    #[test]
    fn test_select_matching_posts() {
        let engine = RuleEngine::new(parse("likes >= 3").unwrap());
        assert_eq!(engine.matching_ids(&posts()), vec![3, 4]);
    }

    #[test]
    fn test_inverted_selection() {
        let engine = RuleEngine::new(parse("likes >= 3").unwrap()).inverted(true);
        assert_eq!(engine.matching_ids(&posts()), vec![0, 1, 2]);
        assert!(!engine.decide(&posts()[4]).is_delete());
    }

    #[test]
    fn test_decision_serializes_lowercase() {
        let json = serde_json::to_string(&Decision::from_bool(9, true)).unwrap();
        assert_eq!(json, r#"{"kind":"delete","post_id":9}"#);
    }
}
