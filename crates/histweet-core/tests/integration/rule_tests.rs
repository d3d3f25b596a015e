//! Rules parsed and evaluated through the public API

use chrono::{DateTime, Duration, TimeZone, Utc};
use histweet_core::parser::{Field, TokenKind};
use histweet_core::{parse, parse_with, ParseError, ParseNode, ParseOptions, Post, RuleEngine};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 3, 1, 9, 30, 0).unwrap()
}

fn rule(input: &str) -> histweet_core::ParsedRule {
    parse_with(input, ParseOptions::at(now())).unwrap()
}

fn timeline() -> Vec<Post> {
    vec![
        Post::new(1, now() - Duration::days(2), "fresh take").with_likes(40),
        Post::new(2, now() - Duration::days(45), "hello world").with_likes(2),
        Post::new(3, now() - Duration::days(400), "RT @someone: old news")
            .with_likes(15)
            .with_retweets(12),
        Post::new(4, now() - Duration::days(800), "@friend see you soon").with_likes(7),
        Post::new(5, Utc.with_ymd_and_hms(2020, 5, 9, 0, 0, 0).unwrap(), "hey! archived"),
    ]
}

#[test]
fn test_select_old_unpopular_posts() {
    let engine = RuleEngine::new(rule("age > 1m && likes < 10"));
    assert_eq!(engine.matching_ids(&timeline()), vec![2, 4, 5]);
}

#[test]
fn test_inverted_selection_is_complement() {
    let posts = timeline();
    let selected = RuleEngine::new(rule("retweets >= 10 || text ~ \"^@\"")).matching_ids(&posts);
    let kept = RuleEngine::new(rule("retweets >= 10 || text ~ \"^@\""))
        .inverted(true)
        .matching_ids(&posts);

    assert_eq!(selected, vec![3, 4]);
    assert_eq!(kept, vec![1, 2, 5]);
}

#[test]
fn test_created_and_text_conditions() {
    let posts = timeline();
    let engine = RuleEngine::new(rule(
        r#"((text !~ "hey!") && (likes == 7)) || created < 10-May-2020"#,
    ));
    assert_eq!(engine.matching_ids(&posts), vec![4, 5]);
}

#[test]
fn test_tree_shape() {
    let parsed = rule("likes == 1 && (retweets > 2 || age <= 3d)");
    assert_eq!(parsed.num_nodes(), 6);
    assert_eq!(parsed.fields(), vec![Field::Likes, Field::Retweets, Field::Age]);

    match parsed.root() {
        ParseNode::Logical { left, right, .. } => {
            assert!(matches!(
                **left,
                ParseNode::Condition { field: Field::Likes, op: TokenKind::Eq, .. }
            ));
            assert!(matches!(**right, ParseNode::Logical { .. }));
        }
        other => panic!("Expected logical root, got {:?}", other),
    }
}

#[test]
fn test_dump_lists_every_node() {
    let dump = rule(r#"text ~ "a" || likes > 1"#).to_string();
    let lines: Vec<&str> = dump.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("depth = 0, kind: logical, op: OR"));
    assert!(lines[1].starts_with("depth = 1, kind: condition, field: text"));
    assert!(lines[2].starts_with("depth = 1, kind: condition, field: likes"));
}

#[test]
fn test_parse_errors_report_positions() {
    assert_eq!(
        parse("likes > 3 && (age > 1y").unwrap_err(),
        ParseError::UnbalancedParen { paren: '(', position: 13 }
    );
    assert_eq!(parse("likes ~ 3").unwrap_err().position(), 6);
    assert_eq!(parse("likes > 3 retweets > 1").unwrap_err().position(), 10);
    assert!(matches!(
        parse("foo > 3").unwrap_err(),
        ParseError::InvalidCondition { .. }
    ));
    assert!(matches!(parse("").unwrap_err(), ParseError::UnexpectedToken { .. }));
}

#[test]
fn test_nesting_limit() {
    let deep = format!("{}likes > 1{}", "(".repeat(10), ")".repeat(10));
    assert!(parse_with(&deep, ParseOptions::default().with_max_depth(10)).is_ok());
    assert!(matches!(
        parse_with(&deep, ParseOptions::default().with_max_depth(9)).unwrap_err(),
        ParseError::NestingTooDeep { max_depth: 9, .. }
    ));
}

#[test]
fn test_long_chains_parse_or_fail_cleanly() {
    let post = Post::new(1, now(), "").with_likes(3);

    let chain = vec!["likes == 3"; 1000].join(" && ");
    assert!(rule(&chain).evaluate(&post));

    let chain = vec!["likes == 3"; 10_000].join(" || ");
    assert!(matches!(
        parse(&chain).unwrap_err(),
        ParseError::TooManyConditions { .. }
    ));
}

#[test]
fn test_rule_shared_across_threads() {
    let engine = std::sync::Arc::new(RuleEngine::new(rule("likes > 5")));
    let handles: Vec<_> = (0..4u64)
        .map(|i| {
            let engine = engine.clone();
            std::thread::spawn(move || {
                let post = Post::new(i, now(), "").with_likes(i * 3);
                engine.decide(&post).is_delete()
            })
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![false, false, true, true]);
}
