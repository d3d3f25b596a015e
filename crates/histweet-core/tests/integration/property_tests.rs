//! Property-based tests for the rule grammar

use chrono::{DateTime, Duration, TimeZone, Utc};
use histweet_core::parser::Lexer;
use histweet_core::{parse, parse_with, ParseOptions, Post};
use proptest::prelude::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 6, 15, 12, 0, 0).unwrap()
}

fn count_op() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![">", ">=", "<", "<=", "==", "!="])
}

fn condition() -> impl Strategy<Value = String> {
    prop_oneof![
        (count_op(), 0u64..100).prop_map(|(op, n)| format!("likes {} {}", op, n)),
        (count_op(), 0u64..100).prop_map(|(op, n)| format!("retweets {} {}", op, n)),
        (prop::sample::select(vec![">", "<"]), 1u32..24)
            .prop_map(|(op, m)| format!("age {} {}m", op, m)),
        (prop::sample::select(vec!["~", "!~"]), "[a-z]{1,5}")
            .prop_map(|(op, word)| format!("text {} \"{}\"", op, word)),
    ]
}

fn rule() -> impl Strategy<Value = String> {
    condition().prop_recursive(4, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), prop::sample::select(vec!["&&", "||"]), inner.clone())
                .prop_map(|(l, op, r)| format!("{} {} {}", l, op, r)),
            inner.prop_map(|r| format!("({})", r)),
        ]
    })
}

fn post() -> impl Strategy<Value = Post> {
    (0u64..100, 0u64..100, 0i64..800, "[a-z ]{0,20}").prop_map(|(likes, retweets, days, text)| {
        Post::new(1, now() - Duration::days(days), text)
            .with_likes(likes)
            .with_retweets(retweets)
    })
}

proptest! {
    #[test]
    fn prop_generated_rules_parse(input in rule()) {
        let parsed = parse_with(&input, ParseOptions::at(now()));
        prop_assert!(parsed.is_ok(), "{}: {:?}", input, parsed.err());
    }

    #[test]
    fn prop_parenthesizing_preserves_meaning(input in rule(), post in post()) {
        let plain = parse_with(&input, ParseOptions::at(now())).unwrap();
        let wrapped = parse_with(&format!("({})", input), ParseOptions::at(now())).unwrap();
        prop_assert_eq!(plain.evaluate(&post), wrapped.evaluate(&post));
    }

    #[test]
    fn prop_or_is_negation_of_and_of_complements(n in 0u64..100, a in 0u64..100, b in 0u64..100) {
        let post = Post::new(1, now(), "").with_likes(n);
        let or = parse(&format!("likes < {} || likes > {}", a, b)).unwrap();
        let and = parse(&format!("likes >= {} && likes <= {}", a, b)).unwrap();
        prop_assert_eq!(or.evaluate(&post), !and.evaluate(&post));
    }

    #[test]
    fn prop_lexer_never_panics(input in "\\PC{0,40}") {
        let _ = Lexer::new(&input).tokenize();
        let _ = parse(&input);
    }

    #[test]
    fn prop_token_positions_increase(input in rule()) {
        let tokens = Lexer::new(&input).tokenize().unwrap();
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].end() <= pair[1].position);
        }
    }
}
