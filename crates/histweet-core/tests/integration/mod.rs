//! Integration tests for rule parsing, evaluation and archive selection

mod archive_tests;
mod property_tests;
mod rule_tests;
