//! Rule language parser
//!
//! This module implements lexing and parsing of tweet deletion rules.

pub mod lexer;
pub mod parse;
pub mod token;

pub use lexer::Lexer;
pub use parse::{
    check_parens, parse, parse_with, ParseError, ParseOptions, ParseResult, Parser,
    DEFAULT_MAX_CONDITIONS, DEFAULT_MAX_DEPTH,
};
pub use token::{Field, Token, TokenKind};
