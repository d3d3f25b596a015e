//! Lexer for the rule language
//!
//! The lexer walks a rule string left to right. At each position every entry
//! of the token table is tried and the longest match wins.

use super::parse::{ParseError, ParseResult};
use super::token::{Token, TokenKind, TOKEN_TABLE};

/// Lexer for tokenizing rule strings
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    num_tokens: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over `input`
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            num_tokens: 0,
        }
    }

    /// Return the next token without consuming it
    pub fn peek(&self) -> ParseResult<Token> {
        let start = self.skip_whitespace();

        if start >= self.input.len() {
            return Ok(Token::eof(self.input.len()));
        }

        let rest = &self.input[start..];
        let mut best: Option<(TokenKind, usize)> = None;

        for (kind, regex) in TOKEN_TABLE.iter() {
            let Some(m) = regex.find(rest) else {
                continue;
            };

            // Zero-length matches never make progress
            if m.end() == 0 {
                continue;
            }

            match best {
                Some((_, len)) if len >= m.end() => {}
                _ => best = Some((*kind, m.end())),
            }
        }

        let (kind, length) = best.ok_or(ParseError::UnrecognizedToken { position: start })?;
        let value = rest[..length].trim();

        Ok(Token::new(kind, value, start, length))
    }

    /// Return the next token and advance past it
    pub fn next_token(&mut self) -> ParseResult<Token> {
        let token = self.peek()?;

        if token.kind != TokenKind::Eof {
            self.position = token.end();
            self.num_tokens += 1;
        }

        Ok(token)
    }

    /// Rewind to the start of the input
    pub fn reset(&mut self) {
        self.position = 0;
        self.num_tokens = 0;
    }

    /// Tokenize all input, ending with an `Eof` token
    pub fn tokenize(&mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    /// Number of tokens consumed so far
    pub fn num_tokens(&self) -> usize {
        self.num_tokens
    }

    /// The input being lexed
    pub fn input(&self) -> &'a str {
        self.input
    }

    fn skip_whitespace(&self) -> usize {
        let rest = &self.input[self.position..];
        let trimmed = rest.trim_start();
        self.position + (rest.len() - trimmed.len())
    }
}
