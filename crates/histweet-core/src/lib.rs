pub mod age;
pub mod archive;
pub mod ast;
pub mod engine;
pub mod interpreter;
pub mod parser;
pub mod post;

// Test utilities (available in tests and when used as a dependency with the testing feature)
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use archive::{load_archive, parse_archive, ArchiveError};
pub use ast::{FieldRule, ParseNode, ParsedRule};
pub use engine::{Decision, DecisionKind, RuleEngine};
pub use parser::{parse, parse_with, ParseError, ParseOptions};
pub use post::Post;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Archive error: {0}")]
    ArchiveError(#[from] ArchiveError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Parse `rule`, load the archive at `path` and return the ids of the posts
/// selected for deletion
pub fn select_from_archive(
    rule: &str,
    path: impl AsRef<std::path::Path>,
    invert: bool,
) -> Result<Vec<u64>> {
    let rule = parse(rule)?;
    let posts = load_archive(path)?;
    Ok(RuleEngine::new(rule).inverted(invert).matching_ids(&posts))
}
