use thiserror::Error;

/// Failures of index building and collection assembly.
///
/// Every variant is an invalid-input condition: the core performs no I/O, so
/// the only way to fail is degenerate input that would otherwise turn into a
/// division by zero or an ambiguous mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("invalid input: document collection is empty")]
    EmptyCollection,
    #[error("invalid input: document {0} has no terms after tokenization")]
    EmptyDocument(String),
    #[error("invalid input: duplicate document id {0}")]
    DuplicateDocument(String),
}

pub type SearchResult<T> = Result<T, SearchError>;

/// Returned by the `FromStr` impls of the configuration enums.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}` (expected one of: {})", .expected.join(", "))]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static [&'static str],
}
