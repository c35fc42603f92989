//! Knobs for the points where the scoring model admits more than one reading.
//!
//! Every `Default` reproduces the reference behavior; the other variants are
//! explicit, opt-in deviations.

use crate::error::ParseOptionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How raw words are compared against the stop-word set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopwordMatch {
    /// Compare the word as written, before lowercasing. `The` is kept.
    #[default]
    Exact,
    /// Compare the lowercased word. `The` is dropped.
    CaseInsensitive,
}

/// What `df(t)` means in `idf(t) = ln(N / (1 + df(t)))`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdfMode {
    /// Sum of the raw occurrence counts of `t` over all documents.
    #[default]
    RawOccurrence,
    /// Number of documents containing `t` (classic document frequency).
    DocumentFrequency,
}

/// Handling of documents that tokenize to nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyDocumentPolicy {
    /// Fail the build with `SearchError::EmptyDocument`.
    #[default]
    Reject,
    /// Leave the document out of every posting. It still counts toward `N`
    /// and is still ranked (with score 0).
    Skip,
}

/// Whether a repeated query term adds its weight more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryTermMode {
    #[default]
    Distinct,
    Repeated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub stopwords: StopwordMatch,
    pub idf: IdfMode,
    pub empty_documents: EmptyDocumentPolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub query_terms: QueryTermMode,
}

macro_rules! option_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseOptionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(ParseOptionError {
                        kind: $kind,
                        value: s.to_string(),
                        expected: &[$($name),+],
                    }),
                }
            }
        }
    };
}

option_enum!(StopwordMatch, "stop-word matching", { Exact => "exact", CaseInsensitive => "case-insensitive" });
option_enum!(IdfMode, "idf mode", { RawOccurrence => "raw-occurrence", DocumentFrequency => "document-frequency" });
option_enum!(EmptyDocumentPolicy, "empty-document policy", { Reject => "reject", Skip => "skip" });
option_enum!(QueryTermMode, "query term mode", { Distinct => "distinct", Repeated => "repeated" });
