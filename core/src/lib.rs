//! In-memory TF-IDF search over a fixed document collection.
//!
//! Build a [`TermWeightIndex`] once per [`DocumentCollection`] snapshot with
//! [`build_index`], then rank the collection against free-text queries with
//! [`search`].

pub mod collection;
pub mod config;
pub mod error;
pub mod index;
pub mod load;
pub mod search;
pub mod tokenizer;

pub use collection::{DocKey, Document, DocumentCollection};
pub use config::{EmptyDocumentPolicy, IdfMode, IndexConfig, QueryTermMode, SearchConfig, StopwordMatch};
pub use error::{ParseOptionError, SearchError, SearchResult};
pub use index::{build_index, IndexBuilder, TermWeightIndex};
pub use load::load_documents;
pub use search::{search, search_scored, search_with};
pub use tokenizer::{tokenize, tokenize_with, Term};
