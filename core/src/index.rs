use crate::collection::{DocKey, DocumentCollection};
use crate::config::{EmptyDocumentPolicy, IdfMode, IndexConfig, StopwordMatch};
use crate::error::{SearchError, SearchResult};
use crate::tokenizer::{tokenize_with, Term};
use serde::Serialize;
use std::collections::HashMap;

/// TF-IDF weights for one collection snapshot: term -> (doc id -> weight).
///
/// Read-only once built. Reflecting a changed collection means building a new
/// index and replacing the old one.
#[derive(Debug, Clone, Serialize)]
pub struct TermWeightIndex<K> {
    pub(crate) weights: HashMap<Term, HashMap<K, f64>>,
    pub(crate) idf: HashMap<Term, f64>,
    pub(crate) num_docs: usize,
    pub(crate) stopwords: StopwordMatch,
}

impl<K: DocKey> TermWeightIndex<K> {
    pub fn weight(&self, term: &str, id: &K) -> Option<f64> {
        self.weights.get(term).and_then(|postings| postings.get(id)).copied()
    }

    pub fn postings(&self, term: &str) -> Option<&HashMap<K, f64>> { self.weights.get(term) }

    pub fn idf(&self, term: &str) -> Option<f64> { self.idf.get(term).copied() }

    pub fn terms(&self) -> impl Iterator<Item = &Term> + '_ { self.weights.keys() }

    pub fn num_terms(&self) -> usize { self.weights.len() }

    /// `N`, the collection size the IDF values were computed against.
    pub fn num_docs(&self) -> usize { self.num_docs }

    /// Stop-word matching used at build time; queries must be tokenized the same way.
    pub fn stopwords(&self) -> StopwordMatch { self.stopwords }
}

/// Build an index with the reference configuration.
pub fn build_index<K: DocKey>(docs: &DocumentCollection<K>) -> SearchResult<TermWeightIndex<K>> {
    IndexBuilder::default().build(docs)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IndexBuilder {
    config: IndexConfig,
}

struct DocCounts<'a, K> {
    id: &'a K,
    counts: HashMap<Term, u32>,
    total: usize,
}

impl IndexBuilder {
    pub fn new(config: IndexConfig) -> Self { Self { config } }

    pub fn build<K: DocKey>(&self, docs: &DocumentCollection<K>) -> SearchResult<TermWeightIndex<K>> {
        if docs.is_empty() {
            return Err(SearchError::EmptyCollection);
        }

        // Per-document counts and corpus-wide frequency accumulators
        let mut per_doc: Vec<DocCounts<'_, K>> = Vec::with_capacity(docs.len());
        let mut occurrences: HashMap<Term, u64> = HashMap::new();
        let mut doc_freq: HashMap<Term, u64> = HashMap::new();
        let mut skipped = 0usize;

        for doc in docs {
            let tokens = tokenize_with(&doc.text, self.config.stopwords);
            if tokens.is_empty() {
                match self.config.empty_documents {
                    EmptyDocumentPolicy::Reject => return Err(SearchError::EmptyDocument(doc.id.to_string())),
                    EmptyDocumentPolicy::Skip => {
                        tracing::warn!(doc_id = %doc.id, "skipping document with no terms");
                        skipped += 1;
                        continue;
                    }
                }
            }
            let total = tokens.len();
            let mut counts: HashMap<Term, u32> = HashMap::new();
            for term in tokens {
                *counts.entry(term).or_insert(0) += 1;
            }
            for (term, count) in counts.iter() {
                *occurrences.entry(term.clone()).or_insert(0) += u64::from(*count);
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            per_doc.push(DocCounts { id: &doc.id, counts, total });
        }

        // One IDF per term over the whole collection
        let n = docs.len() as f64;
        let frequencies = match self.config.idf {
            IdfMode::RawOccurrence => occurrences,
            IdfMode::DocumentFrequency => doc_freq,
        };
        let idf: HashMap<Term, f64> = frequencies
            .into_iter()
            .map(|(term, df)| {
                let idf = (n / (1.0 + df as f64)).ln();
                (term, idf)
            })
            .collect();

        let mut weights: HashMap<Term, HashMap<K, f64>> = HashMap::with_capacity(idf.len());
        for doc in per_doc {
            let total = doc.total as f64;
            for (term, count) in doc.counts {
                let tf = f64::from(count) / total;
                let weight = tf * idf[&term];
                weights.entry(term).or_default().insert(doc.id.clone(), weight);
            }
        }

        tracing::info!(
            num_docs = docs.len(),
            num_terms = weights.len(),
            skipped,
            idf = %self.config.idf,
            "built term-weight index"
        );
        Ok(TermWeightIndex { weights, idf, num_docs: docs.len(), stopwords: self.config.stopwords })
    }
}
