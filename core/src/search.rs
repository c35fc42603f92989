use crate::collection::{DocKey, DocumentCollection};
use crate::config::{QueryTermMode, SearchConfig};
use crate::index::TermWeightIndex;
use crate::tokenizer::{tokenize_with, Term};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Rank every document in `docs` against `query`, best first.
pub fn search<K: DocKey>(query: &str, docs: &DocumentCollection<K>, index: &TermWeightIndex<K>) -> Vec<K> {
    search_with(query, docs, index, &SearchConfig::default())
}

pub fn search_with<K: DocKey>(
    query: &str,
    docs: &DocumentCollection<K>,
    index: &TermWeightIndex<K>,
    config: &SearchConfig,
) -> Vec<K> {
    search_scored(query, docs, index, config).into_iter().map(|(id, _)| id).collect()
}

/// Like [`search_with`] but keeps the accumulated score next to each id.
///
/// The result holds every document of `docs` exactly once, sorted by
/// descending score. Equal scores keep collection order.
pub fn search_scored<K: DocKey>(
    query: &str,
    docs: &DocumentCollection<K>,
    index: &TermWeightIndex<K>,
    config: &SearchConfig,
) -> Vec<(K, f64)> {
    let terms = query_terms(query, index, config.query_terms);
    if terms.is_empty() {
        tracing::debug!(query, "query has no terms after filtering");
    }

    let mut scored: Vec<(K, f64)> = docs
        .ids()
        .map(|id| {
            let score = terms.iter().filter_map(|t| index.weight(t, id)).fold(0.0, |acc, w| acc + w);
            (id.clone(), score)
        })
        .collect();
    // sort_by is stable, so ties stay in collection order
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    tracing::debug!(query, num_terms = terms.len(), num_docs = scored.len(), "ranked documents");
    scored
}

fn query_terms<K: DocKey>(query: &str, index: &TermWeightIndex<K>, mode: QueryTermMode) -> Vec<Term> {
    let tokens = tokenize_with(query, index.stopwords());
    match mode {
        QueryTermMode::Repeated => tokens,
        QueryTermMode::Distinct => {
            let mut seen: HashSet<Term> = HashSet::new();
            tokens.into_iter().filter(|t| seen.insert(t.clone())).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build_index;

    #[test]
    fn distinct_mode_ignores_repeats() {
        let docs = DocumentCollection::try_from_pairs([(1, "rust code"), (2, "python"), (3, "java")]).unwrap();
        let index = build_index(&docs).unwrap();
        let once = search_scored("rust", &docs, &index, &SearchConfig::default());
        let twice = search_scored("rust rust", &docs, &index, &SearchConfig::default());
        assert_eq!(once, twice);
    }

    #[test]
    fn repeated_mode_amplifies() {
        let docs = DocumentCollection::try_from_pairs([(1, "rust code"), (2, "python"), (3, "java")]).unwrap();
        let index = build_index(&docs).unwrap();
        let cfg = SearchConfig { query_terms: QueryTermMode::Repeated };
        let once = search_scored("rust", &docs, &index, &cfg);
        let twice = search_scored("rust rust", &docs, &index, &cfg);
        assert_eq!(once[0].0, 1);
        assert!((twice[0].1 - 2.0 * once[0].1).abs() < 1e-12);
    }
}
