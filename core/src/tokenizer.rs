use crate::config::StopwordMatch;
use lazy_static::lazy_static;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

/// A normalized index key: lowercased, stop-word filtered, stemmed.
pub type Term = String;

lazy_static! {
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &["the", "a", "is", "of", "and", "to", "in", "on", "for", "with", "as", "by"];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(word: &str) -> bool { STOPWORDS.contains(word) }

/// Tokenize with the reference stop-word behavior (case-sensitive, checked before lowercasing).
pub fn tokenize(text: &str) -> Vec<Term> {
    tokenize_with(text, StopwordMatch::Exact)
}

/// Split on whitespace, drop stop words, lowercase, and stem with the Snowball English stemmer.
///
/// Snowball English is Porter2, not the original Porter algorithm, and the
/// two produce different stems for some words: "generously" stems to
/// "generous" here where Porter gives "gener". Stems are only comparable with
/// other output of this function.
///
/// Duplicates and input order are preserved; term frequency depends on them.
pub fn tokenize_with(text: &str, matching: StopwordMatch) -> Vec<Term> {
    let mut terms = Vec::new();
    for word in text.split_whitespace() {
        if matching == StopwordMatch::Exact && is_stopword(word) { continue; }
        let lower = word.to_lowercase();
        if matching == StopwordMatch::CaseInsensitive && is_stopword(&lower) { continue; }
        terms.push(STEMMER.stem(&lower).into_owned());
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("running runs run");
        assert!(t.iter().all(|w| w == "run"));
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn capitalized_stopword_survives_exact_matching() {
        assert_eq!(tokenize("The dog barks"), vec!["the", "dog", "bark"]);
        assert_eq!(tokenize("the dog barks"), vec!["dog", "bark"]);
    }

    #[test]
    fn case_insensitive_matching_drops_capitalized_stopwords() {
        assert_eq!(tokenize_with("The dog barks", StopwordMatch::CaseInsensitive), vec!["dog", "bark"]);
        assert_eq!(tokenize_with("BY THE way", StopwordMatch::CaseInsensitive), vec!["way"]);
    }

    #[test]
    fn stems_follow_porter2() {
        assert_eq!(tokenize("generously"), vec!["generous"]);
        assert_eq!(tokenize("computer computers"), vec!["comput", "comput"]);
    }

    #[test]
    fn blank_and_stopword_only_text_yields_nothing() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t\n ").is_empty());
        assert!(tokenize("the a is of and").is_empty());
    }
}
