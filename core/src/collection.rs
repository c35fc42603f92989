use crate::error::{SearchError, SearchResult};
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// Bounds every document identifier satisfies.
pub trait DocKey: Eq + Hash + Clone + Display {}

impl<T: Eq + Hash + Clone + Display> DocKey for T {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<K> {
    pub id: K,
    pub text: String,
}

/// Documents keyed by unique id, in insertion order.
///
/// Insertion order has no effect on weights; it only breaks ranking ties.
#[derive(Debug, Clone)]
pub struct DocumentCollection<K: DocKey> {
    docs: Vec<Document<K>>,
    positions: HashMap<K, usize>,
}

impl<K: DocKey> Default for DocumentCollection<K> {
    fn default() -> Self {
        Self { docs: Vec::new(), positions: HashMap::new() }
    }
}

impl<K: DocKey> DocumentCollection<K> {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, id: K, text: impl Into<String>) -> SearchResult<()> {
        if self.positions.contains_key(&id) {
            return Err(SearchError::DuplicateDocument(id.to_string()));
        }
        self.positions.insert(id.clone(), self.docs.len());
        self.docs.push(Document { id, text: text.into() });
        Ok(())
    }

    /// Build from `(id, text)` pairs, failing on the first repeated id.
    pub fn try_from_pairs<I, T>(pairs: I) -> SearchResult<Self>
    where
        I: IntoIterator<Item = (K, T)>,
        T: Into<String>,
    {
        let mut docs = Self::new();
        for (id, text) in pairs {
            docs.insert(id, text)?;
        }
        Ok(docs)
    }

    pub fn get(&self, id: &K) -> Option<&Document<K>> {
        self.positions.get(id).map(|&pos| &self.docs[pos])
    }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn ids(&self) -> impl Iterator<Item = &K> + '_ { self.docs.iter().map(|d| &d.id) }
}

impl<'a, K: DocKey> IntoIterator for &'a DocumentCollection<K> {
    type Item = &'a Document<K>;
    type IntoIter = std::slice::Iter<'a, Document<K>>;

    fn into_iter(self) -> Self::IntoIter { self.docs.iter() }
}
