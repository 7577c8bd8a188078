use crate::tokenizer::{tokenize, unique_tokens};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

pub type DocId = i64;

/// Token to posting-list mapping.
///
/// Serializes as a bare JSON object, e.g. `{"hello":[1],"world":[1,2]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvertedIndex {
    postings: BTreeMap<String, Vec<DocId>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub num_terms: usize,
    pub num_postings: usize,
    pub num_docs: usize,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Wrap an existing mapping as-is. Posting-list order is kept as given.
    pub fn from_postings(postings: BTreeMap<String, Vec<DocId>>) -> Self {
        Self { postings }
    }

    /// Build an index from `(id, text)` pairs.
    ///
    /// A token repeated inside one document is recorded once for that
    /// document. Posting lists come out sorted ascending.
    pub fn build<I, S>(documents: I) -> Self
    where
        I: IntoIterator<Item = (DocId, S)>,
        S: AsRef<str>,
    {
        let mut sets: BTreeMap<String, BTreeSet<DocId>> = BTreeMap::new();
        let mut num_docs = 0usize;
        for (doc_id, text) in documents {
            num_docs += 1;
            for token in unique_tokens(text.as_ref()) {
                sets.entry(token).or_default().insert(doc_id);
            }
        }
        let postings: BTreeMap<String, Vec<DocId>> = sets
            .into_iter()
            .map(|(token, ids)| (token, ids.into_iter().collect()))
            .collect();
        tracing::debug!(num_docs, num_terms = postings.len(), "built inverted index");
        Self { postings }
    }

    pub fn from_documents(documents: &BTreeMap<DocId, String>) -> Self {
        Self::build(documents.iter().map(|(id, text)| (*id, text.as_str())))
    }

    /// Documents containing every one of `terms`, ascending and deduplicated.
    ///
    /// Terms are matched exactly. An empty query or any unknown term yields
    /// no documents.
    pub fn query<T: AsRef<str>>(&self, terms: &[T]) -> Vec<DocId> {
        if terms.is_empty() {
            return Vec::new();
        }
        let mut lists: Vec<&[DocId]> = Vec::with_capacity(terms.len());
        for term in terms {
            match self.postings.get(term.as_ref()) {
                Some(list) => lists.push(list),
                None => return Vec::new(),
            }
        }
        lists.sort_by_key(|l| l.len());

        let mut acc: BTreeSet<DocId> = lists[0].iter().copied().collect();
        for list in &lists[1..] {
            if acc.is_empty() {
                break;
            }
            let other: HashSet<DocId> = list.iter().copied().collect();
            acc.retain(|id| other.contains(id));
        }
        acc.into_iter().collect()
    }

    /// Tokenize `text` the same way documents are and run a conjunctive query.
    pub fn search(&self, text: &str) -> Vec<DocId> {
        let tokens = tokenize(text);
        self.query(tokens.as_slice())
    }

    pub fn postings(&self, term: &str) -> Option<&[DocId]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn contains_term(&self, term: &str) -> bool { self.postings.contains_key(term) }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }

    pub fn as_map(&self) -> &BTreeMap<String, Vec<DocId>> { &self.postings }

    pub fn into_map(self) -> BTreeMap<String, Vec<DocId>> { self.postings }

    pub fn stats(&self) -> IndexStats {
        let docs: HashSet<DocId> = self.postings.values().flatten().copied().collect();
        IndexStats {
            num_terms: self.postings.len(),
            num_postings: self.postings.values().map(Vec::len).sum(),
            num_docs: docs.len(),
        }
    }
}
