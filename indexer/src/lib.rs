use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabdex_core::{load_documents, load_index, save_index, DocId, DuplicatePolicy, IndexStats, InvertedIndex};

/// Inputs for the end-to-end pipeline: corpus in, index out, one query.
#[derive(Debug, Clone)]
pub struct Config {
    pub corpus_path: PathBuf,
    pub index_output_path: PathBuf,
    pub query_terms: Vec<String>,
    pub pretty: bool,
    pub duplicates: DuplicatePolicy,
}

impl Config {
    pub fn new(corpus_path: impl Into<PathBuf>, index_output_path: impl Into<PathBuf>, query_terms: Vec<String>) -> Self {
        Self {
            corpus_path: corpus_path.into(),
            index_output_path: index_output_path.into(),
            query_terms,
            pretty: false,
            duplicates: DuplicatePolicy::default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub num_docs: usize,
    pub stats: IndexStats,
    pub query_terms: Vec<String>,
    pub doc_ids: Vec<DocId>,
}

/// Load a corpus, build its index and write it out.
pub fn build_index(corpus: &Path, output: &Path, pretty: bool, duplicates: DuplicatePolicy) -> Result<(usize, IndexStats)> {
    let docs = load_documents(corpus, duplicates)
        .with_context(|| format!("loading corpus {}", corpus.display()))?;
    let index = InvertedIndex::from_documents(&docs);
    let stats = index.stats();
    tracing::info!(num_docs = docs.len(), num_terms = stats.num_terms, "ingested documents");
    save_index(output, &index, pretty).with_context(|| format!("writing index {}", output.display()))?;
    Ok((docs.len(), stats))
}

/// Exact-term conjunctive query against a persisted index.
pub fn query_index(index_path: &Path, terms: &[String]) -> Result<Vec<DocId>> {
    let index = open_index(index_path)?;
    Ok(index.query(terms))
}

/// Free-text conjunctive query; the text is tokenized like documents are.
pub fn search_index(index_path: &Path, text: &str) -> Result<Vec<DocId>> {
    let index = open_index(index_path)?;
    Ok(index.search(text))
}

fn open_index(index_path: &Path) -> Result<InvertedIndex> {
    load_index(index_path).with_context(|| format!("reading index {}", index_path.display()))
}

/// Load, build, persist, reload and query, in that order.
pub fn run(config: &Config) -> Result<RunReport> {
    let (num_docs, stats) = build_index(&config.corpus_path, &config.index_output_path, config.pretty, config.duplicates)?;
    let reloaded = open_index(&config.index_output_path)?;
    let doc_ids = reloaded.query(config.query_terms.as_slice());
    tracing::info!(terms = ?config.query_terms, hits = doc_ids.len(), "query complete");
    Ok(RunReport { num_docs, stats, query_terms: config.query_terms.clone(), doc_ids })
}
