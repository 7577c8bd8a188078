//! Token to document-set inverted index with conjunctive queries and JSON
//! persistence.

pub mod corpus;
pub mod error;
pub mod index;
pub mod persist;
pub mod tokenizer;

pub use corpus::{load_documents, parse_documents, DuplicatePolicy};
pub use error::{Error, FormatError, Result};
pub use index::{DocId, IndexStats, InvertedIndex};
pub use persist::{load_index, read_index, save_index, write_index};
