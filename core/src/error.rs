use crate::DocId;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Storage read/write failure, tagged with the path involved.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Read/write failure on a caller-supplied stream.
    #[error("i/o error: {0}")]
    Stream(#[source] std::io::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io { .. } | Error::Stream(_))
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }
}

/// Input that does not have the expected shape.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("line {line}: missing tab between document id and text")]
    MissingDelimiter { line: usize },
    #[error("line {line}: document id {value:?} is not an integer")]
    InvalidId { line: usize, value: String },
    #[error("line {line}: duplicate document id {id}")]
    DuplicateId { line: usize, id: DocId },
    #[error("serialized index is not a token to id-list mapping: {0}")]
    Index(#[source] serde_json::Error),
}
