//! Loader for tab-delimited corpora: one `<id>\t<text>` record per line.

use crate::error::{Error, FormatError, Result};
use crate::DocId;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// What to do when a document id shows up on more than one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The later line replaces the earlier one.
    #[default]
    Overwrite,
    /// Fail the whole load with [`FormatError::DuplicateId`].
    Reject,
}

/// Parse a single trimmed record. `line` is 1-based.
fn parse_line(line: usize, record: &str) -> Result<(DocId, String)> {
    let (id, text) = record
        .split_once('\t')
        .ok_or(FormatError::MissingDelimiter { line })?;
    let id = id.trim();
    let doc_id = id
        .parse::<DocId>()
        .map_err(|_| FormatError::InvalidId { line, value: id.to_string() })?;
    Ok((doc_id, text.to_string()))
}

pub fn parse_documents<R: BufRead>(reader: R, policy: DuplicatePolicy) -> Result<BTreeMap<DocId, String>> {
    let mut docs = BTreeMap::new();
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(Error::Stream)?;
        let (doc_id, text) = parse_line(line_no, line.trim())?;
        if docs.insert(doc_id, text).is_some() {
            match policy {
                DuplicatePolicy::Overwrite => {
                    tracing::warn!(line = line_no, doc_id, "duplicate document id, keeping later text");
                }
                DuplicatePolicy::Reject => {
                    return Err(FormatError::DuplicateId { line: line_no, id: doc_id }.into());
                }
            }
        }
    }
    Ok(docs)
}

pub fn load_documents<P: AsRef<Path>>(path: P, policy: DuplicatePolicy) -> Result<BTreeMap<DocId, String>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| Error::io(path, e))?;
    let docs = parse_documents(BufReader::new(f), policy).map_err(|e| match e {
        Error::Stream(source) => Error::io(path, source),
        other => other,
    })?;
    tracing::info!(path = %path.display(), num_docs = docs.len(), "loaded corpus");
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<BTreeMap<DocId, String>> {
        parse_documents(input.as_bytes(), DuplicatePolicy::Overwrite)
    }

    #[test]
    fn parses_records() {
        let docs = parse("1\tHello World\n2\tPython is great\n").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[&1], "Hello World");
        assert_eq!(docs[&2], "Python is great");
    }

    #[test]
    fn text_keeps_inner_tabs() {
        let docs = parse("5\tcol a\tcol b  \n").unwrap();
        assert_eq!(docs[&5], "col a\tcol b");
    }

    #[test]
    fn handles_crlf_and_unterminated_last_line() {
        let docs = parse("1\tone\r\n2\ttwo").unwrap();
        assert_eq!(docs.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(docs[&1], "one");
    }

    #[test]
    fn blank_line_is_a_format_error() {
        let err = parse("1\ta\n\n2\tb\n").unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::MissingDelimiter { line: 2 })));
        let err = parse("1\ta\n   \n").unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::MissingDelimiter { line: 2 })));
    }

    #[test]
    fn missing_tab_is_a_format_error() {
        let err = parse("1\tok\n2 no tab here\n").unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::MissingDelimiter { line: 2 })));
    }

    #[test]
    fn non_integer_id_is_a_format_error() {
        let err = parse("abc\ttext\n").unwrap_err();
        match err {
            Error::Format(FormatError::InvalidId { line, value }) => {
                assert_eq!(line, 1);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn negative_and_large_ids_parse() {
        let docs = parse("-4\tneg\n9000000000\tbig\n").unwrap();
        assert_eq!(docs[&-4], "neg");
        assert_eq!(docs[&9_000_000_000], "big");
    }

    #[test]
    fn duplicate_ids_overwrite_by_default() {
        let docs = parse("1\tfirst\n1\tsecond\n").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[&1], "second");
    }

    #[test]
    fn duplicate_ids_rejected_on_request() {
        let err = parse_documents("1\tfirst\n1\tsecond\n".as_bytes(), DuplicatePolicy::Reject).unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::DuplicateId { line: 2, id: 1 })));
    }
}
