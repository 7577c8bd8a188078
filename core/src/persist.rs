use crate::error::{Error, FormatError, Result};
use crate::InvertedIndex;
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Write `index` as a JSON object of token -> id list.
pub fn write_index<W: Write>(writer: W, index: &InvertedIndex, pretty: bool) -> Result<()> {
    let res = if pretty {
        serde_json::to_writer_pretty(writer, index)
    } else {
        serde_json::to_writer(writer, index)
    };
    res.map_err(|e| Error::Stream(e.into()))
}

/// Read an index previously produced by [`write_index`].
pub fn read_index<R: Read>(mut reader: R) -> Result<InvertedIndex> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).map_err(Error::Stream)?;
    parse_index(&buf)
}

fn parse_index(bytes: &[u8]) -> Result<InvertedIndex> {
    let index = serde_json::from_slice(bytes).map_err(FormatError::Index)?;
    Ok(index)
}

pub fn save_index<P: AsRef<Path>>(path: P, index: &InvertedIndex, pretty: bool) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    let f = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut w = BufWriter::new(f);
    let res = if pretty {
        serde_json::to_writer_pretty(&mut w, index)
    } else {
        serde_json::to_writer(&mut w, index)
    };
    res.map_err(|e| Error::io(path, e.into()))?;
    w.flush().map_err(|e| Error::io(path, e))?;
    tracing::info!(path = %path.display(), num_terms = index.len(), "saved index");
    Ok(())
}

pub fn load_index<P: AsRef<Path>>(path: P) -> Result<InvertedIndex> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut buf = Vec::new();
    BufReader::new(f).read_to_end(&mut buf).map_err(|e| Error::io(path, e))?;
    let index = parse_index(&buf)?;
    tracing::info!(path = %path.display(), num_terms = index.len(), "loaded index");
    Ok(index)
}

impl InvertedIndex {
    /// Compact JSON encoding of the index.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Stream(e.into()))
    }

    pub fn from_json(s: &str) -> Result<Self> {
        parse_index(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn json_shape_is_a_plain_object() {
        let idx = InvertedIndex::build(vec![(1, "Hello world"), (2, "World")]);
        assert_eq!(idx.to_json().unwrap(), r#"{"hello":[1],"world":[1,2]}"#);
    }

    #[test]
    fn list_order_survives_round_trip() {
        let mut m = BTreeMap::new();
        m.insert("b".to_string(), vec![9, 2, 5]);
        let idx = InvertedIndex::from_postings(m);
        let mut buf = Vec::new();
        write_index(&mut buf, &idx, true).unwrap();
        let back = read_index(buf.as_slice()).unwrap();
        assert_eq!(back.postings("b"), Some(&[9, 2, 5][..]));
    }

    #[test]
    fn rejects_wrong_shapes() {
        for bad in [
            r#"[1, 2, 3]"#,
            r#"{"a": 1}"#,
            r#"{"a": ["x"]}"#,
            r#"{"a": [1.5]}"#,
            r#"{"a": [1]"#,
            "",
        ] {
            let err = InvertedIndex::from_json(bad).unwrap_err();
            assert!(
                matches!(err, Error::Format(FormatError::Index(_))),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn to_json_output_parses_back() {
        let idx = InvertedIndex::build(vec![(3, "a b"), (1, "b c")]);
        let json = idx.to_json().unwrap();
        assert!(!json.is_empty());
        assert_eq!(InvertedIndex::from_json(&json).unwrap(), idx);
    }

    #[test]
    fn empty_object_is_an_empty_index() {
        assert!(InvertedIndex::from_json("{}").unwrap().is_empty());
    }
}
