use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

lazy_static! {
    // ASCII word characters only; everything else is a delimiter.
    static ref RE: Regex = Regex::new(r"[A-Za-z0-9_]+").expect("valid regex");
}

/// Tokenize text into lower-cased runs of ASCII word characters.
///
/// Runs of any other character act as delimiters, so leading, trailing and
/// repeated delimiters never produce empty tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    RE.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

/// Distinct tokens of `text`, in lexical order.
pub fn unique_tokens(text: &str) -> BTreeSet<String> {
    tokenize(text).into_iter().collect()
}
