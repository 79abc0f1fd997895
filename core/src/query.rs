//! Query-string serialization with nested bracket keys.
//!
//! `["where", "uid", "id"] = "u1"` encodes as `where%5Buid%5D%5Bid%5D=u1`.
//! Keys and values are percent-encoded; unreserved characters pass through.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Default, Clone)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under a nested key path. The first segment is the
    /// root, the rest are wrapped in brackets.
    pub fn push(mut self, path: &[&str], value: &str) -> Self {
        let mut key = String::new();
        for (i, segment) in path.iter().enumerate() {
            if i == 0 {
                key.push_str(segment);
            } else {
                key.push('[');
                key.push_str(segment);
                key.push(']');
            }
        }
        self.pairs.push((key, value.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(key, COMPONENT),
                    utf8_percent_encode(value, COMPONENT)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}
