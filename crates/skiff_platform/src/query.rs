//! URL query string parsing
//!
//! Only the query portion of the URL is looked at: everything before the
//! first `?` and after the first `#` is ignored. Keys are case-sensitive,
//! keys and values are percent-decoded and the last occurrence of a key
//! wins.

use percent_encoding::percent_decode_str;
use rustc_hash::FxHashMap;

/// Parsed query parameters of a URL
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    data: FxHashMap<String, String>,
}

impl QueryParams {
    /// Create an empty parameter table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the query string of `url`
    pub fn from_url(url: &str) -> Self {
        let mut params = Self::new();
        params.parse_url(url);
        params
    }

    /// Replace the current table with the parameters found in `url`
    ///
    /// Reparsing the same URL always yields the same table.
    pub fn parse_url(&mut self, url: &str) {
        self.data.clear();

        let Some(start) = url.find('?') else {
            return;
        };
        let query = &url[start + 1..];
        let query = match query.find('#') {
            Some(end) => &query[..end],
            None => query,
        };

        for pair in query.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            if key.is_empty() {
                continue;
            }
            self.data.insert(decode(key), decode(value));
        }
    }

    /// Look up a parameter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Whether the parameter is present
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no parameters were parsed
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}
