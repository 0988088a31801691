//! Tag attributes as handed to item constructors.

use std::collections::HashMap;

use veneer_types::backend::Color;

use crate::palette::parse_hex_color;

/// A malformed attribute value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("attribute '{key}': {reason}")]
pub struct AttrError {
    pub key: String,
    pub reason: String,
}

impl AttrError {
    pub fn new(key: &str, reason: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Case-insensitive `key="value"` pairs of one tag, with its source line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    values: HashMap<String, String>,
    pub line: usize,
}

impl Attributes {
    pub fn new(line: usize) -> Self {
        Self {
            values: HashMap::new(),
            line,
        }
    }

    /// Insert a pair. Keys are lowercased; a repeated key keeps the last value.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_ascii_lowercase(), value.into());
    }

    /// Builder-style insert, handy in tests.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Decimal integer. Malformed values read as `None`.
    pub fn int(&self, key: &str) -> Option<i32> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    /// Non-negative decimal integer.
    pub fn index(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    /// Boolean flag: any non-zero integer, or `true`/`yes`.
    pub fn flag(&self, key: &str) -> bool {
        match self.get(key).map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes") => true,
            Some(v) => v.parse::<i64>().is_ok_and(|n| n != 0),
            None => false,
        }
    }

    pub fn color(&self, key: &str) -> Option<Color> {
        self.get(key).and_then(|v| parse_hex_color(v.trim()))
    }

    /// Comma-separated list of optional indices; empty entries are `None`.
    pub fn index_list(&self, key: &str) -> Vec<Option<usize>> {
        match self.get(key) {
            Some(v) => parse_index_list(v),
            None => Vec::new(),
        }
    }

    /// Like [`Self::int`], but a present malformed value is an error.
    pub fn try_int(&self, key: &str) -> Result<Option<i32>, AttrError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| AttrError::new(key, format!("'{v}' is not an integer"))),
        }
    }

    /// Iterate over `(key, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parse `"1,,3"` into `[Some(1), None, Some(3)]`.
pub fn parse_index_list(text: &str) -> Vec<Option<usize>> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(',').map(|s| s.trim().parse().ok()).collect()
}
