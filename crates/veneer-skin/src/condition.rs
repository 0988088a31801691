//! Feature flags for conditional skin blocks.
//!
//! `<if cond="a,!b">` includes its content only when every listed flag
//! matches: `a` must be set and `b` must not be.

use std::collections::HashSet;

/// Set of active flags (platform, features), compared case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conditions {
    flags: HashSet<String>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, flag: &str) -> Self {
        self.set(flag);
        self
    }

    pub fn set(&mut self, flag: &str) {
        self.flags.insert(flag.trim().to_ascii_lowercase());
    }

    pub fn unset(&mut self, flag: &str) {
        self.flags.remove(&flag.trim().to_ascii_lowercase());
    }

    pub fn is_set(&self, flag: &str) -> bool {
        self.flags.contains(&flag.trim().to_ascii_lowercase())
    }

    /// Evaluate a comma-separated conjunction. Empty terms are ignored, so
    /// an empty expression is true.
    pub fn evaluate(&self, expr: &str) -> bool {
        expr.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .all(|term| match term.strip_prefix('!') {
                Some(negated) => !self.is_set(negated),
                None => self.is_set(term),
            })
    }
}

impl<'a> FromIterator<&'a str> for Conditions {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut c = Self::new();
        for flag in iter {
            c.set(flag);
        }
        c
    }
}
