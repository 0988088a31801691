//! The fixed table of known targets.
//!
//! Built once by the embedding application and passed by reference to the
//! parser. Names not in the table stay as inert [`Target::Unknown`] data.

use std::collections::HashMap;

use veneer_ui::target::{KnownTarget, LayoutJump, Target};

/// Prefix of layout-switch targets: `target="layout:compact"`.
pub const LAYOUT_PREFIX: &str = "layout:";

#[derive(Debug, Clone)]
pub struct TargetTable {
    by_name: HashMap<&'static str, KnownTarget>,
}

impl Default for TargetTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetTable {
    pub fn new() -> Self {
        Self {
            by_name: KnownTarget::ALL.iter().map(|&k| (k.name(), k)).collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<KnownTarget> {
        self.by_name.get(name).copied()
    }

    /// Map a document target string. Layout jumps are left unresolved
    /// until every layout of the document is known.
    pub fn resolve(&self, text: &str) -> Target {
        let text = text.trim();
        let lower = text.to_ascii_lowercase();
        if let Some(name) = lower.strip_prefix(LAYOUT_PREFIX) {
            return Target::Layout(LayoutJump {
                name: name.trim().to_string(),
                layout: None,
            });
        }
        match self.lookup(&lower) {
            Some(known) => Target::Known(known),
            None => {
                log::debug!("unknown target '{text}' kept as inert data");
                Target::Unknown(text.to_string())
            },
        }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve() {
        let t = TargetTable::new();
        assert_eq!(t.len(), KnownTarget::ALL.len());
        assert_eq!(t.resolve("Play"), Target::Known(KnownTarget::Play));
        assert_eq!(t.resolve(" prev "), Target::Known(KnownTarget::Previous));
    }

    #[test]
    fn layout_jumps_are_pending() {
        let t = TargetTable::new();
        assert_eq!(
            t.resolve("layout:Compact"),
            Target::Layout(LayoutJump {
                name: "compact".into(),
                layout: None
            })
        );
    }

    #[test]
    fn unknown_names_are_inert() {
        let t = TargetTable::new();
        let target = t.resolve("visualizer_v2");
        assert!(target.is_inert());
        assert_eq!(target.to_string(), "visualizer_v2");
    }
}
