//! Listing available skins without loading them.

use std::path::{Path, PathBuf};

use crate::parser::read_skin_name;

/// File extension of skin documents.
pub const SKIN_EXTENSION: &str = "skin";

/// Scan `dir` for `*.skin` documents and read each declared name.
///
/// Returns `(name, path)` pairs sorted by name. Unreadable files and files
/// without a `<skin name=...>` root are left out. A missing directory
/// yields an empty list.
pub fn discover_skins(dir: &Path) -> Vec<(String, PathBuf)> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut skins: Vec<(String, PathBuf)> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|x| x.eq_ignore_ascii_case(SKIN_EXTENSION)))
        .filter_map(|path| {
            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("skipping {}: {e}", path.display());
                    return None;
                },
            };
            match read_skin_name(&text) {
                Some(name) => Some((name, path)),
                None => {
                    log::warn!("skipping {}: no <skin name=...> root", path.display());
                    None
                },
            }
        })
        .collect();
    skins.sort_by(|a, b| a.0.cmp(&b.0));
    skins
}
