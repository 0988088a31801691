//! Per-skin cache of decoded sprite sheets.

use std::collections::HashMap;
use std::rc::Rc;

use veneer_types::backend::ResourceLoader;
use veneer_types::error::{Diagnostic, DiagnosticKind};
use veneer_ui::sprite::SpriteSheet;

/// Sheets keyed by source path. A failed load is cached as `None` so it
/// is reported once and never retried within the same skin.
#[derive(Debug, Clone, Default)]
pub struct SpriteCache {
    sheets: HashMap<String, Option<Rc<SpriteSheet>>>,
}

impl SpriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Already loaded sheet for `path`.
    pub fn get(&self, path: &str) -> Option<Rc<SpriteSheet>> {
        self.sheets.get(path).cloned().flatten()
    }

    /// Return the sheet for `path`, decoding and slicing it on first use.
    ///
    /// Problems are appended to `diagnostics` as resource errors at
    /// `line`; per-cell slicing problems do not fail the sheet.
    pub fn load(
        &mut self,
        path: &str,
        line: usize,
        loader: &mut dyn ResourceLoader,
        max_cells: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Rc<SpriteSheet>> {
        if let Some(cached) = self.sheets.get(path) {
            return cached.as_ref().map(Rc::clone);
        }
        let sheet = match loader.load_bitmap(path) {
            Ok(bitmap) => match SpriteSheet::slice(bitmap, max_cells) {
                Ok(sheet) => {
                    for (index, reason) in &sheet.cell_errors {
                        diagnostics.push(Diagnostic::new(
                            DiagnosticKind::Resource,
                            line,
                            format!("'{path}' cell {index}: {reason}"),
                        ));
                    }
                    log::debug!(
                        "sliced '{path}' into {}x{} cells",
                        sheet.x_count,
                        sheet.y_count
                    );
                    Some(Rc::new(sheet))
                },
                Err(e) => {
                    log::warn!("cannot slice '{path}': {e}");
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::Resource,
                        line,
                        format!("'{path}': {e}"),
                    ));
                    None
                },
            },
            Err(e) => {
                log::warn!("cannot load '{path}': {e}");
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::Resource,
                    line,
                    format!("'{path}': {e}"),
                ));
                None
            },
        };
        self.sheets.insert(path.to_string(), sheet.as_ref().map(Rc::clone));
        sheet
    }

    /// Number of distinct paths requested, failed ones included.
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
