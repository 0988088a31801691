//! Persisted per-layout window geometry.
//!
//! The blob is a small versioned TOML document. It is only applied when
//! its version, skin name and layout count match the loaded skin.

use serde::{Deserialize, Serialize};

use veneer_types::error::{Result, SkinError};
use veneer_types::geometry::Rect;

use crate::model::Skin;

/// Format version written by [`GeometryBlob::to_toml`].
pub const GEOMETRY_VERSION: u32 = 1;

/// Window rectangle of one layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutGeometry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryBlob {
    pub version: u32,
    pub skin: String,
    pub layout_count: usize,
    /// Name of the layout that was active when saved.
    pub active: String,
    #[serde(default)]
    pub layouts: Vec<LayoutGeometry>,
}

impl GeometryBlob {
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

impl Skin {
    /// Snapshot every layout's last known rectangle.
    pub fn geometry_blob(&self, active: usize) -> GeometryBlob {
        GeometryBlob {
            version: GEOMETRY_VERSION,
            skin: self.name.clone(),
            layout_count: self.layouts.len(),
            active: self
                .layout(active)
                .map(|l| l.name.clone())
                .unwrap_or_default(),
            layouts: self
                .layouts
                .iter()
                .map(|l| LayoutGeometry {
                    name: l.name.clone(),
                    rect: l.window_rect,
                })
                .collect(),
        }
    }

    /// Validate a saved blob and copy its rectangles into matching
    /// layouts. Returns the index of the layout that was active.
    ///
    /// A mismatched blob is rejected as a whole with
    /// [`SkinError::Persistence`]; callers drop it and use default sizing.
    pub fn apply_geometry(&mut self, text: &str) -> Result<Option<usize>> {
        let blob = GeometryBlob::from_toml(text)
            .map_err(|e| SkinError::Persistence(format!("unreadable geometry: {e}")))?;
        if blob.version != GEOMETRY_VERSION {
            return Err(SkinError::Persistence(format!(
                "version {} (expected {GEOMETRY_VERSION})",
                blob.version
            )));
        }
        if blob.skin != self.name {
            return Err(SkinError::Persistence(format!(
                "saved for skin '{}', not '{}'",
                blob.skin, self.name
            )));
        }
        if blob.layout_count != self.layouts.len() {
            return Err(SkinError::Persistence(format!(
                "saved with {} layout(s), skin has {}",
                blob.layout_count,
                self.layouts.len()
            )));
        }
        for saved in &blob.layouts {
            match self.layout_index(&saved.name) {
                Some(i) => self.layouts[i].window_rect = saved.rect,
                None => log::debug!("saved geometry for unknown layout '{}'", saved.name),
            }
        }
        Ok(self.layout_index(&blob.active))
    }
}
