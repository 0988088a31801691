//! Engine tuning knobs.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Timing and limits shared by the parser, the widgets and the engine.
///
/// Every field has a default, so a TOML file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Delay before the first auto-repeat after a press.
    pub repeat_delay_ms: u32,
    /// Interval between subsequent auto-repeats.
    pub repeat_interval_ms: u32,
    /// Period of the box blink toggle.
    pub blink_interval_ms: u32,
    /// Maximum nesting of `<include>` tags.
    pub max_include_depth: usize,
    /// Maximum number of cells in one sprite sheet.
    pub max_sprite_cells: usize,
    /// Pointer travel before a box press turns into a drag.
    pub drag_threshold_px: i32,
    /// Suffix appended to truncated box text.
    pub ellipsis: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            repeat_delay_ms: 500,
            repeat_interval_ms: 50,
            blink_interval_ms: 500,
            max_include_depth: 8,
            max_sprite_cells: 1024,
            drag_threshold_px: 4,
            ellipsis: "...".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) TOML configuration.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
