//! Editor options as recognized from the host's options object.

use serde::{Deserialize, Serialize};

/// Default pointer travel (px) before a press becomes a drag.
pub const DEFAULT_DRAG_DELAY: f64 = 6.0;

/// Stage behaviour switches. Every flag is independent of the others.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StageConfig {
    /// Drag-delay threshold in pixels.
    pub delay: f64,
    /// Only allow stage drags while the space bar is held.
    pub space_to_pan: bool,
    pub disable_comments: bool,
    pub disable_pan: bool,
    pub disable_zoom: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DRAG_DELAY,
            space_to_pan: false,
            disable_comments: false,
            disable_pan: false,
            disable_zoom: false,
        }
    }
}

impl StageConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
