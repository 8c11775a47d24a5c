//! Stage view state (zoom + pan) and the commands that mutate it.

use kurbo::Vec2;
use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 7.0;

/// Wheel deltas are clamped to `±WHEEL_DELTA_LIMIT` before being scaled.
pub const WHEEL_DELTA_LIMIT: f64 = 10.0;
/// Scale change per unit of (clamped) wheel delta.
pub const WHEEL_ZOOM_STEP: f64 = 0.005;

/// Zoom and pan of the stage. `scale` is always within
/// `[MIN_SCALE, MAX_SCALE]`; `translate` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawViewState")]
pub struct StageViewState {
    scale: f64,
    translate: Vec2,
}

#[derive(Deserialize)]
struct RawViewState {
    scale: f64,
    translate: Vec2,
}

impl From<RawViewState> for StageViewState {
    fn from(raw: RawViewState) -> Self {
        Self::new(raw.scale, raw.translate)
    }
}

impl Default for StageViewState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate: Vec2::ZERO,
        }
    }
}

impl StageViewState {
    pub fn new(scale: f64, translate: Vec2) -> Self {
        Self {
            scale: clamp_scale(scale),
            translate,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    /// Reduce a transform command into this state.
    pub fn apply(&mut self, command: &StageCommand) {
        match *command {
            StageCommand::SetScale { scale } => self.scale = clamp_scale(scale),
            StageCommand::SetTranslate { translate } => self.translate = translate,
        }
    }

    /// Scale resulting from a wheel event with the given `deltaY`.
    pub fn wheel_zoomed(&self, delta_y: f64) -> f64 {
        let delta = if delta_y.is_nan() { 0.0 } else { delta_y };
        let delta = delta.clamp(-WHEEL_DELTA_LIMIT, WHEEL_DELTA_LIMIT);
        clamp_scale(self.scale - delta * WHEEL_ZOOM_STEP)
    }
}

fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return 1.0;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Commands dispatched to the stage-transform store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageCommand {
    SetScale { scale: f64 },
    SetTranslate { translate: Vec2 },
}
