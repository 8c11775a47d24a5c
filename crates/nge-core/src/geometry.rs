//! Coordinate spaces and conversions.
//!
//! Three spaces are in play:
//!
//! - **screen**: client pixels as delivered by pointer events;
//! - **surface**: screen minus the stage's top-left corner;
//! - **canvas**: the untransformed graph space nodes live in. The stage
//!   renders canvas content centred on the surface, scaled by `scale` and
//!   shifted by `-translate` (screen pixels).

pub use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

use crate::view::StageViewState;

/// Cached screen-space bounding rectangle of the stage surface.
///
/// Owned by the stage, recomputed on mount and on viewport resize; nodes
/// only ever borrow it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceRect(Rect);

impl SurfaceRect {
    /// Build from a DOM-style client rect (`left`, `top`, `width`, `height`).
    pub fn from_client_rect(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self(Rect::from_origin_size((left, top), (width, height)))
    }

    pub fn new(rect: Rect) -> Self {
        Self(rect)
    }

    pub fn origin(&self) -> Point {
        self.0.origin()
    }

    pub fn size(&self) -> Size {
        self.0.size()
    }

    pub fn center(&self) -> Point {
        self.0.center()
    }

    pub fn rect(&self) -> Rect {
        self.0
    }

    /// Convert a screen point into surface-relative coordinates.
    pub fn to_surface(&self, screen: Point) -> Point {
        screen - self.origin().to_vec2()
    }
}

/// Map a screen point to canvas coordinates:
/// `(screen - origin - size/2) / scale + translate / scale`.
pub fn screen_to_canvas(screen: Point, surface: &SurfaceRect, view: &StageViewState) -> Point {
    let from_center = screen - surface.center();
    let scale = view.scale();
    let translate = view.translate();
    Point::new(
        from_center.x / scale + translate.x / scale,
        from_center.y / scale + translate.y / scale,
    )
}

/// Inverse of [`screen_to_canvas`].
pub fn canvas_to_screen(canvas: Point, surface: &SurfaceRect, view: &StageViewState) -> Point {
    let scale = view.scale();
    let translate = view.translate();
    let center = surface.center();
    Point::new(
        canvas.x * scale - translate.x + center.x,
        canvas.y * scale - translate.y + center.y,
    )
}

/// Pointer travel used by the drag-delay filter, rounded to whole pixels.
pub fn rounded_distance(a: Point, b: Point) -> f64 {
    a.distance(b).round()
}

/// Rubber-band rectangle in screen pixels. Width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl SelectionRect {
    /// Normalize a signed drag (origin + delta) so the top-left corner moves
    /// whenever the delta is negative.
    pub fn from_drag(origin: Point, delta: Vec2) -> Self {
        Self {
            x: origin.x.min(origin.x + delta.x),
            y: origin.y.min(origin.y + delta.y),
            w: delta.x.abs(),
            h: delta.y.abs(),
        }
    }

    pub fn to_rect(&self) -> Rect {
        Rect::from_origin_size((self.x, self.y), (self.w, self.h))
    }
}
