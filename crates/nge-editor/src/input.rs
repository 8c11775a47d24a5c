//! Input abstraction layer.
//!
//! Normalizes mouse, touch, wheel, and keyboard events into plain values
//! consumed by the stage and node engines. Touch events are reduced to
//! their first touch point by the host before they get here.

use nge_core::Point;
use serde::{Deserialize, Serialize};

/// Bitmask of held mouse buttons (DOM `MouseEvent.buttons`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MouseButtons(pub u16);

impl MouseButtons {
    pub const NONE: Self = Self(0);
    pub const PRIMARY: Self = Self(1);
    pub const SECONDARY: Self = Self(2);
    pub const MIDDLE: Self = Self(4);

    /// True when the middle button is the only one held.
    pub fn is_middle_only(self) -> bool {
        self == Self::MIDDLE
    }

    pub fn is_secondary_only(self) -> bool {
        self == Self::SECONDARY
    }
}

/// Where a pointer event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Device {
    Mouse,
    Touch,
}

/// Modifier key state at the time of the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };
}

/// A pointer press, move, or release in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub position: Point,
    pub device: Device,
    pub buttons: MouseButtons,
    pub modifiers: Modifiers,
}

impl PointerInput {
    pub fn mouse(x: f64, y: f64, buttons: MouseButtons) -> Self {
        Self {
            position: Point::new(x, y),
            device: Device::Mouse,
            buttons,
            modifiers: Modifiers::NONE,
        }
    }

    /// A touch event, located at its first touch point.
    pub fn touch(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            device: Device::Touch,
            buttons: MouseButtons::NONE,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn is_mouse(&self) -> bool {
        self.device == Device::Mouse
    }
}

/// What kind of element a wheel event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WheelTargetKind {
    /// A `<textarea>`.
    TextArea,
    /// A comment body.
    Comment,
    #[default]
    Other,
}

/// The element under a wheel event, with its scroll geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelTarget {
    pub kind: WheelTargetKind,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl WheelTarget {
    /// Text targets whose content overflows keep the wheel for themselves.
    pub fn keeps_wheel(&self) -> bool {
        matches!(self.kind, WheelTargetKind::TextArea | WheelTargetKind::Comment)
            && self.client_height < self.scroll_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelInput {
    pub delta_y: f64,
    pub target: WheelTarget,
}

impl WheelInput {
    pub fn over_canvas(delta_y: f64) -> Self {
        Self {
            delta_y,
            target: WheelTarget::default(),
        }
    }
}

/// Keys the stage reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Other,
}

impl Key {
    /// Resolve a DOM `KeyboardEvent.key` (or `code`) value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            " " | "Space" | "Spacebar" => Key::Space,
            _ => Key::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_only_excludes_chords() {
        assert!(MouseButtons::MIDDLE.is_middle_only());
        assert!(!MouseButtons(MouseButtons::MIDDLE.0 | MouseButtons::PRIMARY.0).is_middle_only());
        assert!(!MouseButtons::PRIMARY.is_middle_only());
    }

    #[test]
    fn overflowing_text_keeps_wheel() {
        let target = WheelTarget {
            kind: WheelTargetKind::TextArea,
            client_height: 40.0,
            scroll_height: 120.0,
        };
        assert!(target.keeps_wheel());

        let fits = WheelTarget {
            scroll_height: 40.0,
            ..target
        };
        assert!(!fits.keeps_wheel());

        let canvas = WheelTarget {
            kind: WheelTargetKind::Other,
            ..target
        };
        assert!(!canvas.keeps_wheel());
    }

    #[test]
    fn space_key_resolves_from_dom_names() {
        assert_eq!(Key::from_dom(" "), Key::Space);
        assert_eq!(Key::from_dom("Space"), Key::Space);
        assert_eq!(Key::from_dom("a"), Key::Other);
    }
}
