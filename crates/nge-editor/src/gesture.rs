//! Drag-delay gesture recognition.
//!
//! A press does not start a drag. It moves the gesture into `Delaying`,
//! which listens at document level for moves and the release. Once the
//! rounded distance from the press reaches the threshold the gesture is
//! promoted to `Dragging`: the document listeners are swapped for window
//! listeners that stay up until the release. A release while still
//! delaying is a plain click.
//!
//! ```text
//!          press                 travel >= threshold
//!   Idle ─────────▶ Delaying ─────────────────────────▶ Dragging
//!    ▲                 │ release (click)                   │ release
//!    └─────────────────┴───────────────────────────────────┘
//! ```

use crate::effects::Effect;
use crate::input::{Device, PointerInput};
use crate::listeners::{DomEvent, Listener, ListenerSet, ListenerTarget};
use nge_core::Point;
use nge_core::geometry::rounded_distance;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GesturePhase {
    Idle,
    Delaying { origin: Point, device: Device },
    Dragging { origin: Point, device: Device },
}

/// What a pointer event meant to the gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureStep {
    /// Not relevant in the current phase.
    Ignored,
    /// Still below the threshold.
    Pending,
    /// Promoted to a drag by this event. `press` is where the pointer went down.
    Started { press: Point },
    Moved,
    /// Released after a drag.
    Ended,
    /// Released before the threshold was reached.
    Clicked,
}

#[derive(Debug, Clone)]
pub struct DragGesture {
    threshold: f64,
    phase: GesturePhase,
    listeners: ListenerSet,
}

impl DragGesture {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            phase: GesturePhase::Idle,
            listeners: ListenerSet::new(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == GesturePhase::Idle
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, GesturePhase::Dragging { .. })
    }

    pub fn listeners(&self) -> &ListenerSet {
        &self.listeners
    }

    /// Enter `Delaying`. Returns `false` (and does nothing) unless idle.
    pub fn press(&mut self, input: &PointerInput, effects: &mut Vec<Effect>) -> bool {
        if !self.is_idle() {
            log::warn!("press ignored, gesture already {:?}", self.phase);
            return false;
        }
        if input.is_mouse() {
            effects.push(Effect::PreventDefault);
        }
        self.attach_pair(ListenerTarget::Document, input.device, effects);
        self.phase = GesturePhase::Delaying {
            origin: input.position,
            device: input.device,
        };
        log::trace!("gesture delaying at {:?}", input.position);
        true
    }

    pub fn motion(&mut self, input: &PointerInput, effects: &mut Vec<Effect>) -> GestureStep {
        match self.phase {
            GesturePhase::Idle => GestureStep::Ignored,
            GesturePhase::Delaying { origin, device } => {
                if input.is_mouse() {
                    effects.push(Effect::PreventDefault);
                }
                if rounded_distance(origin, input.position) < self.threshold {
                    return GestureStep::Pending;
                }
                self.detach_pair(ListenerTarget::Document, device, effects);
                self.attach_pair(ListenerTarget::Window, device, effects);
                self.phase = GesturePhase::Dragging { origin, device };
                log::debug!("drag started at {:?} (pressed {origin:?})", input.position);
                GestureStep::Started { press: origin }
            }
            GesturePhase::Dragging { .. } => GestureStep::Moved,
        }
    }

    pub fn release(&mut self, effects: &mut Vec<Effect>) -> GestureStep {
        match self.phase {
            GesturePhase::Idle => GestureStep::Ignored,
            GesturePhase::Delaying { device, .. } => {
                self.detach_pair(ListenerTarget::Document, device, effects);
                self.phase = GesturePhase::Idle;
                GestureStep::Clicked
            }
            GesturePhase::Dragging { device, .. } => {
                self.detach_pair(ListenerTarget::Window, device, effects);
                self.phase = GesturePhase::Idle;
                log::debug!("drag ended");
                GestureStep::Ended
            }
        }
    }

    /// Drop whatever phase is active and detach every listener.
    /// Used on unmount and when a promoted drag is refused.
    pub fn abandon(&mut self, effects: &mut Vec<Effect>) {
        if !self.is_idle() {
            log::debug!("gesture abandoned in {:?}", self.phase);
        }
        self.listeners.detach_all(effects);
        self.phase = GesturePhase::Idle;
    }

    fn attach_pair(&mut self, target: ListenerTarget, device: Device, effects: &mut Vec<Effect>) {
        self.listeners
            .attach(Listener::new(target, DomEvent::move_for(device)), effects);
        self.listeners
            .attach(Listener::new(target, DomEvent::release_for(device)), effects);
    }

    fn detach_pair(&mut self, target: ListenerTarget, device: Device, effects: &mut Vec<Effect>) {
        self.listeners
            .detach(Listener::new(target, DomEvent::move_for(device)), effects);
        self.listeners
            .detach(Listener::new(target, DomEvent::release_for(device)), effects);
    }
}
