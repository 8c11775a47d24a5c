//! Global listener bookkeeping.
//!
//! The engines never attach listeners themselves. Instead every component
//! owns a [`ListenerSet`] that records which host listeners it currently
//! needs and emits `AttachListener` / `DetachListener` effects on change.
//! A listener is attached at most once and detached only if held, so each
//! attach is paired with exactly one detach.

use crate::effects::Effect;
use crate::input::Device;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListenerTarget {
    Window,
    Document,
    /// The stage's own root element.
    Surface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomEvent {
    Resize,
    Wheel,
    MouseMove,
    MouseUp,
    TouchMove,
    TouchEnd,
    KeyUp,
}

impl DomEvent {
    pub fn move_for(device: Device) -> Self {
        match device {
            Device::Mouse => DomEvent::MouseMove,
            Device::Touch => DomEvent::TouchMove,
        }
    }

    pub fn release_for(device: Device) -> Self {
        match device {
            Device::Mouse => DomEvent::MouseUp,
            Device::Touch => DomEvent::TouchEnd,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Listener {
    pub target: ListenerTarget,
    pub event: DomEvent,
}

impl Listener {
    pub const fn new(target: ListenerTarget, event: DomEvent) -> Self {
        Self { target, event }
    }
}

/// The set of host listeners one component currently holds.
#[derive(Debug, Clone, Default)]
pub struct ListenerSet {
    active: SmallVec<[Listener; 4]>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `listener` unless already held. Returns whether an effect was emitted.
    pub fn attach(&mut self, listener: Listener, effects: &mut Vec<Effect>) -> bool {
        if self.active.contains(&listener) {
            log::warn!("listener {listener:?} already attached");
            return false;
        }
        self.active.push(listener);
        effects.push(Effect::AttachListener(listener));
        true
    }

    /// Detach `listener` if held. Returns whether an effect was emitted.
    pub fn detach(&mut self, listener: Listener, effects: &mut Vec<Effect>) -> bool {
        let Some(pos) = self.active.iter().position(|l| *l == listener) else {
            return false;
        };
        self.active.remove(pos);
        effects.push(Effect::DetachListener(listener));
        true
    }

    /// Detach everything, most recently attached first.
    pub fn detach_all(&mut self, effects: &mut Vec<Effect>) {
        while let Some(listener) = self.active.pop() {
            effects.push(Effect::DetachListener(listener));
        }
    }

    pub fn contains(&self, listener: Listener) -> bool {
        self.active.contains(&listener)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Listener> {
        self.active.iter()
    }
}
