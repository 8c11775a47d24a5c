//! The stage: the pannable, zoomable surface every node lives on.
//!
//! ## Gestures
//!
//! | Input                          | Result |
//! |--------------------------------|--------|
//! | wheel                          | `SET_SCALE` (only when the graph has nodes) |
//! | middle-drag / alt+drag         | pan preview per move, `SET_TRANSLATE` on release |
//! | drag                           | rubber-band selection rectangle |
//! | right-click                    | "Add Node" menu at the pointer |
//! | space (held, `space_to_pan`)   | grab cursor; stage drags allowed |
//!
//! The stage owns the view-state *snapshot* it renders with, but never
//! mutates it: transform changes go out as `StageCommand`s and come back via
//! [`Stage::set_view`].

use crate::effects::{Cursor, Effect};
use crate::gesture::{DragGesture, GestureStep};
use crate::input::{Key, PointerInput, WheelInput};
use crate::listeners::{DomEvent, Listener, ListenerSet, ListenerTarget};
use crate::menu::{MenuInvocation, MenuValue, menu_options};
use nge_core::geometry::screen_to_canvas;
use nge_core::{
    GraphCommand, NodeTypeRegistry, Point, SelectionRect, StageCommand, StageConfig,
    StageViewState, SurfaceRect, Vec2,
};
use std::rc::Rc;

const RESIZE_LISTENER: Listener = Listener::new(ListenerTarget::Window, DomEvent::Resize);
const WHEEL_LISTENER: Listener = Listener::new(ListenerTarget::Surface, DomEvent::Wheel);
const KEYUP_LISTENER: Listener = Listener::new(ListenerTarget::Document, DomEvent::KeyUp);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Pan,
    Select,
}

/// State of one confirmed stage drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Pointer position when the drag was confirmed.
    pub origin: Point,
    pub mode: DragMode,
    /// Pointer displacement from `origin` as of the latest move.
    pub delta: Vec2,
}

impl DragSession {
    /// Translate the stage would have if the pan were released now.
    fn panned(&self, translate: Vec2) -> Vec2 {
        translate - self.delta
    }
}

pub struct Stage {
    config: StageConfig,
    registry: Rc<NodeTypeRegistry>,
    view: StageViewState,
    entity_count: usize,
    surface: SurfaceRect,
    mounted: bool,
    focused: bool,
    space_held: bool,
    gesture: DragGesture,
    session: Option<DragSession>,
    selection: Option<SelectionRect>,
    menu: Option<MenuInvocation>,
    listeners: ListenerSet,
}

impl Stage {
    pub fn new(config: StageConfig, registry: Rc<NodeTypeRegistry>, view: StageViewState) -> Self {
        Self {
            gesture: DragGesture::new(config.delay),
            config,
            registry,
            view,
            entity_count: 0,
            surface: SurfaceRect::default(),
            mounted: false,
            focused: false,
            space_held: false,
            session: None,
            selection: None,
            menu: None,
            listeners: ListenerSet::new(),
        }
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Measure the surface and attach the long-lived listeners.
    pub fn mount(&mut self, surface: SurfaceRect) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.surface = surface;
        self.mounted = true;
        self.listeners.attach(RESIZE_LISTENER, &mut effects);
        if !self.config.disable_zoom {
            self.listeners.attach(WHEEL_LISTENER, &mut effects);
        }
        log::debug!("stage mounted at {:?}", surface.rect());
        effects
    }

    /// Tear down: end any gesture without committing and detach every listener.
    pub fn unmount(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.gesture.abandon(&mut effects);
        if self.selection.take().is_some() {
            effects.push(Effect::Selecting(false));
        }
        self.session = None;
        self.space_held = false;
        if self.menu.take().is_some() {
            effects.push(Effect::MenuClosed);
        }
        self.listeners.detach_all(&mut effects);
        self.mounted = false;
        log::debug!("stage unmounted");
        effects
    }

    /// Window resized: refresh the cached surface rect.
    pub fn resize(&mut self, surface: SurfaceRect) {
        log::trace!("surface rect {:?} -> {:?}", self.surface.rect(), surface.rect());
        self.surface = surface;
    }

    /// Apply new options, re-wiring the wheel listener if zoom was toggled.
    pub fn set_config(&mut self, config: StageConfig) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.mounted && config.disable_zoom != self.config.disable_zoom {
            if config.disable_zoom {
                self.listeners.detach(WHEEL_LISTENER, &mut effects);
            } else {
                self.listeners.attach(WHEEL_LISTENER, &mut effects);
            }
        }
        if !config.space_to_pan && self.config.space_to_pan && self.space_held {
            self.space_held = false;
            self.listeners.detach(KEYUP_LISTENER, &mut effects);
            effects.push(Effect::Cursor(Cursor::Default));
        }
        self.config = config;
        effects
    }

    pub fn set_view(&mut self, view: StageViewState) {
        self.view = view;
    }

    pub fn set_entity_count(&mut self, count: usize) {
        self.entity_count = count;
    }

    pub fn set_registry(&mut self, registry: Rc<NodeTypeRegistry>) {
        self.registry = registry;
    }

    /// Host reports whether the surface element holds focus.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn view(&self) -> StageViewState {
        self.view
    }

    pub fn surface(&self) -> &SurfaceRect {
        &self.surface
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn selection(&self) -> Option<SelectionRect> {
        self.selection
    }

    pub fn is_selecting(&self) -> bool {
        self.selection.is_some()
    }

    pub fn menu(&self) -> Option<&MenuInvocation> {
        self.menu.as_ref()
    }

    pub fn space_held(&self) -> bool {
        self.space_held
    }

    pub fn cursor(&self) -> Cursor {
        if self.config.space_to_pan && self.space_held {
            Cursor::Grab
        } else {
            Cursor::Default
        }
    }

    /// Translate to render with, including an in-progress pan.
    pub fn render_translate(&self) -> Vec2 {
        match self.session {
            Some(session) if session.mode == DragMode::Pan => session.panned(self.view.translate()),
            _ => self.view.translate(),
        }
    }

    /// Listeners currently held by the stage, including gesture listeners.
    pub fn active_listeners(&self) -> Vec<Listener> {
        self.listeners
            .iter()
            .chain(self.gesture.listeners().iter())
            .copied()
            .collect()
    }

    /// `disable_pan` turns off every stage drag, selection included.
    fn drags_enabled(&self) -> bool {
        !self.config.disable_pan && (!self.config.space_to_pan || self.space_held)
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    /// Pointer entered the surface. `focus_within` is whether focus already
    /// sits on the surface or one of its descendants.
    pub fn pointer_enter(&mut self, focus_within: bool) -> Vec<Effect> {
        if focus_within {
            Vec::new()
        } else {
            vec![Effect::Focus]
        }
    }

    pub fn pointer_down(&mut self, input: &PointerInput) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.mounted {
            log::warn!("press on unmounted stage ignored");
            return effects;
        }
        if !self.drags_enabled() || input.buttons.is_secondary_only() {
            return effects;
        }
        if self.gesture.is_idle() {
            self.gesture.set_threshold(self.config.delay);
        }
        if self.gesture.press(input, &mut effects) {
            effects.push(Effect::Focus);
        }
        effects
    }

    pub fn pointer_move(&mut self, input: &PointerInput) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.gesture.motion(input, &mut effects) {
            GestureStep::Started { .. } => self.begin_drag(input, &mut effects),
            GestureStep::Moved => self.continue_drag(input, &mut effects),
            _ => {}
        }
        effects
    }

    pub fn pointer_up(&mut self, input: &PointerInput) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.gesture.release(&mut effects) == GestureStep::Ended {
            self.end_drag(input, &mut effects);
        }
        effects
    }

    fn begin_drag(&mut self, input: &PointerInput, effects: &mut Vec<Effect>) {
        let mode = if input.buttons.is_middle_only() || input.modifiers.alt {
            DragMode::Pan
        } else {
            DragMode::Select
        };
        // Options may have changed while the press was delaying.
        if self.config.disable_pan {
            log::debug!("drag refused, panning disabled");
            self.gesture.abandon(effects);
            return;
        }

        let session = DragSession {
            origin: input.position,
            mode,
            delta: Vec2::ZERO,
        };
        self.session = Some(session);
        if mode == DragMode::Select {
            let rect = SelectionRect::from_drag(session.origin, Vec2::ZERO);
            self.selection = Some(rect);
            effects.push(Effect::Selecting(true));
            effects.push(Effect::SelectionRect(rect));
        }
        log::debug!("stage drag {mode:?} from {:?}", session.origin);
    }

    fn continue_drag(&mut self, input: &PointerInput, effects: &mut Vec<Effect>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.delta = input.position - session.origin;
        match session.mode {
            DragMode::Pan => {
                let translate = session.panned(self.view.translate());
                log::trace!("pan preview {translate:?}");
                effects.push(Effect::PanPreview { translate });
            }
            DragMode::Select => {
                let rect = SelectionRect::from_drag(session.origin, session.delta);
                self.selection = Some(rect);
                effects.push(Effect::SelectionRect(rect));
            }
        }
    }

    fn end_drag(&mut self, input: &PointerInput, effects: &mut Vec<Effect>) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        session.delta = input.position - session.origin;
        match session.mode {
            DragMode::Pan => {
                let translate = session.panned(self.view.translate());
                log::debug!("pan committed {translate:?}");
                effects.push(Effect::Stage(StageCommand::SetTranslate { translate }));
            }
            DragMode::Select => {
                self.selection = None;
                effects.push(Effect::Selecting(false));
            }
        }
    }

    // ─── Wheel ───────────────────────────────────────────────────────────

    pub fn wheel(&mut self, input: &WheelInput) -> Vec<Effect> {
        if self.config.disable_zoom || input.target.keeps_wheel() {
            return Vec::new();
        }
        let mut effects = vec![Effect::PreventDefault];
        if self.entity_count > 0 {
            let scale = self.view.wheel_zoomed(input.delta_y);
            effects.push(Effect::Stage(StageCommand::SetScale { scale }));
        }
        effects
    }

    // ─── Context menu ────────────────────────────────────────────────────

    /// Open the "Add Node" menu at a screen point, replacing any open menu.
    pub fn context_menu(&mut self, at: Point) -> Vec<Effect> {
        let options = menu_options(&self.registry, self.config.disable_comments);
        log::debug!("menu opened at {at:?} with {} options", options.len());
        self.menu = Some(MenuInvocation {
            coordinates: at,
            options,
        });
        vec![Effect::PreventDefault, Effect::MenuOpened { at }]
    }

    pub fn close_menu(&mut self) -> Vec<Effect> {
        match self.menu.take() {
            Some(_) => vec![Effect::MenuClosed],
            None => Vec::new(),
        }
    }

    /// Create the chosen entity at the menu's canvas position and close the menu.
    pub fn select_menu_option(&mut self, value: &MenuValue) -> Vec<Effect> {
        let Some(menu) = self.menu.take() else {
            log::warn!("menu option {value:?} selected with no menu open");
            return Vec::new();
        };
        if !menu.offers(value) {
            log::warn!("menu option {value:?} is not on the open menu");
            self.menu = Some(menu);
            return Vec::new();
        }
        let at = screen_to_canvas(menu.coordinates, &self.surface, &self.view);
        let command = match *value {
            MenuValue::Comment => GraphCommand::add_comment(at),
            MenuValue::Node(node_type) => GraphCommand::add_node(at, node_type),
        };
        log::debug!("menu dispatch {command:?}");
        vec![Effect::Graph(command), Effect::MenuClosed]
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    pub fn key_down(&mut self, key: Key) -> Vec<Effect> {
        let mut effects = Vec::new();
        if key != Key::Space || !self.config.space_to_pan || !self.focused {
            return effects;
        }
        effects.push(Effect::PreventDefault);
        effects.push(Effect::StopPropagation);
        if !self.space_held {
            self.space_held = true;
            self.listeners.attach(KEYUP_LISTENER, &mut effects);
            effects.push(Effect::Cursor(Cursor::Grab));
        }
        effects
    }

    /// Document-level key release; only meaningful while space is held.
    pub fn key_up(&mut self, key: Key) -> Vec<Effect> {
        let mut effects = Vec::new();
        if key != Key::Space || !self.space_held {
            return effects;
        }
        self.space_held = false;
        self.listeners.detach(KEYUP_LISTENER, &mut effects);
        effects.push(Effect::Cursor(Cursor::Default));
        effects
    }
}
