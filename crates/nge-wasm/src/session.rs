//! JS-agnostic editor session behind the WASM bindings.
//!
//! Owns the stage, the live nodes, and the registry, and speaks JSON: every
//! handler returns `{"ok":true,"effects":[...]}` or `{"ok":false,"error":"..."}`.

use nge_core::{
    NodeId, NodeTypeId, NodeTypeRegistry, Point, Rect, StageConfig, StageViewState, SurfaceRect,
    Vec2,
};
use nge_editor::input::WheelTargetKind;
use nge_editor::menu::MenuValue;
use nge_editor::{
    Effect, Key, Modifiers, MouseButtons, Node, NodeProps, PointerInput, Stage, WheelInput,
    WheelTarget,
};
use serde_json::json;
use std::collections::HashMap;
use std::rc::Rc;

/// Raw pointer fields as read off a DOM mouse or touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointer {
    pub x: f64,
    pub y: f64,
    pub buttons: u16,
    pub alt: bool,
    pub touch: bool,
}

impl RawPointer {
    fn to_input(self) -> PointerInput {
        let input = if self.touch {
            PointerInput::touch(self.x, self.y)
        } else {
            PointerInput::mouse(self.x, self.y, MouseButtons(self.buttons))
        };
        input.with_modifiers(Modifiers {
            alt: self.alt,
            ..Modifiers::NONE
        })
    }
}

pub struct EditorSession {
    registry: Rc<NodeTypeRegistry>,
    stage: Stage,
    nodes: HashMap<NodeId, Node>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    pub fn new() -> Self {
        let registry = Rc::new(NodeTypeRegistry::new());
        let stage = Stage::new(
            StageConfig::default(),
            Rc::clone(&registry),
            StageViewState::default(),
        );
        Self {
            registry,
            stage,
            nodes: HashMap::new(),
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(&NodeId::intern(id))
    }

    // ─── Setup ───────────────────────────────────────────────────────────

    pub fn set_registry(&mut self, json: &str) -> String {
        match NodeTypeRegistry::from_json(json) {
            Ok(registry) => {
                self.registry = Rc::new(registry);
                self.stage.set_registry(Rc::clone(&self.registry));
                ok_effects(&[])
            }
            Err(e) => error(&format!("Invalid registry: {e}")),
        }
    }

    pub fn set_config(&mut self, json: &str) -> String {
        match StageConfig::from_json(json) {
            Ok(config) => {
                for node in self.nodes.values_mut() {
                    node.set_delay(config.delay);
                }
                ok_effects(&self.stage.set_config(config))
            }
            Err(e) => error(&format!("Invalid options: {e}")),
        }
    }

    pub fn set_view(&mut self, scale: f64, x: f64, y: f64) {
        self.stage
            .set_view(StageViewState::new(scale, Vec2::new(x, y)));
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.stage.set_focused(focused);
    }

    // ─── Stage lifecycle ─────────────────────────────────────────────────

    pub fn mount(&mut self, left: f64, top: f64, width: f64, height: f64) -> String {
        let surface = SurfaceRect::from_client_rect(left, top, width, height);
        ok_effects(&self.stage.mount(surface))
    }

    pub fn resize(&mut self, left: f64, top: f64, width: f64, height: f64) {
        self.stage
            .resize(SurfaceRect::from_client_rect(left, top, width, height));
    }

    /// Unmount the stage and every node.
    pub fn unmount(&mut self) -> String {
        let mut effects = self.stage.unmount();
        for node in self.nodes.values_mut() {
            effects.extend(node.unmount());
        }
        ok_effects(&effects)
    }

    // ─── Stage input ─────────────────────────────────────────────────────

    pub fn pointer_enter(&mut self, focus_within: bool) -> String {
        ok_effects(&self.stage.pointer_enter(focus_within))
    }

    pub fn pointer_down(&mut self, raw: RawPointer) -> String {
        ok_effects(&self.stage.pointer_down(&raw.to_input()))
    }

    pub fn pointer_move(&mut self, raw: RawPointer) -> String {
        ok_effects(&self.stage.pointer_move(&raw.to_input()))
    }

    pub fn pointer_up(&mut self, raw: RawPointer) -> String {
        ok_effects(&self.stage.pointer_up(&raw.to_input()))
    }

    pub fn wheel(
        &mut self,
        delta_y: f64,
        target: &str,
        client_height: f64,
        scroll_height: f64,
    ) -> String {
        let kind = match target {
            "textarea" => WheelTargetKind::TextArea,
            "comment" => WheelTargetKind::Comment,
            _ => WheelTargetKind::Other,
        };
        let input = WheelInput {
            delta_y,
            target: WheelTarget {
                kind,
                client_height,
                scroll_height,
            },
        };
        ok_effects(&self.stage.wheel(&input))
    }

    pub fn key_down(&mut self, key: &str) -> String {
        ok_effects(&self.stage.key_down(Key::from_dom(key)))
    }

    pub fn key_up(&mut self, key: &str) -> String {
        ok_effects(&self.stage.key_up(Key::from_dom(key)))
    }

    // ─── Context menu ────────────────────────────────────────────────────

    pub fn context_menu(&mut self, x: f64, y: f64) -> String {
        ok_effects(&self.stage.context_menu(Point::new(x, y)))
    }

    pub fn close_menu(&mut self) -> String {
        ok_effects(&self.stage.close_menu())
    }

    /// Open menu as JSON (`null` when closed).
    pub fn menu_json(&self) -> String {
        serde_json::to_string(&self.stage.menu()).unwrap_or_else(|_| "null".to_string())
    }

    /// `value` is a serialized [`MenuValue`], e.g. `{"kind":"node","type":"number"}`.
    pub fn select_menu_option(&mut self, value: &str) -> String {
        match serde_json::from_str::<MenuValue>(value) {
            Ok(value) => ok_effects(&self.stage.select_menu_option(&value)),
            Err(e) => error(&format!("Invalid menu value: {e}")),
        }
    }

    // ─── Nodes ───────────────────────────────────────────────────────────

    /// Create a node for an id the host's node store already holds. Re-adding
    /// an id replaces the old node and tears down its gesture.
    pub fn add_node(&mut self, id: &str, node_type: &str, x: f64, y: f64, width: f64) -> String {
        let mut props = NodeProps::new(
            NodeId::intern(id),
            NodeTypeId::intern(node_type),
            Point::new(x, y),
        );
        props.width = width;
        props.delay = self.stage.config().delay;
        match Node::new(props, &self.registry) {
            Ok(node) => {
                let effects = match self.nodes.insert(props.id, node) {
                    Some(mut old) => {
                        log::debug!("{:?} replaced", props.id);
                        old.unmount()
                    }
                    None => Vec::new(),
                };
                self.stage.set_entity_count(self.nodes.len());
                ok_effects(&effects)
            }
            Err(e) => error(&e.to_string()),
        }
    }

    pub fn remove_node(&mut self, id: &str) -> String {
        match self.nodes.remove(&NodeId::intern(id)) {
            Some(mut node) => {
                self.stage.set_entity_count(self.nodes.len());
                ok_effects(&node.unmount())
            }
            None => unknown_node(id),
        }
    }

    pub fn set_node_position(&mut self, id: &str, x: f64, y: f64) -> String {
        match self.nodes.get_mut(&NodeId::intern(id)) {
            Some(node) => {
                node.set_position(Point::new(x, y));
                ok_effects(&[])
            }
            None => unknown_node(id),
        }
    }

    /// `bounds` is the node element's bounding client rect.
    pub fn node_pointer_down(&mut self, id: &str, raw: RawPointer, bounds: Rect) -> String {
        match self.nodes.get_mut(&NodeId::intern(id)) {
            Some(node) => ok_effects(&node.pointer_down(&raw.to_input(), bounds)),
            None => unknown_node(id),
        }
    }

    pub fn node_pointer_move(&mut self, id: &str, raw: RawPointer) -> String {
        let surface = *self.stage.surface();
        match self.nodes.get_mut(&NodeId::intern(id)) {
            Some(node) => ok_effects(&node.pointer_move(&raw.to_input(), &surface)),
            None => unknown_node(id),
        }
    }

    pub fn node_pointer_up(&mut self, id: &str, raw: RawPointer) -> String {
        match self.nodes.get_mut(&NodeId::intern(id)) {
            Some(node) => ok_effects(&node.pointer_up(&raw.to_input())),
            None => unknown_node(id),
        }
    }

    // ─── Render state ────────────────────────────────────────────────────

    /// Everything the host needs to paint the stage chrome.
    pub fn render_state(&self) -> String {
        let view = self.stage.view();
        json!({
            "scale": view.scale(),
            "translate": self.stage.render_translate(),
            "selection": self.stage.selection(),
            "cursor": self.stage.cursor(),
            "menuOpen": self.stage.menu().is_some(),
        })
        .to_string()
    }
}

fn ok_effects(effects: &[Effect]) -> String {
    match serde_json::to_string(effects) {
        Ok(json) => format!(r#"{{"ok":true,"effects":{json}}}"#),
        Err(e) => error(&format!("Serialization error: {e}")),
    }
}

fn error(message: &str) -> String {
    log::warn!("{message}");
    json!({"ok": false, "error": message}).to_string()
}

fn unknown_node(id: &str) -> String {
    error(&format!("unknown node `{id}`"))
}
