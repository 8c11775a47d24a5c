//! WASM bridge for the node graph editor: exposes the stage and node engines
//! to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host owns the DOM: it
//! forwards raw events here and applies the returned JSON effects
//! (listener changes, `preventDefault`, store commands).

mod session;

pub use session::{EditorSession, RawPointer};

use nge_core::Rect;
use wasm_bindgen::prelude::*;

/// The main WASM-facing editor controller.
///
/// Every handler returns JSON: `{"ok":true,"effects":[...]}` or
/// `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub struct NgeEditor {
    session: EditorSession,
}

impl Default for NgeEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl NgeEditor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        Self {
            session: EditorSession::new(),
        }
    }

    /// Replace the node type registry (a JSON array of node types).
    pub fn set_registry(&mut self, json: &str) -> String {
        self.session.set_registry(json)
    }

    /// Apply stage options (`delay`, `spaceToPan`, `disableComments`, ...).
    pub fn set_options(&mut self, json: &str) -> String {
        self.session.set_config(json)
    }

    /// Push the stage store's current transform.
    pub fn set_view(&mut self, scale: f64, x: f64, y: f64) {
        self.session.set_view(scale, x, y);
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.session.set_focused(focused);
    }

    /// Mount with the surface element's bounding client rect.
    pub fn mount(&mut self, left: f64, top: f64, width: f64, height: f64) -> String {
        self.session.mount(left, top, width, height)
    }

    pub fn resize(&mut self, left: f64, top: f64, width: f64, height: f64) {
        self.session.resize(left, top, width, height);
    }

    pub fn unmount(&mut self) -> String {
        self.session.unmount()
    }

    // ─── Stage events ────────────────────────────────────────────────────

    pub fn handle_pointer_enter(&mut self, focus_within: bool) -> String {
        self.session.pointer_enter(focus_within)
    }

    pub fn handle_pointer_down(
        &mut self,
        x: f64,
        y: f64,
        buttons: u16,
        alt: bool,
        touch: bool,
    ) -> String {
        self.session.pointer_down(raw(x, y, buttons, alt, touch))
    }

    pub fn handle_pointer_move(
        &mut self,
        x: f64,
        y: f64,
        buttons: u16,
        alt: bool,
        touch: bool,
    ) -> String {
        self.session.pointer_move(raw(x, y, buttons, alt, touch))
    }

    pub fn handle_pointer_up(
        &mut self,
        x: f64,
        y: f64,
        buttons: u16,
        alt: bool,
        touch: bool,
    ) -> String {
        self.session.pointer_up(raw(x, y, buttons, alt, touch))
    }

    /// `target` is `"textarea"`, `"comment"`, or anything else for the canvas.
    pub fn handle_wheel(
        &mut self,
        delta_y: f64,
        target: &str,
        client_height: f64,
        scroll_height: f64,
    ) -> String {
        self.session.wheel(delta_y, target, client_height, scroll_height)
    }

    /// `key` is the DOM `KeyboardEvent.key` value.
    pub fn handle_key_down(&mut self, key: &str) -> String {
        self.session.key_down(key)
    }

    pub fn handle_key_up(&mut self, key: &str) -> String {
        self.session.key_up(key)
    }

    // ─── Context menu ────────────────────────────────────────────────────

    pub fn handle_context_menu(&mut self, x: f64, y: f64) -> String {
        self.session.context_menu(x, y)
    }

    pub fn close_menu(&mut self) -> String {
        self.session.close_menu()
    }

    pub fn get_menu_json(&self) -> String {
        self.session.menu_json()
    }

    pub fn select_menu_option(&mut self, value: &str) -> String {
        self.session.select_menu_option(value)
    }

    // ─── Nodes ───────────────────────────────────────────────────────────

    pub fn add_node(&mut self, id: &str, node_type: &str, x: f64, y: f64, width: f64) -> String {
        self.session.add_node(id, node_type, x, y, width)
    }

    pub fn remove_node(&mut self, id: &str) -> String {
        self.session.remove_node(id)
    }

    pub fn set_node_position(&mut self, id: &str, x: f64, y: f64) -> String {
        self.session.set_node_position(id, x, y)
    }

    /// Press on a node. `left`..`height` is the node element's client rect.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_node_pointer_down(
        &mut self,
        id: &str,
        x: f64,
        y: f64,
        buttons: u16,
        touch: bool,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> String {
        let bounds = Rect::from_origin_size((left, top), (width, height));
        self.session
            .node_pointer_down(id, raw(x, y, buttons, false, touch), bounds)
    }

    pub fn handle_node_pointer_move(
        &mut self,
        id: &str,
        x: f64,
        y: f64,
        buttons: u16,
        touch: bool,
    ) -> String {
        self.session
            .node_pointer_move(id, raw(x, y, buttons, false, touch))
    }

    pub fn handle_node_pointer_up(
        &mut self,
        id: &str,
        x: f64,
        y: f64,
        buttons: u16,
        touch: bool,
    ) -> String {
        self.session
            .node_pointer_up(id, raw(x, y, buttons, false, touch))
    }

    /// Transform, selection rectangle, cursor, and menu flag for painting.
    pub fn get_render_state(&self) -> String {
        self.session.render_state()
    }
}

fn raw(x: f64, y: f64, buttons: u16, alt: bool, touch: bool) -> RawPointer {
    RawPointer {
        x,
        y,
        buttons,
        alt,
        touch,
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("NGE WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone validation (no editor needed) ────────────────────────────

/// Validate a node type registry. Returns `{"ok":true,"types":N}` or
/// `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_registry(json: &str) -> String {
    match nge_core::NodeTypeRegistry::from_json(json) {
        Ok(registry) => format!(r#"{{"ok":true,"types":{}}}"#, registry.len()),
        Err(e) => serde_json::json!({"ok": false, "error": e.to_string()}).to_string(),
    }
}
