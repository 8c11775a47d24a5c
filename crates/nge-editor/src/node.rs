//! A single draggable node.
//!
//! Nodes run their own drag gesture, independent of the stage's. A
//! confirmed drag always moves the node: the pointer keeps the grip point
//! it pressed on, and every move reports the new position to the host
//! (`NodeDrag`), not just the release.

use crate::effects::Effect;
use crate::gesture::{DragGesture, GestureStep};
use crate::input::PointerInput;
use crate::listeners::ListenerSet;
use nge_core::{
    DEFAULT_DRAG_DELAY, NodeId, NodeTypeId, NodeTypeRegistry, Point, PortSpec, Rect,
    RegistryError, SurfaceRect, Vec2,
};

/// Construction parameters for a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeProps {
    pub id: NodeId,
    pub node_type: NodeTypeId,
    pub width: f64,
    pub height: f64,
    pub position: Point,
    pub delay: f64,
}

impl NodeProps {
    pub fn new(id: NodeId, node_type: NodeTypeId, position: Point) -> Self {
        Self {
            id,
            node_type,
            width: 200.0,
            height: 0.0,
            position,
            delay: DEFAULT_DRAG_DELAY,
        }
    }
}

pub struct Node {
    id: NodeId,
    node_type: NodeTypeId,
    label: String,
    inputs: Vec<PortSpec>,
    outputs: Vec<PortSpec>,
    width: f64,
    height: f64,
    position: Point,
    gesture: DragGesture,
    /// Screen-space top-left of the node when the pointer went down.
    pressed_corner: Option<Point>,
    /// Pointer-to-corner offset, fixed for the whole drag.
    grip: Option<Vec2>,
    /// Threshold set mid-gesture, applied once the gesture is idle again.
    pending_delay: Option<f64>,
}

impl Node {
    /// Look up the node's type and build it. Fails if the type key is unknown.
    pub fn new(props: NodeProps, registry: &NodeTypeRegistry) -> Result<Self, RegistryError> {
        let node_type = registry.get(props.node_type)?;
        Ok(Self {
            id: props.id,
            node_type: props.node_type,
            label: node_type.label.clone(),
            inputs: node_type.inputs.to_vec(),
            outputs: node_type.outputs.to_vec(),
            width: props.width,
            height: props.height,
            position: props.position,
            gesture: DragGesture::new(props.delay),
            pressed_corner: None,
            grip: None,
            pending_delay: None,
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node_type(&self) -> NodeTypeId {
        self.node_type
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn inputs(&self) -> &[PortSpec] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[PortSpec] {
        &self.outputs
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Position to render at (the working copy while dragging).
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    pub fn grip(&self) -> Option<Vec2> {
        self.grip
    }

    pub fn listeners(&self) -> &ListenerSet {
        self.gesture.listeners()
    }

    /// Store-owned position pushed back by the host. Ignored mid-drag, where
    /// the working copy is authoritative.
    pub fn set_position(&mut self, position: Point) {
        if self.gesture.is_dragging() {
            log::trace!("{:?}: store position ignored during drag", self.id);
            return;
        }
        self.position = position;
    }

    /// New drag threshold. Applies from the next gesture; an active one keeps
    /// the threshold it started with.
    pub fn set_delay(&mut self, delay: f64) {
        if self.gesture.is_idle() {
            self.gesture.set_threshold(delay);
        } else {
            self.pending_delay = Some(delay);
        }
    }

    /// Press on the node. `bounds` is the node's current on-screen rectangle.
    pub fn pointer_down(&mut self, input: &PointerInput, bounds: Rect) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.gesture.press(input, &mut effects) {
            self.pressed_corner = Some(bounds.origin());
        }
        effects
    }

    pub fn pointer_move(&mut self, input: &PointerInput, surface: &SurfaceRect) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.gesture.motion(input, &mut effects) {
            GestureStep::Started { press } => {
                let corner = self.pressed_corner.take().unwrap_or(press);
                self.grip = Some(press - corner);
                log::debug!("{:?}: drag started, grip {:?}", self.id, self.grip);
                self.drag_to(input.position, surface, &mut effects);
            }
            GestureStep::Moved => self.drag_to(input.position, surface, &mut effects),
            _ => {}
        }
        effects
    }

    pub fn pointer_up(&mut self, _input: &PointerInput) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.gesture.release(&mut effects) {
            GestureStep::Ended => {
                self.grip = None;
                effects.push(Effect::NodeDragEnd { id: self.id });
            }
            GestureStep::Clicked => self.pressed_corner = None,
            _ => {}
        }
        self.apply_pending_delay();
        effects
    }

    /// Tear down any gesture in progress.
    pub fn unmount(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.gesture.abandon(&mut effects);
        self.grip = None;
        self.pressed_corner = None;
        self.apply_pending_delay();
        effects
    }

    fn apply_pending_delay(&mut self) {
        if let Some(delay) = self.pending_delay.take() {
            self.gesture.set_threshold(delay);
        }
    }

    fn drag_to(&mut self, pointer: Point, surface: &SurfaceRect, effects: &mut Vec<Effect>) {
        let Some(grip) = self.grip else {
            return;
        };
        self.position = surface.to_surface(pointer) - grip;
        log::trace!("{:?} -> {:?}", self.id, self.position);
        effects.push(Effect::NodeDrag {
            id: self.id,
            position: self.position,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButtons;
    use nge_core::NodeType;
    use pretty_assertions::assert_eq;

    fn registry() -> NodeTypeRegistry {
        let mut number = NodeType::new("number", "Number");
        number.outputs.push(PortSpec {
            port_type: "number".into(),
            name: "number".into(),
            label: Some("Number".into()),
        });
        [number].into_iter().collect()
    }

    fn node_at(x: f64, y: f64) -> Node {
        let props = NodeProps::new(
            NodeId::intern("n1"),
            NodeTypeId::intern("number"),
            Point::new(x, y),
        );
        Node::new(props, &registry()).unwrap()
    }

    fn mouse(x: f64, y: f64) -> PointerInput {
        PointerInput::mouse(x, y, MouseButtons::PRIMARY)
    }

    fn drags(effects: &[Effect]) -> Vec<Point> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::NodeDrag { position, .. } => Some(*position),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn unknown_type_fails_construction() {
        let props = NodeProps::new(
            NodeId::intern("n2"),
            NodeTypeId::intern("missingType"),
            Point::ZERO,
        );
        let err = Node::new(props, &registry()).err().unwrap();
        assert_eq!(err, RegistryError::UnknownType(NodeTypeId::intern("missingType")));
    }

    #[test]
    fn looks_up_label_and_ports() {
        let node = node_at(0.0, 0.0);
        assert_eq!(node.label(), "Number");
        assert!(node.inputs().is_empty());
        assert_eq!(node.outputs().len(), 1);
    }

    #[test]
    fn grip_offset_is_preserved() {
        let surface = SurfaceRect::from_client_rect(20.0, 10.0, 800.0, 600.0);
        let mut node = node_at(80.0, 90.0);
        // Box on screen at surface origin + position.
        let bounds = Rect::from_origin_size((100.0, 100.0), (200.0, 80.0));

        node.pointer_down(&mouse(105.0, 103.0), bounds);
        let fx = node.pointer_move(&mouse(125.0, 103.0), &surface);
        assert_eq!(node.grip(), Some(Vec2::new(5.0, 3.0)));
        // Promotion reports immediately.
        assert_eq!(drags(&fx), vec![Point::new(100.0, 90.0)]);

        for (x, y) in [(400.0, 7.0), (401.0, 8.0), (-50.0, 300.0)] {
            let fx = node.pointer_move(&mouse(x, y), &surface);
            let expected = Point::new(x - 20.0 - 5.0, y - 10.0 - 3.0);
            assert_eq!(drags(&fx), vec![expected]);
            assert_eq!(node.position(), expected);
            assert_eq!(node.grip(), Some(Vec2::new(5.0, 3.0)));
        }
    }

    #[test]
    fn every_move_commits_position() {
        let surface = SurfaceRect::from_client_rect(0.0, 0.0, 800.0, 600.0);
        let mut node = node_at(0.0, 0.0);
        node.pointer_down(&mouse(10.0, 10.0), Rect::new(0.0, 0.0, 200.0, 50.0));

        let mut all = Vec::new();
        for x in [20.0, 30.0, 40.0, 50.0] {
            all.extend(node.pointer_move(&mouse(x, 10.0), &surface));
        }
        assert_eq!(
            drags(&all),
            vec![
                Point::new(10.0, 0.0),
                Point::new(20.0, 0.0),
                Point::new(30.0, 0.0),
                Point::new(40.0, 0.0),
            ]
        );

        let fx = node.pointer_up(&mouse(50.0, 10.0));
        assert_eq!(fx.last(), Some(&Effect::NodeDragEnd { id: node.id() }));
        assert!(node.listeners().is_empty());
        assert_eq!(node.position(), Point::new(40.0, 0.0));
    }

    #[test]
    fn click_does_not_move_or_notify() {
        let surface = SurfaceRect::default();
        let mut node = node_at(7.0, 7.0);
        node.pointer_down(&mouse(10.0, 10.0), Rect::new(7.0, 7.0, 207.0, 57.0));
        let fx = node.pointer_move(&mouse(12.0, 11.0), &surface);
        assert!(drags(&fx).is_empty());
        let fx = node.pointer_up(&mouse(12.0, 11.0));
        assert!(!fx.iter().any(|e| matches!(e, Effect::NodeDragEnd { .. })));
        assert_eq!(node.position(), Point::new(7.0, 7.0));
        assert!(node.listeners().is_empty());
    }

    #[test]
    fn store_updates_ignored_mid_drag() {
        let surface = SurfaceRect::default();
        let mut node = node_at(0.0, 0.0);
        node.set_position(Point::new(3.0, 4.0));
        assert_eq!(node.position(), Point::new(3.0, 4.0));

        node.pointer_down(&mouse(0.0, 0.0), Rect::new(0.0, 0.0, 10.0, 10.0));
        node.pointer_move(&mouse(10.0, 0.0), &surface);
        node.set_position(Point::new(999.0, 999.0));
        assert_eq!(node.position(), Point::new(10.0, 0.0));
    }

    #[test]
    fn delay_change_applies_from_next_gesture() {
        let surface = SurfaceRect::default();
        let mut node = node_at(0.0, 0.0);
        node.set_delay(20.0);
        node.pointer_down(&mouse(0.0, 0.0), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(drags(&node.pointer_move(&mouse(10.0, 0.0), &surface)).is_empty());
        assert!(!node.is_dragging());
        assert_eq!(drags(&node.pointer_move(&mouse(20.0, 0.0), &surface)).len(), 1);

        // Mid-drag change waits for the release.
        node.set_delay(2.0);
        node.pointer_move(&mouse(21.0, 0.0), &surface);
        node.pointer_up(&mouse(21.0, 0.0));
        node.pointer_down(&mouse(0.0, 0.0), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(drags(&node.pointer_move(&mouse(3.0, 0.0), &surface)).len(), 1);
    }

    #[test]
    fn touch_drag_moves_node() {
        let surface = SurfaceRect::default();
        let mut node = node_at(0.0, 0.0);
        let fx = node.pointer_down(&PointerInput::touch(5.0, 5.0), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(!fx.contains(&Effect::PreventDefault));
        let fx = node.pointer_move(&PointerInput::touch(15.0, 5.0), &surface);
        assert_eq!(drags(&fx), vec![Point::new(10.0, 0.0)]);
    }
}
