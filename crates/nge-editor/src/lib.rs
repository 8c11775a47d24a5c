//! Interaction engines for the node graph editor.
//!
//! Hosts feed raw input into a [`stage::Stage`] and its [`node::Node`]s and
//! apply the returned [`effects::Effect`]s in order.

pub mod effects;
pub mod gesture;
pub mod input;
pub mod listeners;
pub mod menu;
pub mod node;
pub mod stage;

pub use effects::{Cursor, Effect};
pub use input::{Device, Key, Modifiers, MouseButtons, PointerInput, WheelInput, WheelTarget};
pub use node::{Node, NodeProps};
pub use stage::{DragMode, DragSession, Stage};
