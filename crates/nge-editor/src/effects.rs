//! Effects: everything an engine asks its host to do.
//!
//! Handlers return effects in the order they must be applied. Commands for
//! external stores ride along as `Stage` / `Graph`; node drag notifications
//! as `NodeDrag` / `NodeDragEnd`.

use crate::listeners::Listener;
use nge_core::{GraphCommand, NodeId, Point, SelectionRect, StageCommand, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cursor {
    Default,
    Grab,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", content = "data", rename_all = "camelCase")]
pub enum Effect {
    AttachListener(Listener),
    DetachListener(Listener),
    PreventDefault,
    StopPropagation,
    /// Move input focus to the stage surface.
    Focus,
    /// Command for the stage-transform store.
    Stage(StageCommand),
    /// Command for the node store or the comment subsystem.
    Graph(GraphCommand),
    /// Render-only translate while a pan is in progress. Nothing is dispatched.
    PanPreview { translate: Vec2 },
    /// Rubber-band selection became active or finished.
    Selecting(bool),
    SelectionRect(SelectionRect),
    MenuOpened { at: Point },
    MenuClosed,
    Cursor(Cursor),
    /// A node moved during a drag. Emitted on every move (live commit).
    NodeDrag { id: NodeId, position: Point },
    NodeDragEnd { id: NodeId },
}

impl Effect {
    pub fn is_listener_change(&self) -> bool {
        matches!(self, Effect::AttachListener(_) | Effect::DetachListener(_))
    }
}

/// Pull the commands for the stage-transform store out of an effect list.
pub fn stage_commands(effects: &[Effect]) -> Vec<StageCommand> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Stage(cmd) => Some(*cmd),
            _ => None,
        })
        .collect()
}

/// Pull the graph mutation commands out of an effect list.
pub fn graph_commands(effects: &[Effect]) -> Vec<GraphCommand> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Graph(cmd) => Some(*cmd),
            _ => None,
        })
        .collect()
}
