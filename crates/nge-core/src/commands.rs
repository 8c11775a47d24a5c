//! Graph mutation commands emitted by the stage.
//!
//! The node collection store and the comment subsystem live outside this
//! workspace; these are the only messages they receive from it.

use crate::geometry::Point;
use crate::id::NodeTypeId;
use serde::{Deserialize, Serialize};

/// A command for the node store (`ADD_NODE`) or the comment store (`ADD_COMMENT`).
/// Positions are in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GraphCommand {
    AddNode {
        x: f64,
        y: f64,
        #[serde(rename = "nodeType")]
        node_type: NodeTypeId,
    },
    AddComment {
        x: f64,
        y: f64,
    },
}

impl GraphCommand {
    pub fn add_node(at: Point, node_type: NodeTypeId) -> Self {
        Self::AddNode {
            x: at.x,
            y: at.y,
            node_type,
        }
    }

    pub fn add_comment(at: Point) -> Self {
        Self::AddComment { x: at.x, y: at.y }
    }

    /// Canvas position the new entity should be created at.
    pub fn position(&self) -> Point {
        match *self {
            Self::AddNode { x, y, .. } | Self::AddComment { x, y } => Point::new(x, y),
        }
    }
}
