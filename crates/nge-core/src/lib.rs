pub mod commands;
pub mod config;
pub mod geometry;
pub mod id;
pub mod registry;
pub mod view;

pub use commands::GraphCommand;
pub use config::{DEFAULT_DRAG_DELAY, StageConfig};
pub use geometry::{Point, Rect, SelectionRect, Size, SurfaceRect, Vec2};
pub use id::{NodeId, NodeTypeId};
pub use registry::{NodeType, NodeTypeRegistry, PortSpec, Ports, RegistryError};
pub use view::{MAX_SCALE, MIN_SCALE, StageCommand, StageViewState};
