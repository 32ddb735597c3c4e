//! TilePlan Core Library
//!
//! Platform-agnostic state and logic for the TilePlan grid editor: the camera
//! transform, grid snapping, the placement tool state machine and the
//! collection of placed stores and tracks.

pub mod camera;
pub mod config;
pub mod grid;
pub mod input;
pub mod placement;
pub mod session;
pub mod snap;
pub mod tools;

pub use camera::Camera;
pub use config::{ConfigError, KeyBindings, PlannerConfig, ZoomSmoothing};
pub use grid::{Grid, GridError, GridLine, GridLineKind};
pub use input::InputState;
pub use placement::{EntityKind, PlacedEntity, Placements, axis_lock, footprint};
pub use session::{Command, Session, SessionEvent};
pub use snap::snap_to_cell;
pub use tools::{CursorStyle, Tool};
