//! The editing session: all mutable state touched by input handlers and the
//! frame driver.

use crate::camera::Camera;
use crate::config::{KeyBindings, PlannerConfig, ZoomSmoothing};
use crate::grid::Grid;
use crate::input::{InputState, KeyEvent, MouseButton, PointerEvent};
use crate::placement::{EntityKind, PlacedEntity, Placements};
use crate::tools::{CursorStyle, Tool};
use kurbo::{Point, Size};

/// Commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Toggle or switch to the placing tool for a kind.
    SelectTool(EntityKind),
    /// Drop the pending anchor.
    Cancel,
    /// Return the camera to the origin at 100%.
    ResetView,
}

/// What a handler changed, so the host can react without diffing state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    /// Nothing observable changed.
    None,
    /// The active tool changed; the cursor should become this style.
    ToolChanged(CursorStyle),
    /// A first corner was recorded.
    AnchorSet(Point),
    /// An entity was committed.
    Placed(PlacedEntity),
    /// A pending anchor was dropped.
    Cancelled,
    /// Pan or zoom target changed.
    ViewChanged,
}

/// Owns the grid, camera, tool and placed entities for one editing session.
///
/// Every handler takes `&mut self`; nothing else holds references into it.
#[derive(Debug, Clone)]
pub struct Session {
    pub grid: Grid,
    pub camera: Camera,
    pub tool: Tool,
    pub placements: Placements,
    pub input: InputState,
    pub keys: KeyBindings,
    pub zoom_smoothing: ZoomSmoothing,
}

impl Session {
    /// Create a session with the default key bindings.
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            camera: Camera::new(),
            tool: Tool::Idle,
            placements: Placements::new(),
            input: InputState::new(),
            keys: KeyBindings::default(),
            zoom_smoothing: ZoomSmoothing::default(),
        }
    }

    /// Create a session from a validated config.
    pub fn from_config(config: &PlannerConfig) -> Result<Self, crate::ConfigError> {
        config.validate()?;
        let mut session = Self::new(config.grid()?);
        session.keys = config.keys.clone();
        session.zoom_smoothing = config.zoom_smoothing;
        Ok(session)
    }

    /// Update the viewport size.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.camera.set_viewport(Size::new(width, height));
    }

    /// Advance camera smoothing for one frame.
    pub fn advance(&mut self, dt_seconds: f64) {
        match self.zoom_smoothing {
            ZoomSmoothing::PerFrame => self.camera.advance(),
            ZoomSmoothing::TimeScaled => self.camera.advance_by(dt_seconds),
        }
    }

    /// World position under the pointer.
    pub fn world_cursor(&self) -> Point {
        self.camera.screen_to_world(self.input.pointer_position)
    }

    /// The entity a click at the pointer would place, if an anchor is pending.
    pub fn ghost(&self) -> Option<PlacedEntity> {
        self.tool.ghost(self.world_cursor(), self.grid.cell_size())
    }

    /// Cursor affordance for the active tool.
    pub fn cursor(&self) -> CursorStyle {
        self.tool.cursor()
    }

    /// Process a pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> SessionEvent {
        self.input.handle_pointer_event(event);

        match event {
            PointerEvent::Down {
                button: MouseButton::Left,
                ..
            } => self.handle_click(),
            PointerEvent::Move { .. } => {
                // Idle drags pan; placing tools only move the ghost.
                if self.tool.is_idle() && self.input.is_dragging() {
                    self.camera.pan(self.input.pointer_delta());
                    SessionEvent::ViewChanged
                } else {
                    SessionEvent::None
                }
            }
            PointerEvent::Wheel { delta, .. } => {
                self.camera.apply_wheel(delta.y);
                SessionEvent::ViewChanged
            }
            PointerEvent::Down { .. } | PointerEvent::Up { .. } => SessionEvent::None,
        }
    }

    fn handle_click(&mut self) -> SessionEvent {
        if self.tool.is_idle() {
            return SessionEvent::None;
        }

        let world = self.world_cursor();
        match self.tool.click(world, self.grid.cell_size()) {
            Some(entity) => {
                let (cols, rows) = entity.cells(self.grid.cell_size());
                log::info!(
                    "Placed {} at ({}, {}) covering {}x{} cells",
                    entity.kind.name(),
                    entity.origin.x,
                    entity.origin.y,
                    cols,
                    rows,
                );
                self.placements.push(entity);
                SessionEvent::Placed(entity)
            }
            None => match self.tool.anchor() {
                Some(anchor) => {
                    log::debug!("Anchor set at ({}, {})", anchor.x, anchor.y);
                    SessionEvent::AnchorSet(anchor)
                }
                None => SessionEvent::None,
            },
        }
    }

    /// Process a key press identified by its key string.
    pub fn handle_key(&mut self, key: &str) -> SessionEvent {
        match self.keys.resolve(key) {
            Some(command) => self.apply(command),
            None => SessionEvent::None,
        }
    }

    /// Process a key event. Only presses trigger commands.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> SessionEvent {
        match event {
            KeyEvent::Pressed(key) => self.handle_key(key),
            KeyEvent::Released(_) => SessionEvent::None,
        }
    }

    /// Apply a command directly.
    pub fn apply(&mut self, command: Command) -> SessionEvent {
        match command {
            Command::SelectTool(kind) => {
                let before = self.tool;
                self.tool.select(kind);
                if before.anchor().is_some() {
                    log::debug!("Discarded pending {} anchor", before.label());
                }
                log::info!("Tool: {} -> {}", before.label(), self.tool.label());
                SessionEvent::ToolChanged(self.tool.cursor())
            }
            Command::Cancel => {
                if self.tool.cancel() {
                    log::debug!("Cancelled pending {} placement", self.tool.label());
                    SessionEvent::Cancelled
                } else {
                    SessionEvent::None
                }
            }
            Command::ResetView => {
                self.camera.reset();
                SessionEvent::ViewChanged
            }
        }
    }
}
