//! TilePlan Render Library
//!
//! The drawing surface abstraction the frame driver talks to, a recording
//! surface for headless use, and a Vello implementation for the GPU.

mod frame;
mod recording;
mod surface;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use frame::{FrameStyle, render_frame, status_line};
pub use recording::{DrawCommand, RecordingSurface};
pub use surface::{DrawSurface, RenderResult, RendererError};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloSurface;
