//! TilePlan Application
//!
//! The application shell: windowing, surface setup, input decoding and the
//! per-frame redraw loop around a core `Session`.

mod app;
mod events;
mod shortcuts;

pub use app::{App, AppConfig, AppError, CONFIG_ENV_VAR};
pub use shortcuts::{Shortcut, ShortcutRegistry};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
