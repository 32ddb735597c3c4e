//! WebAssembly entry point.

use crate::{App, AppConfig, ShortcutRegistry};
use wasm_bindgen::prelude::*;

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub async fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger setup failed: {e}").into());
    }

    log::info!("Starting TilePlan (WASM)");

    let config = AppConfig::default();
    ShortcutRegistry::log_all(&config.planner.keys);

    if let Err(e) = App::run(config).await {
        log::error!("{}", e);
    }
}
