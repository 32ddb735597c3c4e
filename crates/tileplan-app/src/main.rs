//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    use tileplan_app::{App, AppConfig, ShortcutRegistry};

    env_logger::init();
    log::info!("Starting TilePlan");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    ShortcutRegistry::print_all(&config.planner.keys);

    if let Err(e) = pollster::block_on(App::run(config)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
