//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logging setup
//! - Frame timing (monotonic clock to clamped simulation steps)

pub mod time;

pub use time::FrameClock;

/// Install the logger for this platform
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Logger already initialized");
    }
}

/// Install the logger for this platform (honours `RUST_LOG`)
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
