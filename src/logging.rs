//! Logger setup for the native binary
//!
//! The library only talks to the `log` facade; picking a backend is the
//! binary's job.

#[cfg(not(target_arch = "wasm32"))]
use env_logger::{Builder, Env};
#[cfg(not(target_arch = "wasm32"))]
use log::LevelFilter;

/// Initializes the global logger.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects debug output and the
/// default is info.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    // Fails only if a logger is already installed, which is fine for tests.
    let _ = Builder::from_env(env).try_init();
}

#[cfg(target_arch = "wasm32")]
pub fn init(_verbose: bool) {}
