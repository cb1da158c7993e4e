//! Solar-powered dwelling controller and its host-side simulator.

/// TOML scenario configuration and presets.
pub mod config;
pub mod devices;
pub mod io;
/// Controller subsystems, scheduler and simulation engine.
pub mod sim;
#[cfg(feature = "tui")]
pub mod tui;
