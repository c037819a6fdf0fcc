//! Public SDK surface for consolekit.
//!
//! Re-exports the configuration and host crates and ships the sample service
//! and application used by the `consolekit-sample` binary.

/// Re-export for convenience.
pub use consolekit_config as config;
/// Re-export for convenience.
pub use consolekit_host as host;

pub mod sample;
