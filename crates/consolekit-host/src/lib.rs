//! Console application host.
//!
//! This crate owns the logger factory, the service registry and the
//! composition root that builds the service graph and dispatches to a single
//! registered application.

pub mod application;
pub mod context;
pub mod error;
pub mod host;
pub mod logging;
pub mod registry;

pub use application::ConsoleApplication;
pub use context::{PropertyGuard, push_property};
pub use error::HostError;
/// Composition root and start-up helpers.
pub use host::{APPLICATION, CONFIGURATION, SETTINGS, init_console, run_console};
pub use logging::{
    APPLICATION_CONTEXT, ConsoleLogger, LogFormat, LogLevel, LogTarget, LoggerSettings,
    create_logger,
};
pub use registry::{Capability, ServiceCollection, ServiceProvider, ServiceResolver};
