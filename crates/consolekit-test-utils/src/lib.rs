//! Test helpers shared across consolekit crates.

pub mod app;
pub mod config;
pub mod construction;
pub mod logs;

pub use app::{FailingApplication, RecordingApplication};
pub use config::{resolved_config, settings_dir};
pub use construction::ConstructionLog;
pub use logs::{CapturedRecord, LogCapture, capture_logs};
