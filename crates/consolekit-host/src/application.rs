//! Entry-point contract for console applications.

use async_trait::async_trait;

/// The single application a console host runs.
///
/// Constructed once by the composition root with its dependencies resolved;
/// the returned integer becomes the process exit code (0 signals success).
#[async_trait]
pub trait ConsoleApplication: Send + Sync {
    async fn run(&self) -> anyhow::Result<i32>;
}
