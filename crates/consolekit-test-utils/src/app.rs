use async_trait::async_trait;
use consolekit_host::ConsoleApplication;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Application that returns a fixed exit code and counts its runs.
#[derive(Debug, Clone, Default)]
pub struct RecordingApplication {
    exit_code: i32,
    runs: Arc<AtomicUsize>,
}

impl RecordingApplication {
    pub fn new(exit_code: i32) -> Self {
        Self {
            exit_code,
            runs: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared run counter, still readable after the host consumed the app.
    pub fn runs(&self) -> Arc<AtomicUsize> {
        self.runs.clone()
    }
}

#[async_trait]
impl ConsoleApplication for RecordingApplication {
    async fn run(&self) -> anyhow::Result<i32> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(self.exit_code)
    }
}

/// Application whose entry method always fails.
#[derive(Debug, Clone)]
pub struct FailingApplication {
    message: String,
}

impl FailingApplication {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ConsoleApplication for FailingApplication {
    async fn run(&self) -> anyhow::Result<i32> {
        anyhow::bail!("{}", self.message)
    }
}
