use parking_lot::Mutex;
use std::sync::Arc;

/// Shared, ordered record of constructor side effects.
#[derive(Debug, Clone, Default)]
pub struct ConstructionLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl ConstructionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, name: impl Into<String>) {
        self.entries.lock().push(name.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Number of times `name` was recorded.
    pub fn count(&self, name: &str) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.as_str() == name)
            .count()
    }
}
