use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::sync::{Once, OnceLock};

/// One record seen by [`LogCapture`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// `log` backend that keeps every record in memory.
#[derive(Debug, Default)]
pub struct LogCapture {
    records: Mutex<Vec<CapturedRecord>>,
}

impl LogCapture {
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records.lock().clone()
    }

    /// True when a record at `level` contains `needle` in its message.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|record| record.level == level && record.message.contains(needle))
    }
}

impl Log for LogCapture {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        self.records.lock().push(CapturedRecord {
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        });
    }

    fn flush(&self) {}
}

static CAPTURE: OnceLock<LogCapture> = OnceLock::new();
static INSTALL: Once = Once::new();

/// Install the capture as the process-wide logger on first call.
///
/// Records from every test in the binary land in the same capture, so
/// assertions should look for messages unique to the test.
pub fn capture_logs() -> &'static LogCapture {
    let capture = CAPTURE.get_or_init(LogCapture::default);
    INSTALL.call_once(|| {
        if log::set_logger(capture).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
    capture
}
