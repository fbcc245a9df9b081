//! Host platform capabilities consumed by the template functions.
//!
//! The evaluator never touches the platform directly: files, the file picker
//! and the wall clock are reached through the traits defined here so that
//! callers can plug in the desktop implementations and tests can pin them.

pub mod fs;

pub use fs::{BaseDirectory, FileSystem, LocalFileSystem};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Interactive file selection.
#[async_trait]
pub trait FilePicker: Send + Sync {
    /// Asks the user to pick a file. `None` means the dialog was cancelled.
    async fn pick_file(&self, title: &str) -> Option<String>;
}

/// File picker for headless contexts; always reports cancellation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFilePicker;

#[async_trait]
impl FilePicker for NoFilePicker {
    async fn pick_file(&self, _title: &str) -> Option<String> {
        None
    }
}

/// File picker that always returns the same path.
#[derive(Debug, Clone, Default)]
pub struct StaticFilePicker {
    pub path: Option<String>,
}

impl StaticFilePicker {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

#[async_trait]
impl FilePicker for StaticFilePicker {
    async fn pick_file(&self, _title: &str) -> Option<String> {
        self.path.clone()
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current Unix time in whole seconds.
    fn unix_seconds(&self) -> i64 {
        self.now().timestamp()
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Creates a clock frozen at the given Unix second.
    pub fn from_unix(seconds: i64) -> Self {
        Self(DateTime::from_timestamp(seconds, 0).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
