//! Test doubles for the update subsystem's seams

use chrono::{DateTime, TimeDelta, Utc};
use lu_update::{Clock, Release, ReleaseSource, SwapFs, UpdateError};
use std::cell::Cell;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::builders::ReleaseBuilder;

/// Release source that counts lookups
pub struct CountingSource {
    tag: String,
    fail: bool,
    calls: AtomicUsize,
}

impl CountingSource {
    pub fn returning(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            tag: String::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ReleaseSource for CountingSource {
    async fn latest(&self) -> lu_update::Result<Release> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(UpdateError::HttpStatus {
                url: "https://api.github.com/repos/lu-hut/lu-hut/releases/latest".to_string(),
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        Ok(ReleaseBuilder::new().tag(&self.tag).build())
    }
}

/// Release source that answers only after a delay
pub struct SlowSource {
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowSource {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ReleaseSource for SlowSource {
    async fn latest(&self) -> lu_update::Result<Release> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(ReleaseBuilder::new().build())
    }
}

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn starting_at(rfc3339: &str) -> Self {
        let now = DateTime::parse_from_rfc3339(rfc3339)
            .expect("valid timestamp")
            .with_timezone(&Utc);
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap();
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Filesystem that fails selected rename calls (1-based) and optionally removals
pub struct FaultyFs {
    failing_renames: Vec<usize>,
    fail_remove: bool,
    renames: Cell<usize>,
}

impl FaultyFs {
    pub fn failing_renames(calls: &[usize]) -> Self {
        Self {
            failing_renames: calls.to_vec(),
            fail_remove: false,
            renames: Cell::new(0),
        }
    }

    pub fn failing_remove() -> Self {
        Self {
            failing_renames: Vec::new(),
            fail_remove: true,
            renames: Cell::new(0),
        }
    }

    pub fn rename_calls(&self) -> usize {
        self.renames.get()
    }
}

impl SwapFs for FaultyFs {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let call = self.renames.get() + 1;
        self.renames.set(call);
        if self.failing_renames.contains(&call) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected failure on rename #{call}"),
            ));
        }
        std::fs::rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        if self.fail_remove {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "injected failure on remove",
            ));
        }
        std::fs::remove_file(path)
    }
}
