//! Time-gated "newer version available" notice
//!
//! At most one release lookup per interval (24h by default). The last probe
//! time lives in `~/.lu-hut/last_check`; its modification time is what counts.
//! Every failure on this path is swallowed: a failed lookup leaves the marker
//! untouched so the next run tries again, and a failed marker write is only
//! logged.

use crate::install_mode::InstallMode;
use crate::releases::ReleaseSource;
use crate::version::{current_version, is_newer_version};
use chrono::{DateTime, TimeDelta, Utc};
use owo_colors::OwoColorize;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// File name of the marker inside the state directory
pub const MARKER_FILE_NAME: &str = "last_check";

/// Default time between two release lookups
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Upper bound on the release lookup so a slow network never stalls the CLI
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of "now"
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Persistence of the last successful probe time
pub trait CheckMarker {
    /// When the last successful probe happened, if ever
    fn load(&self) -> Option<DateTime<Utc>>;

    /// Record a successful probe
    fn save(&self, at: DateTime<Utc>) -> io::Result<()>;
}

impl<T: CheckMarker + ?Sized> CheckMarker for &T {
    fn load(&self) -> Option<DateTime<Utc>> {
        (**self).load()
    }

    fn save(&self, at: DateTime<Utc>) -> io::Result<()> {
        (**self).save(at)
    }
}

/// Marker backed by a file whose mtime is the probe time
#[derive(Debug, Clone)]
pub struct FileMarker {
    path: PathBuf,
}

impl FileMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.lu-hut/last_check`, creating the directory if needed
    pub fn in_state_dir() -> lu_core::Result<Self> {
        Ok(Self::new(lu_core::state_dir()?.join(MARKER_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CheckMarker for FileMarker {
    fn load(&self) -> Option<DateTime<Utc>> {
        std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from)
    }

    fn save(&self, at: DateTime<Utc>) -> io::Result<()> {
        let mut file = File::create(&self.path)?;
        file.write_all(at.to_rfc3339().as_bytes())?;
        file.set_modified(at.into())
    }
}

/// In-memory marker
#[derive(Debug, Default)]
pub struct MemoryMarker {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl MemoryMarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(last: DateTime<Utc>) -> Self {
        Self {
            last: Mutex::new(Some(last)),
        }
    }
}

impl CheckMarker for MemoryMarker {
    fn load(&self) -> Option<DateTime<Utc>> {
        self.last.lock().ok().and_then(|last| *last)
    }

    fn save(&self, at: DateTime<Utc>) -> io::Result<()> {
        let mut last = self
            .last
            .lock()
            .map_err(|_| io::Error::other("marker lock poisoned"))?;
        *last = Some(at);
        Ok(())
    }
}

/// A newer release exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNotice {
    /// Running version
    pub current: String,

    /// Tag of the newer release
    pub latest: String,

    /// Command the user should run
    pub remediation: String,
}

impl UpdateNotice {
    /// Single advisory line
    pub fn render(&self, color: bool) -> String {
        if color {
            format!(
                "{} New version {} available (current: {}) {} run {} to upgrade",
                "⚠".yellow(),
                self.latest.cyan(),
                self.current,
                "→".yellow(),
                self.remediation.cyan()
            )
        } else {
            format!(
                "⚠ New version {} available (current: {}) → run {} to upgrade",
                self.latest, self.current, self.remediation
            )
        }
    }
}

/// Decides whether to look for a new release and what to tell the user
pub struct UpdateGate<S, M, C = SystemClock> {
    source: S,
    marker: M,
    clock: C,
    mode: InstallMode,
    current_version: String,
    interval: TimeDelta,
    probe_timeout: Duration,
    color: bool,
}

impl<S: ReleaseSource, M: CheckMarker> UpdateGate<S, M, SystemClock> {
    pub fn new(source: S, marker: M, mode: InstallMode) -> Self {
        Self {
            source,
            marker,
            clock: SystemClock,
            mode,
            current_version: current_version().to_string(),
            interval: to_delta(DEFAULT_CHECK_INTERVAL),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            color: true,
        }
    }
}

impl<S: ReleaseSource, M: CheckMarker, C: Clock> UpdateGate<S, M, C> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> UpdateGate<S, M, C2> {
        UpdateGate {
            source: self.source,
            marker: self.marker,
            clock,
            mode: self.mode,
            current_version: self.current_version,
            interval: self.interval,
            probe_timeout: self.probe_timeout,
            color: self.color,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = to_delta(interval);
        self
    }

    /// Bound the release lookup; a lookup that runs out counts as failed
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_current_version(mut self, version: impl Into<String>) -> Self {
        self.current_version = version.into();
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Whether the cool-down has elapsed at `now`
    ///
    /// A marker more than one interval in the future (clock change) counts as
    /// stale.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.marker.load() {
            Some(last) => (now - last).abs() >= self.interval,
            None => true,
        }
    }

    /// Probe for a newer release if the cool-down has elapsed
    pub async fn check(&self) -> Option<UpdateNotice> {
        let now = self.clock.now();
        if !self.is_due(now) {
            debug!("update check skipped, last probe is recent");
            return None;
        }

        let release = match tokio::time::timeout(self.probe_timeout, self.source.latest()).await {
            Ok(Ok(release)) => release,
            Ok(Err(e)) => {
                debug!(error = %e, "update check failed");
                return None;
            }
            Err(_) => {
                debug!(timeout = ?self.probe_timeout, "update check timed out");
                return None;
            }
        };

        if let Err(e) = self.marker.save(now) {
            debug!(error = %e, "failed to record update check time");
        }

        if !is_newer_version(&self.current_version, &release.tag_name) {
            debug!(latest = %release.tag_name, "already on the latest version");
            return None;
        }

        Some(UpdateNotice {
            current: self.current_version.clone(),
            latest: release.tag_name,
            remediation: self.mode.upgrade_hint(),
        })
    }

    /// Probe and print the notice to stderr, if any
    pub async fn check_and_notify(&self) {
        if let Some(notice) = self.check().await {
            eprintln!("\n{}\n", notice.render(self.color));
        }
    }
}

fn to_delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}
