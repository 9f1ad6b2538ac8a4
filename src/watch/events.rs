//! Watch events, batching, and configuration.

use crate::config::WatchSettings;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::warn;

/// Watch mode configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// Sketches root being watched
    pub root: PathBuf,
    /// Debounce window in milliseconds
    pub debounce_ms: u64,
    /// Batch window in milliseconds
    pub batch_window_ms: u64,
    /// Maximum events per batch
    pub max_batch_size: usize,
    /// Ignore patterns (glob patterns)
    pub ignore_patterns: Vec<String>,
}

impl WatchConfig {
    pub fn from_settings(root: impl Into<PathBuf>, settings: &WatchSettings) -> Self {
        Self {
            root: root.into(),
            debounce_ms: settings.debounce_ms,
            batch_window_ms: settings.batch_window_ms,
            max_batch_size: settings.max_batch_size.max(1),
            ignore_patterns: settings.ignore_patterns.clone(),
        }
    }
}

/// Filesystem change event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeEvent {
    Created(PathBuf),
    Modified(PathBuf),
    Removed(PathBuf),
    Renamed { from: PathBuf, to: PathBuf },
}

impl ChangeEvent {
    /// Path the event is keyed by (the destination for renames)
    pub fn path(&self) -> &Path {
        match self {
            ChangeEvent::Created(p) | ChangeEvent::Modified(p) | ChangeEvent::Removed(p) => p,
            ChangeEvent::Renamed { to, .. } => to,
        }
    }

    /// Every path touched by the event
    pub fn paths(&self) -> Vec<&Path> {
        match self {
            ChangeEvent::Renamed { from, to } => vec![from.as_path(), to.as_path()],
            other => vec![other.path()],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ChangeEvent::Created(_) => "created",
            ChangeEvent::Modified(_) => "modified",
            ChangeEvent::Removed(_) => "removed",
            ChangeEvent::Renamed { .. } => "renamed",
        }
    }
}

/// Coalesces events per path until a batch is taken.
///
/// Repeated events for one path inside the debounce window replace the
/// pending one instead of counting towards the batch size.
pub(crate) struct EventBatcher {
    config: WatchConfig,
    ignore: GlobSet,
    pending_events: HashMap<PathBuf, ChangeEvent>,
    last_event_time: HashMap<PathBuf, Instant>,
}

impl EventBatcher {
    pub(crate) fn new(config: WatchConfig) -> Self {
        Self {
            ignore: build_ignore_set(&config.ignore_patterns),
            config,
            pending_events: HashMap::new(),
            last_event_time: HashMap::new(),
        }
    }

    /// Queue an event. Returns true once the batch is full.
    pub(crate) fn add_event(&mut self, event: ChangeEvent) -> bool {
        let path = event.path().to_path_buf();
        if self.should_ignore(&path) {
            return false;
        }

        let now = Instant::now();
        let debounce_window = Duration::from_millis(self.config.debounce_ms);
        let debounced = self
            .last_event_time
            .get(&path)
            .map(|last| now.duration_since(*last) < debounce_window)
            .unwrap_or(false);

        self.pending_events.insert(path.clone(), event);
        if debounced {
            return false;
        }
        self.last_event_time.insert(path, now);

        self.pending_events.len() >= self.config.max_batch_size
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pending_events.is_empty()
    }

    /// Drain pending events, ordered by path
    pub(crate) fn take_batch(&mut self) -> Vec<ChangeEvent> {
        let mut events: Vec<_> = self.pending_events.drain().map(|(_, e)| e).collect();
        events.sort_by(|a, b| a.path().cmp(b.path()));
        self.last_event_time.clear();
        events
    }

    fn should_ignore(&self, path: &Path) -> bool {
        self.ignore.is_match(path.to_string_lossy().replace('\\', "/"))
    }
}

/// Compile ignore patterns; `*` stays within one path segment, `**` spans
/// segments. Invalid patterns are skipped with a warning.
pub(crate) fn build_ignore_set(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match GlobBuilder::new(&pattern.replace('\\', "/"))
            .literal_separator(true)
            .build()
        {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => warn!(pattern = %pattern, error = %e, "Skipping invalid ignore pattern"),
        }
    }
    builder.build().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to compile ignore patterns; nothing will be ignored");
        GlobSet::empty()
    })
}
