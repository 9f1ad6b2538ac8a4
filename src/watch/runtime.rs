//! Watch daemon and runtime logic.

use super::events::{ChangeEvent, EventBatcher, WatchConfig};
use crate::concurrency::SharedIndex;
use crate::error::ApiError;
use crate::index::SketchIndex;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Outcome of one watch-triggered rebuild
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RebuildReport {
    /// Generation of the index published by this rebuild
    pub generation: u64,
    pub event_count: usize,
    /// Names of sketches owning a changed path, before or after the rebuild
    pub affected_sketches: Vec<String>,
}

/// Callback invoked after every rebuild
pub type RebuildCallback = Arc<dyn Fn(&RebuildReport) + Send + Sync>;

/// Watch mode daemon
pub struct WatchDaemon {
    shared: Arc<SharedIndex>,
    config: WatchConfig,
    running: Arc<RwLock<bool>>,
    on_rebuild: Option<RebuildCallback>,
}

impl WatchDaemon {
    pub fn new(shared: Arc<SharedIndex>, config: WatchConfig) -> Self {
        Self {
            shared,
            config,
            running: Arc::new(RwLock::new(false)),
            on_rebuild: None,
        }
    }

    /// Register the rebuild callback, replacing any previous one
    pub fn with_on_rebuild<F>(mut self, callback: F) -> Self
    where
        F: Fn(&RebuildReport) + Send + Sync + 'static,
    {
        self.on_rebuild = Some(Arc::new(callback));
        self
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        *self.running.read()
    }

    /// Handle that stops the daemon from another thread
    pub fn stop_handle(&self) -> Arc<RwLock<bool>> {
        Arc::clone(&self.running)
    }

    /// Watch the sketches root until stopped. Blocks the calling thread.
    pub fn start(&self) -> Result<(), ApiError> {
        *self.running.write() = true;

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            if let Err(e) = tx.send(res) {
                error!("Error sending watch event: {}", e);
            }
        })
        .map_err(|e| ApiError::Watch(format!("Failed to create watcher: {}", e)))?;

        watcher
            .watch(&self.config.root, RecursiveMode::Recursive)
            .map_err(|e| {
                ApiError::Watch(format!(
                    "Failed to watch directory {:?}: {}",
                    self.config.root, e
                ))
            })?;

        info!(root = ?self.config.root, "Watching sketches");

        let mut batcher = EventBatcher::new(self.config.clone());
        let batch_window = Duration::from_millis(self.config.batch_window_ms);
        let mut last_batch_time = Instant::now();

        while self.is_running() {
            let timeout = batch_window
                .saturating_sub(last_batch_time.elapsed())
                .max(Duration::from_millis(1));
            match rx.recv_timeout(timeout) {
                Ok(Ok(event)) => {
                    for change in convert_event(event) {
                        if batcher.add_event(change) {
                            self.process_events(batcher.take_batch());
                            last_batch_time = Instant::now();
                        }
                    }
                }
                Ok(Err(e)) => {
                    warn!("Watch error: {}", e);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    error!("Watcher channel disconnected");
                    break;
                }
            }

            if last_batch_time.elapsed() >= batch_window {
                if !batcher.is_empty() {
                    self.process_events(batcher.take_batch());
                }
                last_batch_time = Instant::now();
            }
        }

        *self.running.write() = false;
        info!(root = ?self.config.root, "Stopped watching sketches");
        Ok(())
    }

    /// Ask the watch loop to exit after its current iteration
    pub fn stop(&self) {
        *self.running.write() = false;
    }

    /// Rebuild the shared index for a batch and notify the callback
    pub(crate) fn process_events(&self, events: Vec<ChangeEvent>) -> Option<RebuildReport> {
        if events.is_empty() {
            return None;
        }

        for event in &events {
            debug!(kind = event.kind(), path = ?event.path(), "Sketch file changed");
        }

        let outcome = self.shared.rebuild();
        let report = RebuildReport {
            generation: outcome.generation,
            event_count: events.len(),
            affected_sketches: affected_sketches(&events, &outcome.previous, &outcome.next),
        };

        info!(
            event_count = report.event_count,
            generation = report.generation,
            affected = ?report.affected_sketches,
            "Processed change events"
        );

        if let Some(callback) = &self.on_rebuild {
            callback(&report);
        }
        Some(report)
    }
}

/// Sketch names owning any path of `events` in either snapshot, sorted
pub(crate) fn affected_sketches(
    events: &[ChangeEvent],
    previous: &SketchIndex,
    next: &SketchIndex,
) -> Vec<String> {
    let mut names = BTreeSet::new();
    for path in events.iter().flat_map(|event| event.paths()) {
        for index in [previous, next] {
            if let Some(sketch) = index.sketch_for_fs_path(path) {
                names.insert(sketch.sketch_name.clone());
            }
        }
    }
    names.into_iter().collect()
}

fn convert_event(event: Event) -> Vec<ChangeEvent> {
    let Event { kind, paths, .. } = event;
    match kind {
        EventKind::Create(_) => paths.into_iter().map(ChangeEvent::Created).collect(),
        EventKind::Modify(notify::event::ModifyKind::Name(_)) if paths.len() >= 2 => {
            let mut paths = paths.into_iter();
            match (paths.next(), paths.next()) {
                (Some(from), Some(to)) => vec![ChangeEvent::Renamed { from, to }],
                _ => Vec::new(),
            }
        }
        EventKind::Modify(_) => paths.into_iter().map(ChangeEvent::Modified).collect(),
        EventKind::Remove(_) => paths.into_iter().map(ChangeEvent::Removed).collect(),
        _ => Vec::new(),
    }
}
