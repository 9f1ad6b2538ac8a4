//! Shared index publication
//!
//! Request handlers read the current `SketchIndex` snapshot without blocking
//! on rebuilds: a rebuild constructs a complete new index off to the side and
//! publishes it with a single pointer swap. Readers holding the previous
//! snapshot keep a consistent view until they drop it. Rebuilds themselves
//! are serialized.

use crate::index::{IndexOptions, SketchIndex};
use crate::sketch::config::SketchConfigLoader;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Snapshots on either side of one rebuild
#[derive(Debug, Clone)]
pub struct RebuildOutcome {
    pub previous: Arc<SketchIndex>,
    pub next: Arc<SketchIndex>,
    /// Generation number `next` was published under
    pub generation: u64,
}

/// Process-wide handle to the current sketch index
pub struct SharedIndex {
    /// Current snapshot; the lock is held only long enough to clone or swap the Arc
    current: RwLock<Arc<SketchIndex>>,
    rebuild_lock: Mutex<()>,
    generation: AtomicU64,
    options: IndexOptions,
    loader: Arc<dyn SketchConfigLoader>,
}

impl SharedIndex {
    /// Build the initial index and wrap it
    pub fn build(options: IndexOptions, loader: Arc<dyn SketchConfigLoader>) -> Self {
        let index = SketchIndex::build(options.clone(), loader.as_ref());
        Self {
            current: RwLock::new(Arc::new(index)),
            rebuild_lock: Mutex::new(()),
            generation: AtomicU64::new(1),
            options,
            loader,
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<SketchIndex> {
        self.current.read().clone()
    }

    /// Number of indexes published so far, starting at 1
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Rebuild from disk and publish the result.
    ///
    /// Concurrent callers queue behind each other; readers are never blocked
    /// by the walk itself. The returned generation is the one assigned to
    /// this publication, even if another rebuild completes right after.
    pub fn rebuild(&self) -> RebuildOutcome {
        let _guard = self.rebuild_lock.lock();
        let next = Arc::new(SketchIndex::build(
            self.options.clone(),
            self.loader.as_ref(),
        ));
        let previous = std::mem::replace(&mut *self.current.write(), Arc::clone(&next));
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            generation,
            sketches = next.tables().sketches.len(),
            "Published rebuilt sketch index"
        );
        RebuildOutcome {
            previous,
            next,
            generation,
        }
    }
}
