//! Memory-profiling events and sinks.
//!
//! Every arena create/clear/drop, block allocation/release, push, and
//! temporary-memory begin/end can be reported to a [`MemoryProfiler`]. The
//! profiler is dependency-injected: an arena holds an optional `Arc` to a
//! sink, and with no sink attached the hooks cost one `Option` check. There
//! is no process-wide profiler state, so tests run isolated instances.

use std::fmt;

use indexmap::IndexMap;
use parking_lot::Mutex;

/// Which push path produced an allocation event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushKind {
    /// Bump allocation with possibly stale contents.
    Uninitialized,
    /// Bump allocation with the garbage span cleared.
    Zeroed,
    /// String copy into arena bytes.
    StringCopy,
    /// Typed node slot carved for a container.
    Node,
}

/// One memory event, reported at the moment it happens.
///
/// Arena names are borrowed for the duration of the call; sinks that keep
/// history copy what they need.
#[derive(Clone, Copy, Debug)]
pub enum MemoryEvent<'a> {
    /// A new arena came into existence.
    ArenaCreated {
        /// Name of the arena (or `"<anonymous>"`).
        arena: &'a str,
        /// Name of the master arena for sub-arenas.
        master: Option<&'a str>,
        /// Capacity of the first block in bytes.
        initial_bytes: usize,
    },
    /// An arena was cleared back to one empty block.
    ArenaCleared {
        /// Name of the arena.
        arena: &'a str,
    },
    /// An arena released all of its blocks.
    ArenaDropped {
        /// Name of the arena.
        arena: &'a str,
    },
    /// The arena grew by one block.
    BlockAllocated {
        /// Name of the arena.
        arena: &'a str,
        /// Capacity of the new block in bytes.
        bytes: usize,
    },
    /// A block was released back to the page source.
    BlockReleased {
        /// Name of the arena.
        arena: &'a str,
        /// Capacity of the released block in bytes.
        bytes: usize,
    },
    /// Bytes were bump-allocated.
    Push {
        /// Name of the arena.
        arena: &'a str,
        /// Size of the allocation in bytes.
        bytes: usize,
        /// Which push path was taken.
        kind: PushKind,
    },
    /// A temporary-memory scope opened.
    TempBegin {
        /// Name of the arena.
        arena: &'a str,
        /// Nesting depth after the begin.
        depth: u32,
    },
    /// A temporary-memory scope closed and rolled back.
    TempEnd {
        /// Name of the arena.
        arena: &'a str,
        /// Nesting depth before the end.
        depth: u32,
    },
}

/// A sink for [`MemoryEvent`]s.
///
/// Implementations must be cheap and non-blocking where possible; `record`
/// is called inside the arena's allocation paths. `Send + Sync` because
/// arenas owned by different threads may share one sink.
pub trait MemoryProfiler: Send + Sync {
    /// Report one event.
    fn record(&self, event: MemoryEvent<'_>);
}

/// Aggregated counters for one arena.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Total bytes handed out by push calls.
    pub pushed_bytes: usize,
    /// Number of push calls.
    pub push_count: usize,
    /// Blocks currently allocated.
    pub live_blocks: usize,
    /// Highest number of simultaneously allocated blocks.
    pub peak_blocks: usize,
    /// Temporary-memory scopes opened.
    pub temp_scopes: usize,
    /// Times the arena was cleared.
    pub clears: usize,
}

/// A [`MemoryProfiler`] that aggregates per-arena counters.
///
/// Arenas are keyed by name in creation order. Snapshots are copies, safe to
/// inspect while the arenas keep running.
#[derive(Default)]
pub struct StatsProfiler {
    arenas: Mutex<IndexMap<String, ArenaStats>>,
}

impl StatsProfiler {
    /// Create an empty profiler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for one arena by name, if it ever reported an event.
    #[must_use]
    pub fn stats(&self, arena: &str) -> Option<ArenaStats> {
        self.arenas.lock().get(arena).copied()
    }

    /// All per-arena counters in creation order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, ArenaStats)> {
        self.arenas
            .lock()
            .iter()
            .map(|(name, stats)| (name.clone(), *stats))
            .collect()
    }

    fn with_arena(&self, arena: &str, f: impl FnOnce(&mut ArenaStats)) {
        let mut arenas = self.arenas.lock();
        let stats = arenas.entry(arena.to_owned()).or_default();
        f(stats);
    }
}

impl MemoryProfiler for StatsProfiler {
    fn record(&self, event: MemoryEvent<'_>) {
        match event {
            MemoryEvent::ArenaCreated { arena, .. } => self.with_arena(arena, |s| {
                s.live_blocks += 1;
                s.peak_blocks = s.peak_blocks.max(s.live_blocks);
            }),
            MemoryEvent::ArenaCleared { arena } => self.with_arena(arena, |s| s.clears += 1),
            MemoryEvent::ArenaDropped { arena } => self.with_arena(arena, |s| s.live_blocks = 0),
            MemoryEvent::BlockAllocated { arena, .. } => self.with_arena(arena, |s| {
                s.live_blocks += 1;
                s.peak_blocks = s.peak_blocks.max(s.live_blocks);
            }),
            MemoryEvent::BlockReleased { arena, .. } => self.with_arena(arena, |s| {
                s.live_blocks = s.live_blocks.saturating_sub(1);
            }),
            MemoryEvent::Push { arena, bytes, .. } => self.with_arena(arena, |s| {
                s.pushed_bytes += bytes;
                s.push_count += 1;
            }),
            MemoryEvent::TempBegin { arena, .. } => {
                self.with_arena(arena, |s| s.temp_scopes += 1);
            }
            MemoryEvent::TempEnd { .. } => {}
        }
    }
}

impl fmt::Debug for StatsProfiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatsProfiler")
            .field("arenas", &self.arenas.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_events_accumulate() {
        let profiler = StatsProfiler::new();
        profiler.record(MemoryEvent::ArenaCreated {
            arena: "a",
            master: None,
            initial_bytes: 4096,
        });
        profiler.record(MemoryEvent::Push {
            arena: "a",
            bytes: 16,
            kind: PushKind::Uninitialized,
        });
        profiler.record(MemoryEvent::Push {
            arena: "a",
            bytes: 48,
            kind: PushKind::Zeroed,
        });

        let stats = profiler.stats("a").unwrap();
        assert_eq!(stats.pushed_bytes, 64);
        assert_eq!(stats.push_count, 2);
        assert_eq!(stats.live_blocks, 1);
    }

    #[test]
    fn block_counters_track_growth_and_release() {
        let profiler = StatsProfiler::new();
        profiler.record(MemoryEvent::ArenaCreated {
            arena: "a",
            master: None,
            initial_bytes: 4096,
        });
        profiler.record(MemoryEvent::BlockAllocated {
            arena: "a",
            bytes: 4096,
        });
        profiler.record(MemoryEvent::BlockAllocated {
            arena: "a",
            bytes: 4096,
        });
        profiler.record(MemoryEvent::BlockReleased {
            arena: "a",
            bytes: 4096,
        });

        let stats = profiler.stats("a").unwrap();
        assert_eq!(stats.live_blocks, 2);
        assert_eq!(stats.peak_blocks, 3);
    }

    #[test]
    fn snapshot_preserves_creation_order() {
        let profiler = StatsProfiler::new();
        for name in ["world", "jobs", "scratch"] {
            profiler.record(MemoryEvent::ArenaCreated {
                arena: name,
                master: None,
                initial_bytes: 4096,
            });
        }
        let names: Vec<_> = profiler
            .snapshot()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, ["world", "jobs", "scratch"]);
    }

    #[test]
    fn independent_instances_do_not_share_state() {
        let a = StatsProfiler::new();
        let b = StatsProfiler::new();
        a.record(MemoryEvent::Push {
            arena: "only-in-a",
            bytes: 8,
            kind: PushKind::Uninitialized,
        });
        assert!(a.stats("only-in-a").is_some());
        assert!(b.stats("only-in-a").is_none());
    }
}
