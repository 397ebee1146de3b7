// Per-kind free lists of event instances.
//
// High-frequency events (audio cues, damage numbers, regen ticks) would
// otherwise allocate a fresh box per schedule. The pool keeps released
// instances keyed by `EventKind` and hands them back on the next
// `obtain::<T>()`. A miss allocates `T::default()`, so the pool can never run
// dry; the only failure mode is growth, which `max_idle_per_kind` bounds on
// the release side.
//
// Recycled instances are returned as-is. Whatever `cleanup` left in the
// fields is still there; the scheduling caller overwrites what it needs.
//
// Ownership makes aliasing structural: an instance is either boxed in one
// free list, boxed in one queue slot, or held by the drain loop while its
// hooks run. Never two at once.

use crate::event::{ErasedEvent, Event};
use crate::types::EventKind;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Allocation telemetry for one event kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Instances constructed with `Default` (misses plus prewarming).
    pub allocated: u64,
    /// `obtain` calls served from the free list.
    pub recycled: u64,
    /// Releases dropped because the free list was at its cap.
    pub dropped: u64,
    /// Instances currently idle in the free list.
    pub idle: usize,
}

#[derive(Default)]
struct FreeList {
    idle: SmallVec<[Box<dyn ErasedEvent>; 4]>,
    stats: PoolStats,
}

pub(crate) struct EventPool {
    lists: FxHashMap<EventKind, FreeList>,
    max_idle_per_kind: Option<usize>,
}

impl EventPool {
    pub(crate) fn new(max_idle_per_kind: Option<usize>) -> Self {
        Self {
            lists: FxHashMap::default(),
            max_idle_per_kind,
        }
    }

    /// Take a recycled `T`, or allocate one.
    pub(crate) fn obtain<T: Event>(&mut self) -> Box<dyn ErasedEvent> {
        let list = self.lists.entry(EventKind::of::<T>()).or_default();
        match list.idle.pop() {
            Some(instance) => {
                list.stats.recycled += 1;
                list.stats.idle = list.idle.len();
                instance
            }
            None => {
                list.stats.allocated += 1;
                Box::new(T::default())
            }
        }
    }

    /// Return a cleaned-up instance to its kind's free list.
    pub(crate) fn release(&mut self, instance: Box<dyn ErasedEvent>) {
        let list = self.lists.entry(instance.kind()).or_default();
        if self
            .max_idle_per_kind
            .is_some_and(|cap| list.idle.len() >= cap)
        {
            list.stats.dropped += 1;
            return;
        }
        list.idle.push(instance);
        list.stats.idle = list.idle.len();
    }

    /// Pre-allocate up to `count` idle instances of `T` (respecting the cap).
    pub(crate) fn prewarm<T: Event>(&mut self, count: usize) {
        let cap = self.max_idle_per_kind.unwrap_or(usize::MAX);
        let list = self.lists.entry(EventKind::of::<T>()).or_default();
        while list.idle.len() < cap && list.idle.len() < count {
            list.idle.push(Box::new(T::default()));
            list.stats.allocated += 1;
        }
        list.stats.idle = list.idle.len();
    }

    pub(crate) fn stats(&self, kind: EventKind) -> PoolStats {
        self.lists
            .get(&kind)
            .map(|list| list.stats)
            .unwrap_or_default()
    }

    /// Total idle instances across all kinds.
    pub(crate) fn idle_total(&self) -> usize {
        self.lists.values().map(|list| list.idle.len()).sum()
    }
}
