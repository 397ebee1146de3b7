// Time-ordered queue of pending work.
//
// Pending payloads live in a slab; ordering lives in a `BinaryHeap` of small
// `QueueEntry` keys `(fire_tick, sequence)`. Keeping payloads out of the heap
// lets the caller get a `&mut P` back after insertion (the scheduler hands
// that out as the typed event handle) without fighting the heap's ownership.
//
// Slab slots are reused. A `Slot` handle carries the insertion sequence as a
// generation, so a stale handle to a reused slot resolves to `None` instead
// of aliasing the new occupant.
//
// ## Due rule
//
// An entry is due at `now` iff `fire_tick <= now && scheduled_at < now`.
// The second half is what makes zero-delay scheduling defer to the *next*
// advance: work inserted at clock `t` (including work inserted while a drain
// at `t` is running) is never due at `t`. Because the clock only moves
// forward, a lower `scheduled_at` always means a lower `sequence`, so among
// equal fire ticks the due entries sort ahead of the not-yet-due ones and
// the drain can stop at the first entry that is not due.
//
// The rule has no later tick to offer once the clock is at `Tick::MAX`:
// entries inserted then are never due.
//
// **Critical constraint: determinism.** The `(fire_tick, sequence)` key is a
// total order; equal fire ticks come out in insertion order.

use crate::types::Tick;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

// ---------------------------------------------------------------------------
// Heap entries
// ---------------------------------------------------------------------------

/// Ordering key for one pending payload.
#[derive(Clone, Copy, Debug)]
pub struct QueueEntry {
    /// The tick at which this entry becomes eligible.
    pub fire_tick: Tick,
    /// Monotonic insertion counter for deterministic tiebreaking within a
    /// tick. Lower values are processed first.
    pub sequence: u64,
    /// Clock value when the entry was inserted.
    pub scheduled_at: Tick,
    slot: usize,
}

impl QueueEntry {
    fn is_due(&self, now: Tick) -> bool {
        self.fire_tick <= now && self.scheduled_at < now
    }
}

// We want a min-heap: lowest (fire_tick, sequence) pops first.
// Rust's BinaryHeap is a max-heap, so we reverse the ordering.
impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_tick == other.fire_tick && self.sequence == other.sequence
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_tick
            .cmp(&self.fire_tick)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Handle to a pending payload, valid until that payload is popped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    index: usize,
    sequence: u64,
}

impl Slot {
    /// The insertion sequence of the payload this handle refers to.
    pub fn sequence(self) -> u64 {
        self.sequence
    }
}

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

/// Min-ordered queue of payloads keyed by fire tick, ties broken by
/// insertion order.
#[derive(Debug)]
pub struct EventQueue<P> {
    heap: BinaryHeap<QueueEntry>,
    /// Occupied slots hold `(sequence, payload)`.
    slots: Vec<Option<(u64, P)>>,
    free_slots: Vec<usize>,
    next_sequence: u64,
}

impl<P> Default for EventQueue<P> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            slots: Vec::new(),
            free_slots: Vec::new(),
            next_sequence: 0,
        }
    }
}

impl<P> EventQueue<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a payload that becomes eligible at `fire_tick`. `scheduled_at`
    /// is the caller's current clock and must never decrease across calls.
    pub fn insert(&mut self, fire_tick: Tick, scheduled_at: Tick, payload: P) -> Slot {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let index = match self.free_slots.pop() {
            Some(index) => {
                self.slots[index] = Some((sequence, payload));
                index
            }
            None => {
                self.slots.push(Some((sequence, payload)));
                self.slots.len() - 1
            }
        };

        self.heap.push(QueueEntry {
            fire_tick,
            sequence,
            scheduled_at,
            slot: index,
        });
        Slot { index, sequence }
    }

    /// Borrow a pending payload. `None` once it has been popped.
    pub fn get(&self, slot: Slot) -> Option<&P> {
        match self.slots.get(slot.index)? {
            Some((seq, payload)) if *seq == slot.sequence => Some(payload),
            _ => None,
        }
    }

    /// Mutably borrow a pending payload. `None` once it has been popped.
    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut P> {
        match self.slots.get_mut(slot.index)? {
            Some((seq, payload)) if *seq == slot.sequence => Some(payload),
            _ => None,
        }
    }

    /// Fire tick of the earliest pending entry.
    pub fn peek_tick(&self) -> Option<Tick> {
        self.heap.peek().map(|e| e.fire_tick)
    }

    /// Pop the earliest entry if it is due at `now`.
    pub fn pop_due(&mut self, now: Tick) -> Option<(QueueEntry, P)> {
        if !self.heap.peek().is_some_and(|e| e.is_due(now)) {
            return None;
        }
        let entry = self.heap.pop()?;
        Some((entry, self.take_slot(entry)))
    }

    /// Pop every entry due at `now`, in order.
    ///
    /// Payloads inserted after this returns are not included even if their
    /// fire tick is `<= now`; see the due rule above.
    pub fn drain_due(&mut self, now: Tick) -> SmallVec<[(QueueEntry, P); 8]> {
        let mut due = SmallVec::new();
        while let Some(item) = self.pop_due(now) {
            due.push(item);
        }
        due
    }

    /// Remove every pending payload regardless of fire tick, in queue order.
    pub fn clear(&mut self) -> Vec<P> {
        let mut out = Vec::with_capacity(self.heap.len());
        while let Some(entry) = self.heap.pop() {
            out.push(self.take_slot(entry));
        }
        self.slots.clear();
        self.free_slots.clear();
        out
    }

    /// Iterate pending payloads in slab order (not fire order).
    pub fn payloads(&self) -> impl Iterator<Item = &P> {
        self.slots.iter().flatten().map(|(_, payload)| payload)
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn take_slot(&mut self, entry: QueueEntry) -> P {
        match self.slots[entry.slot].take() {
            Some((seq, payload)) if seq == entry.sequence => {
                self.free_slots.push(entry.slot);
                payload
            }
            _ => panic!(
                "queue corrupted: entry seq {} points at a slot it does not own",
                entry.sequence
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_ordering() {
        let mut queue = EventQueue::new();
        // Insert out of order.
        queue.insert(100, 0, "late");
        queue.insert(50, 0, "first-at-50");
        queue.insert(50, 0, "second-at-50");

        // Should pop in tick order, then sequence order within a tick.
        let (entry, payload) = queue.pop_due(200).unwrap();
        assert_eq!(entry.fire_tick, 50);
        assert_eq!(entry.sequence, 1);
        assert_eq!(payload, "first-at-50");

        let (entry, payload) = queue.pop_due(200).unwrap();
        assert_eq!(entry.sequence, 2);
        assert_eq!(payload, "second-at-50");

        let (entry, payload) = queue.pop_due(200).unwrap();
        assert_eq!(entry.fire_tick, 100);
        assert_eq!(payload, "late");

        assert!(queue.pop_due(200).is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn pop_due_respects_fire_tick() {
        let mut queue = EventQueue::new();
        queue.insert(100, 0, ());

        // Not ready yet.
        assert!(queue.pop_due(99).is_none());
        // Ready now.
        assert!(queue.pop_due(100).is_some());
    }

    #[test]
    fn entry_inserted_at_now_is_not_due_at_now() {
        let mut queue = EventQueue::new();
        queue.insert(7, 7, "zero-delay");

        assert!(queue.pop_due(7).is_none());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_due(8).map(|(_, p)| p), Some("zero-delay"));
    }

    #[test]
    fn earlier_scheduled_entry_at_same_tick_still_drains() {
        let mut queue = EventQueue::new();
        // Scheduled at 0 for tick 5, then a zero-delay entry at clock 5.
        queue.insert(5, 0, "from-before");
        queue.insert(5, 5, "zero-delay-at-5");

        let due: Vec<_> = queue.drain_due(5).into_iter().map(|(_, p)| p).collect();
        assert_eq!(due, vec!["from-before"]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn drain_due_is_ordered_and_stops_at_now() {
        let mut queue = EventQueue::new();
        queue.insert(5, 0, 'a');
        queue.insert(2, 0, 'b');
        queue.insert(2, 0, 'c');
        queue.insert(11, 0, 'd');

        let due: Vec<_> = queue.drain_due(10).into_iter().map(|(_, p)| p).collect();
        assert_eq!(due, vec!['b', 'c', 'a']);
        assert_eq!(queue.peek_tick(), Some(11));
    }

    #[test]
    fn get_mut_edits_pending_payload() {
        let mut queue = EventQueue::new();
        let slot = queue.insert(3, 0, 1u32);
        *queue.get_mut(slot).unwrap() += 41;
        assert_eq!(queue.get(slot), Some(&42));
        assert_eq!(queue.pop_due(3).map(|(_, p)| p), Some(42));
    }

    #[test]
    fn stale_slot_does_not_alias_reused_slot() {
        let mut queue = EventQueue::new();
        let old = queue.insert(1, 0, "old");
        queue.pop_due(1).unwrap();

        let new = queue.insert(2, 1, "new");
        assert_eq!(old.index, new.index);
        assert!(queue.get(old).is_none());
        assert_eq!(queue.get(new), Some(&"new"));
    }

    #[test]
    fn clear_returns_everything_in_order() {
        let mut queue = EventQueue::new();
        queue.insert(9, 0, 9);
        queue.insert(3, 0, 3);
        queue.insert(6, 0, 6);

        assert_eq!(queue.clear(), vec![3, 6, 9]);
        assert!(queue.is_empty());
        assert_eq!(queue.payloads().count(), 0);
    }

    #[test]
    fn payloads_lists_pending_only() {
        let mut queue = EventQueue::new();
        queue.insert(1, 0, 'x');
        queue.insert(2, 0, 'y');
        queue.pop_due(1);

        let pending: Vec<_> = queue.payloads().copied().collect();
        assert_eq!(pending, vec!['y']);
    }
}
