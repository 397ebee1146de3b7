// The event contract: a unit of deferred work with a three-hook lifecycle.
//
// Event authors implement `Event` on their own payload structs. The
// simulation is the only caller of the hooks, and it always calls them in
// this order for each fire:
//
//   precondition ──true──▶ execute ──▶ cleanup ──▶ back to the pool
//        │                                ▲
//        └──────────false─────────────────┘
//
// Per-instance state machine: Pooled → Scheduled → {Discarded | Executed}
// → Pooled. An instance is owned by the simulation (queue slab or pool free
// list) the whole time; callers only ever hold the `&mut T` returned by
// `Simulation::schedule`, and only until they give control back.
//
// `ErasedEvent` is the object-safe adapter the queue and pool store. It is
// blanket-implemented for every `T: Event`, so authors never see it.
//
// See also: `sim.rs` for the drain loop that drives the hooks, `pool.rs` for
// recycling, `queue.rs` for ordering.

use crate::sim::Simulation;
use crate::types::EventKind;
use std::any::Any;

/// A schedulable unit of deferred work.
///
/// `Default` is how the pool constructs a fresh instance on a miss. Recycled
/// instances are *not* reset to `Default`: they keep whatever `cleanup` left
/// behind, so callers must populate every field the hooks read.
///
/// ```
/// use deferred_sim::{Event, Simulation};
///
/// #[derive(Default)]
/// struct Counter {
///     hits: u32,
/// }
///
/// #[derive(Default)]
/// struct Bump {
///     amount: u32,
/// }
///
/// impl Event for Bump {
///     fn execute(&mut self, sim: &mut Simulation) {
///         sim.model::<Counter>().hits += self.amount;
///     }
/// }
///
/// let mut sim = Simulation::new();
/// sim.schedule::<Bump>(3).amount = 2;
/// sim.advance(3);
/// assert_eq!(sim.model::<Counter>().hits, 2);
/// ```
pub trait Event: Default + 'static {
    /// Gate evaluated at fire time. Returning `false` discards the event
    /// silently: `execute` is skipped, `cleanup` still runs.
    ///
    /// This is also the only cancellation mechanism. An event whose target
    /// has gone away should notice here and bail.
    fn precondition(&self, _sim: &Simulation) -> bool {
        true
    }

    /// Perform the event's effect. May read and mutate models and schedule
    /// further events, including another instance of `Self`.
    fn execute(&mut self, sim: &mut Simulation);

    /// Drop references held by the payload so a pooled instance does not
    /// keep unrelated state alive between uses. Runs exactly once per fire.
    fn cleanup(&mut self) {}
}

/// Object-safe view of an `Event`, stored by the queue and the pool.
pub(crate) trait ErasedEvent {
    fn kind(&self) -> EventKind;
    fn precondition(&self, sim: &Simulation) -> bool;
    fn execute(&mut self, sim: &mut Simulation);
    fn cleanup(&mut self);
    fn as_any_mut(&mut self) -> &mut (dyn Any + 'static);
}

impl<T: Event> ErasedEvent for T {
    fn kind(&self) -> EventKind {
        EventKind::of::<T>()
    }

    fn precondition(&self, sim: &Simulation) -> bool {
        Event::precondition(self, sim)
    }

    fn execute(&mut self, sim: &mut Simulation) {
        Event::execute(self, sim);
    }

    fn cleanup(&mut self) {
        Event::cleanup(self);
    }

    fn as_any_mut(&mut self) -> &mut (dyn Any + 'static) {
        self
    }
}

/// Recover the concrete type behind an erased event.
///
/// A mismatch means the pool handed out an instance under the wrong kind,
/// which is unrecoverable.
pub(crate) fn downcast_mut<T: Event>(event: &mut dyn ErasedEvent) -> &mut T {
    let kind = event.kind();
    match event.as_any_mut().downcast_mut::<T>() {
        Some(concrete) => concrete,
        None => panic!(
            "event storage corrupted: expected {}, found {kind}",
            EventKind::of::<T>()
        ),
    }
}
