// The scheduler façade: clock, pending queue, event pool, and models.
//
// `Simulation` is the one object game code talks to. Callers schedule typed
// events with a delay, fill in the returned handle, and the host loop calls
// `advance(now)` once per frame. Everything else (pooling, ordering, the
// precondition gate, cleanup) happens behind those two calls.
//
// ## Scheduling
//
// `schedule::<T>(delay)` pulls a `T` from the pool (recycled or freshly
// defaulted), stamps it with `fire_tick = now + delay` and
// `scheduled_at = now`, inserts it into the queue, and returns `&mut T`. The
// borrow ends as soon as the caller does anything else with the simulation,
// which is exactly the "populate before yielding" window events need.
//
// ## The drain loop
//
// `advance(now)` moves the clock forward and pops due events one at a time:
//
//   1. `precondition(&sim)`: evaluated now, not at schedule time.
//   2. If it passed, `execute(&mut sim)`. The event is out of the queue and
//      out of the pool while this runs, so it may freely schedule more work,
//      including another instance of its own type.
//   3. `cleanup()`, unconditionally.
//   4. Release to the pool.
//
// Popping one at a time (rather than draining a batch up front) is what lets
// an executing event see a consistent queue. Work scheduled during a drain
// at tick `t` has `scheduled_at == t`, which the queue's due rule excludes
// until a later `advance`; a zero-delay reschedule therefore waits for the
// next driver call instead of spinning inside this one.
//
// ## Models
//
// The simulation owns a `ModelRegistry`. Hooks reach models through the
// simulation they are handed: `model::<M>()` (create-on-demand, needs
// `&mut`) from `execute`, `peek_model::<M>()` (read-only, never creates) from
// `precondition`.
//
// ## Backpressure
//
// Pending count is unbounded by default. Crossing
// `config.pending_warn_threshold` logs a warning once; `try_schedule`
// enforces `config.max_pending` as a hard cap for callers that want one.
//
// See also: `event.rs` for the hook contract, `queue.rs` for the due rule,
// `pool.rs` for recycling, `model.rs` for the registry, `config.rs` for the
// tunables.
//
// **Critical constraint: single-threaded.** One driver, no locks. Hooks run
// to completion before the next due event is popped.

use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::event::{ErasedEvent, Event, downcast_mut};
use crate::model::ModelRegistry;
use crate::pool::{EventPool, PoolStats};
use crate::queue::EventQueue;
use crate::types::{EventKind, Tick};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace, warn};

/// What one `advance` call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceReport {
    /// Clock value after the call.
    pub now: Tick,
    /// Events whose precondition passed and whose `execute` ran.
    pub fired: usize,
    /// Events dropped by a failing precondition.
    pub discarded: usize,
}

impl AdvanceReport {
    /// Total events taken off the queue.
    pub fn processed(&self) -> usize {
        self.fired + self.discarded
    }
}

/// A deferred-event simulation.
pub struct Simulation {
    now: Tick,
    config: SimConfig,
    queue: EventQueue<Box<dyn ErasedEvent>>,
    pool: EventPool,
    models: ModelRegistry,
    /// Set while `advance` is popping events.
    draining: bool,
    /// Latched when the pending count crosses the warn threshold.
    pending_warned: bool,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// Create a simulation with the default config and an empty registry.
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    /// Create a simulation with the given config. The config is assumed to
    /// have been validated (see `SimConfig::validate`).
    pub fn with_config(config: SimConfig) -> Self {
        Self::with_models(config, ModelRegistry::new())
    }

    /// Create a simulation around an existing, possibly pre-seeded, model
    /// registry.
    pub fn with_models(config: SimConfig, models: ModelRegistry) -> Self {
        Self {
            now: config.start_tick,
            pool: EventPool::new(config.max_idle_per_kind),
            queue: EventQueue::new(),
            models,
            config,
            draining: false,
            pending_warned: false,
        }
    }

    /// Parse, validate, and build from a JSON config.
    pub fn from_config_json(json: &str) -> Result<Self> {
        Ok(Self::with_config(SimConfig::from_json(json)?))
    }

    /// Current simulation clock.
    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Scheduling
    // -----------------------------------------------------------------------

    /// Schedule an event of type `T` to fire `delay` ticks from now and
    /// return it for populating.
    ///
    /// The instance may be recycled: set every field the hooks read. A delay
    /// of 0 fires on the next `advance` with a strictly later `now`.
    ///
    /// Once the clock is at `Tick::MAX` there is no later `now`, so anything
    /// scheduled from then on stays pending forever.
    pub fn schedule<T: Event>(&mut self, delay: Tick) -> &mut T {
        let fire_tick = self.now.saturating_add(delay);
        let instance = self.pool.obtain::<T>();
        let slot = self.queue.insert(fire_tick, self.now, instance);
        trace!(
            kind = %EventKind::of::<T>(),
            fire_tick,
            seq = slot.sequence(),
            "event scheduled"
        );
        self.note_pending_growth();

        match self.queue.get_mut(slot) {
            Some(event) => downcast_mut::<T>(event.as_mut()),
            None => panic!("queue corrupted: slot vanished right after insert"),
        }
    }

    /// Like `schedule`, but refuses with `SimError::QueueFull` when
    /// `config.max_pending` events are already pending.
    pub fn try_schedule<T: Event>(&mut self, delay: Tick) -> Result<&mut T> {
        if let Some(limit) = self.config.max_pending {
            let pending = self.queue.len();
            if pending >= limit {
                return Err(SimError::QueueFull { pending, limit });
            }
        }
        Ok(self.schedule::<T>(delay))
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    /// Move the clock to `now` and process every due event.
    ///
    /// The clock never moves backwards: an earlier `now` is logged and
    /// ignored. Calling this from inside a hook is also ignored.
    pub fn advance(&mut self, now: Tick) -> AdvanceReport {
        let mut report = AdvanceReport {
            now: self.now,
            ..AdvanceReport::default()
        };
        if self.draining {
            warn!(now, "advance called from inside an event hook; ignored");
            return report;
        }
        if now < self.now {
            warn!(now, clock = self.now, "advance to an earlier tick ignored");
            return report;
        }

        if now == Tick::MAX && self.now < Tick::MAX {
            warn!("clock reached Tick::MAX; events scheduled from now on can never fire");
        }
        self.now = now;
        report.now = now;
        self.draining = true;

        while let Some((entry, mut event)) = self.queue.pop_due(now) {
            let kind = event.kind();
            if event.precondition(self) {
                trace!(
                    kind = %kind,
                    fire_tick = entry.fire_tick,
                    seq = entry.sequence,
                    "event fired"
                );
                event.execute(self);
                report.fired += 1;
            } else {
                trace!(
                    kind = %kind,
                    fire_tick = entry.fire_tick,
                    seq = entry.sequence,
                    "precondition failed; event discarded"
                );
                report.discarded += 1;
            }
            event.cleanup();
            self.pool.release(event);
        }

        self.draining = false;
        self.rearm_pending_warning();

        if report.processed() > 0 {
            debug!(
                now,
                fired = report.fired,
                discarded = report.discarded,
                pending = self.queue.len(),
                "advance complete"
            );
        }
        report
    }

    /// `advance(now + delta)`, for fixed-step drivers.
    pub fn advance_by(&mut self, delta: Tick) -> AdvanceReport {
        self.advance(self.now.saturating_add(delta))
    }

    // -----------------------------------------------------------------------
    // Models
    // -----------------------------------------------------------------------

    /// The shared model of type `M`, created with `Default` if absent.
    pub fn model<M: Default + 'static>(&mut self) -> &mut M {
        self.models.get_or_create::<M>()
    }

    /// Read-only model access for preconditions. Never creates.
    pub fn peek_model<M: 'static>(&self) -> Option<&M> {
        self.models.get::<M>()
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    pub fn models_mut(&mut self) -> &mut ModelRegistry {
        &mut self.models
    }

    // -----------------------------------------------------------------------
    // Telemetry
    // -----------------------------------------------------------------------

    /// Number of scheduled-but-not-yet-processed events.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Fire tick of the earliest pending event.
    pub fn next_fire_tick(&self) -> Option<Tick> {
        self.queue.peek_tick()
    }

    /// Number of pending events of type `T`.
    pub fn pending_of<T: Event>(&self) -> usize {
        let kind = EventKind::of::<T>();
        self.queue
            .payloads()
            .filter(|event| event.kind() == kind)
            .count()
    }

    /// Pool telemetry for events of type `T`.
    pub fn pool_stats<T: Event>(&self) -> PoolStats {
        self.pool.stats(EventKind::of::<T>())
    }

    /// Idle pooled instances across all kinds.
    pub fn idle_pooled(&self) -> usize {
        self.pool.idle_total()
    }

    /// Pre-allocate `count` idle instances of `T` so the first burst of
    /// schedules does not allocate.
    pub fn prewarm<T: Event>(&mut self, count: usize) {
        self.pool.prewarm::<T>(count);
    }

    // -----------------------------------------------------------------------
    // Session control
    // -----------------------------------------------------------------------

    /// Discard every pending event without firing it. Each one still gets
    /// its `cleanup` and goes back to the pool. Returns how many were
    /// discarded.
    pub fn clear_pending(&mut self) -> usize {
        let discarded = self.queue.clear();
        let count = discarded.len();
        for mut event in discarded {
            event.cleanup();
            self.pool.release(event);
        }
        self.pending_warned = false;
        if count > 0 {
            debug!(count, "pending events cleared");
        }
        count
    }

    /// Start a fresh session: clear pending events, drop all models, and
    /// rewind the clock to `config.start_tick`. Pooled instances are kept.
    pub fn reset(&mut self) {
        if self.draining {
            warn!("reset called from inside an event hook; ignored");
            return;
        }
        self.clear_pending();
        self.models.reset();
        self.now = self.config.start_tick;
    }

    fn note_pending_growth(&mut self) {
        let Some(threshold) = self.config.pending_warn_threshold else {
            return;
        };
        let pending = self.queue.len();
        if !self.pending_warned && pending >= threshold {
            warn!(
                pending,
                threshold, "pending event count crossed warn threshold"
            );
            self.pending_warned = true;
        }
    }

    fn rearm_pending_warning(&mut self) {
        if self.pending_warned
            && self
                .config
                .pending_warn_threshold
                .is_some_and(|threshold| self.queue.len() < threshold)
        {
            self.pending_warned = false;
        }
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("now", &self.now)
            .field("pending", &self.queue.len())
            .field("idle_pooled", &self.pool.idle_total())
            .field("models", &self.models)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    // -----------------------------------------------------------------------
    // Test events and models
    // -----------------------------------------------------------------------

    /// Records the order events executed in.
    #[derive(Default)]
    struct Trace {
        order: Vec<char>,
    }

    #[derive(Default, Debug)]
    struct Tagged {
        tag: char,
    }

    impl Event for Tagged {
        fn execute(&mut self, sim: &mut Simulation) {
            sim.model::<Trace>().order.push(self.tag);
        }
    }

    #[derive(Default)]
    struct Counters {
        executed: u32,
    }

    /// Gated on `open`; counts cleanups through a shared probe that
    /// `cleanup` releases.
    #[derive(Default)]
    struct Gated {
        open: bool,
        probe: Option<Rc<Cell<u32>>>,
    }

    impl Event for Gated {
        fn precondition(&self, _sim: &Simulation) -> bool {
            self.open
        }

        fn execute(&mut self, sim: &mut Simulation) {
            sim.model::<Counters>().executed += 1;
        }

        fn cleanup(&mut self) {
            if let Some(probe) = self.probe.take() {
                probe.set(probe.get() + 1);
            }
        }
    }

    #[derive(Default)]
    struct Health {
        current: u32,
        max: u32,
    }

    /// Heals `amount` per tick until full, rescheduling itself.
    #[derive(Default)]
    struct Regen {
        amount: u32,
    }

    impl Event for Regen {
        fn precondition(&self, sim: &Simulation) -> bool {
            sim.peek_model::<Health>()
                .is_some_and(|h| h.current < h.max)
        }

        fn execute(&mut self, sim: &mut Simulation) {
            let health = sim.model::<Health>();
            health.current = (health.current + self.amount).min(health.max);
            if health.current < health.max {
                sim.schedule::<Regen>(1).amount = self.amount;
            }
        }
    }

    /// Reschedules itself with zero delay forever.
    #[derive(Default)]
    struct Echo;

    impl Event for Echo {
        fn execute(&mut self, sim: &mut Simulation) {
            sim.model::<Counters>().executed += 1;
            sim.schedule::<Echo>(0);
        }
    }

    /// Tries to re-enter the driver from inside a hook.
    #[derive(Default)]
    struct Nested;

    impl Event for Nested {
        fn execute(&mut self, sim: &mut Simulation) {
            let report = sim.advance(1_000);
            sim.model::<Counters>().executed += report.processed() as u32;
        }
    }

    // -----------------------------------------------------------------------
    // Ordering
    // -----------------------------------------------------------------------

    #[test]
    fn fires_in_fire_tick_then_schedule_order() {
        let mut sim = Simulation::new();
        sim.schedule::<Tagged>(5).tag = 'A';
        sim.schedule::<Tagged>(2).tag = 'B';
        sim.schedule::<Tagged>(2).tag = 'C';

        let report = sim.advance(10);
        assert_eq!(report.fired, 3);
        assert_eq!(sim.model::<Trace>().order, vec!['B', 'C', 'A']);
        assert_eq!(sim.pending_count(), 0);
    }

    #[test]
    fn only_due_events_fire() {
        let mut sim = Simulation::new();
        sim.schedule::<Tagged>(3).tag = 'x';
        sim.schedule::<Tagged>(8).tag = 'y';

        sim.advance(5);
        assert_eq!(sim.model::<Trace>().order, vec!['x']);
        assert_eq!(sim.next_fire_tick(), Some(8));

        sim.advance(8);
        assert_eq!(sim.model::<Trace>().order, vec!['x', 'y']);
    }

    // -----------------------------------------------------------------------
    // Precondition gating
    // -----------------------------------------------------------------------

    #[test]
    fn failed_precondition_skips_execute_but_cleans_up_once() {
        let probe = Rc::new(Cell::new(0));
        let mut sim = Simulation::new();
        let event = sim.schedule::<Gated>(1);
        event.open = false;
        event.probe = Some(probe.clone());

        let report = sim.advance(1);
        assert_eq!(report.fired, 0);
        assert_eq!(report.discarded, 1);
        assert!(sim.peek_model::<Counters>().is_none());
        assert_eq!(probe.get(), 1);
        // Cleanup released the reference it held.
        assert_eq!(Rc::strong_count(&probe), 1);
        // The discarded instance went back to the pool.
        assert_eq!(sim.pool_stats::<Gated>().idle, 1);
    }

    #[test]
    fn passing_precondition_executes_and_cleans_up_once() {
        let probe = Rc::new(Cell::new(0));
        let mut sim = Simulation::new();
        let event = sim.schedule::<Gated>(1);
        event.open = true;
        event.probe = Some(probe.clone());

        sim.advance(1);
        assert_eq!(sim.model::<Counters>().executed, 1);
        assert_eq!(probe.get(), 1);
    }

    #[test]
    fn precondition_is_evaluated_at_fire_time() {
        let mut sim = Simulation::new();
        sim.models_mut().insert(Health { current: 5, max: 10 });
        sim.schedule::<Regen>(3).amount = 1;

        // Health fills up through some other path before the regen fires.
        sim.model::<Health>().current = 10;

        let report = sim.advance(3);
        assert_eq!(report.discarded, 1);
        assert_eq!(sim.pending_of::<Regen>(), 0);
    }

    // -----------------------------------------------------------------------
    // Pool reuse
    // -----------------------------------------------------------------------

    #[test]
    fn fired_instance_is_recycled_for_next_schedule() {
        let mut sim = Simulation::new();
        let first = sim.schedule::<Tagged>(1);
        first.tag = 'o';
        let first = first as *const Tagged;
        sim.advance(1);

        let second = sim.schedule::<Tagged>(1);
        // The recycled instance still carries the old tag until overwritten.
        assert_eq!(second.tag, 'o');
        second.tag = 'n';
        assert_eq!(second as *const Tagged, first);

        sim.advance(2);
        assert_eq!(sim.model::<Trace>().order, vec!['o', 'n']);
        let stats = sim.pool_stats::<Tagged>();
        assert_eq!(stats.allocated, 1);
        assert_eq!(stats.recycled, 1);
    }

    #[test]
    fn pending_instances_never_share_storage() {
        let mut sim = Simulation::new();
        let a = sim.schedule::<Tagged>(1) as *const Tagged;
        let b = sim.schedule::<Tagged>(1) as *const Tagged;
        assert_ne!(a, b);
        assert_eq!(sim.pool_stats::<Tagged>().allocated, 2);
    }

    #[test]
    fn prewarm_avoids_allocation_on_schedule() {
        let mut sim = Simulation::new();
        sim.prewarm::<Tagged>(4);
        assert_eq!(sim.idle_pooled(), 4);

        sim.schedule::<Tagged>(1).tag = 'p';
        let stats = sim.pool_stats::<Tagged>();
        assert_eq!(stats.allocated, 4);
        assert_eq!(stats.recycled, 1);
        assert_eq!(stats.idle, 3);
    }

    // -----------------------------------------------------------------------
    // Self-rescheduling
    // -----------------------------------------------------------------------

    #[test]
    fn regen_heals_to_full_then_stops() {
        let mut sim = Simulation::new();
        sim.models_mut().insert(Health { current: 8, max: 10 });
        sim.schedule::<Regen>(1).amount = 1;

        sim.advance(1);
        assert_eq!(sim.model::<Health>().current, 9);
        assert_eq!(sim.pending_of::<Regen>(), 1);

        sim.advance(2);
        assert_eq!(sim.model::<Health>().current, 10);
        assert_eq!(sim.pending_of::<Regen>(), 0);
        assert_eq!(sim.pending_count(), 0);
    }

    #[test]
    fn zero_delay_reschedule_waits_for_next_advance() {
        let mut sim = Simulation::new();
        sim.schedule::<Echo>(1);

        sim.advance(1);
        assert_eq!(sim.model::<Counters>().executed, 1);
        assert_eq!(sim.pending_of::<Echo>(), 1);

        // Same tick again: the zero-delay copy was scheduled at 1.
        sim.advance(1);
        assert_eq!(sim.model::<Counters>().executed, 1);

        sim.advance(2);
        assert_eq!(sim.model::<Counters>().executed, 2);
        assert_eq!(sim.pending_of::<Echo>(), 1);
    }

    // -----------------------------------------------------------------------
    // Zero delay and the clock
    // -----------------------------------------------------------------------

    #[test]
    fn zero_delay_does_not_fire_at_same_now() {
        let mut sim = Simulation::new();
        sim.advance(4);
        sim.schedule::<Tagged>(0).tag = 'z';

        let report = sim.advance(4);
        assert_eq!(report.processed(), 0);
        assert_eq!(sim.pending_count(), 1);

        sim.advance(5);
        assert_eq!(sim.model::<Trace>().order, vec!['z']);
    }

    #[test]
    fn clock_never_moves_backwards() {
        let mut sim = Simulation::new();
        sim.advance(10);
        sim.schedule::<Tagged>(1).tag = 'b';

        let report = sim.advance(3);
        assert_eq!(report.now, 10);
        assert_eq!(report.processed(), 0);
        assert_eq!(sim.now(), 10);
        assert_eq!(sim.next_fire_tick(), Some(11));
    }

    #[test]
    fn advance_by_steps_from_current_clock() {
        let mut sim = Simulation::new();
        sim.schedule::<Tagged>(3).tag = 's';
        sim.advance_by(2);
        assert_eq!(sim.now(), 2);
        assert!(sim.peek_model::<Trace>().is_none());

        sim.advance_by(1);
        assert_eq!(sim.now(), 3);
        assert_eq!(sim.model::<Trace>().order, vec!['s']);
    }

    #[test]
    fn huge_delay_saturates() {
        let mut sim = Simulation::new();
        sim.advance(10);
        sim.schedule::<Tagged>(Tick::MAX);
        assert_eq!(sim.next_fire_tick(), Some(Tick::MAX));
    }

    #[test]
    fn work_scheduled_at_max_tick_never_fires() {
        let mut sim = Simulation::new();
        sim.schedule::<Tagged>(Tick::MAX).tag = 'm';

        let report = sim.advance(Tick::MAX);
        assert_eq!(report.fired, 1);

        sim.schedule::<Tagged>(0).tag = 'x';
        let report = sim.advance(Tick::MAX);
        assert_eq!(report.processed(), 0);
        assert_eq!(sim.pending_count(), 1);
        assert_eq!(sim.model::<Trace>().order, vec!['m']);
    }

    #[test]
    fn nested_advance_is_ignored() {
        let mut sim = Simulation::new();
        sim.schedule::<Nested>(1);
        sim.schedule::<Tagged>(50).tag = 'l';

        sim.advance(1);
        // The nested call processed nothing and did not move the clock.
        assert_eq!(sim.model::<Counters>().executed, 0);
        assert_eq!(sim.now(), 1);
        assert_eq!(sim.pending_count(), 1);
    }

    // -----------------------------------------------------------------------
    // Backpressure
    // -----------------------------------------------------------------------

    #[test]
    fn try_schedule_enforces_max_pending() {
        let config = SimConfig {
            max_pending: Some(2),
            pending_warn_threshold: Some(2),
            ..SimConfig::default()
        };
        let mut sim = Simulation::with_config(config);
        assert!(sim.try_schedule::<Tagged>(1).is_ok());
        assert!(sim.try_schedule::<Tagged>(1).is_ok());

        let err = sim.try_schedule::<Tagged>(1).unwrap_err();
        assert!(matches!(err, SimError::QueueFull { pending: 2, limit: 2 }));

        // Plain schedule is not capped.
        sim.schedule::<Tagged>(1);
        assert_eq!(sim.pending_count(), 3);
    }

    #[test]
    fn pending_warning_latches_and_rearms() {
        let config = SimConfig {
            pending_warn_threshold: Some(2),
            ..SimConfig::default()
        };
        let mut sim = Simulation::with_config(config);
        sim.schedule::<Tagged>(1);
        assert!(!sim.pending_warned);
        sim.schedule::<Tagged>(1);
        assert!(sim.pending_warned);

        sim.advance(1);
        assert!(!sim.pending_warned);
    }

    // -----------------------------------------------------------------------
    // Models and session control
    // -----------------------------------------------------------------------

    #[test]
    fn simulations_do_not_share_models() {
        let mut a = Simulation::new();
        let mut b = Simulation::new();
        a.model::<Counters>().executed = 3;
        assert_eq!(b.model::<Counters>().executed, 0);
    }

    #[test]
    fn with_models_uses_seeded_registry() {
        let mut models = ModelRegistry::new();
        models.insert(Health { current: 1, max: 2 });
        let sim = Simulation::with_models(SimConfig::default(), models);
        assert_eq!(sim.peek_model::<Health>().map(|h| h.current), Some(1));
    }

    #[test]
    fn clear_pending_cleans_up_without_firing() {
        let probe = Rc::new(Cell::new(0));
        let mut sim = Simulation::new();
        for _ in 0..3 {
            let event = sim.schedule::<Gated>(5);
            event.open = true;
            event.probe = Some(probe.clone());
        }

        assert_eq!(sim.clear_pending(), 3);
        assert_eq!(probe.get(), 3);
        assert_eq!(sim.pending_count(), 0);
        assert_eq!(sim.pool_stats::<Gated>().idle, 3);

        sim.advance(10);
        assert!(sim.peek_model::<Counters>().is_none());
    }

    #[test]
    fn reset_restores_start_tick_and_drops_models() {
        let mut sim = Simulation::from_config_json(r#"{ "start_tick": 100 }"#).unwrap();
        assert_eq!(sim.now(), 100);
        sim.schedule::<Tagged>(1).tag = 'r';
        sim.advance(150);
        sim.schedule::<Tagged>(1);

        sim.reset();
        assert_eq!(sim.now(), 100);
        assert_eq!(sim.pending_count(), 0);
        assert!(sim.models().is_empty());
        // Pooled instances survive a reset.
        assert_eq!(sim.pool_stats::<Tagged>().idle, 1);
    }

    #[test]
    fn from_config_json_rejects_invalid_config() {
        let err = Simulation::from_config_json(r#"{ "max_pending": 0 }"#).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }
}
