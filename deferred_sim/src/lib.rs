// deferred_sim — a pooled, precondition-gated discrete-event scheduler.
//
// Game code never calls behavior directly. It schedules a typed event with a
// delay, fills in the returned handle, and lets the host loop's
// `Simulation::advance(now)` fire it later. Each event passes a precondition
// evaluated at fire time, executes, and is cleaned up and recycled into a
// per-type pool. Events may reschedule themselves, which is how periodic
// behavior (regeneration, AI reassessment) runs without per-frame polling.
//
// Module overview:
// - `sim.rs`:    `Simulation` façade: clock, schedule/advance, models, telemetry.
// - `event.rs`:  The `Event` trait (precondition / execute / cleanup) and its
//                type-erased adapter.
// - `queue.rs`:  `EventQueue`, a slab-backed min-heap ordered by
//                `(fire_tick, sequence)`.
// - `pool.rs`:   Per-kind free lists of event instances.
// - `model.rs`:  `ModelRegistry`, a type map of shared singleton state.
// - `config.rs`: `SimConfig`, JSON-loadable tunables (backpressure, pool cap).
// - `error.rs`:  `SimError` for config loading and the pending cap.
// - `types.rs`:  `Tick` and `EventKind`.
//
// Concrete event payloads and the models they mutate belong to the caller;
// `deferred_sim_demo` has a worked set.
//
// **Critical constraint: determinism.** No wall-clock time, no OS entropy,
// no iteration over hash maps in any order-sensitive path. Given the same
// schedule calls and the same `advance` sequence, events fire in the same
// order every run.

pub mod config;
pub mod error;
pub mod event;
pub mod model;
mod pool;
pub mod queue;
pub mod sim;
pub mod types;

pub use config::SimConfig;
pub use error::{Result, SimError};
pub use event::Event;
pub use model::ModelRegistry;
pub use pool::PoolStats;
pub use sim::{AdvanceReport, Simulation};
pub use types::{EventKind, Tick};
