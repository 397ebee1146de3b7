// deferred_sim_demo — a small combat arena built on `deferred_sim`.
//
// Two or more fighters trade blows until one is left standing. There is no
// per-frame update anywhere: every action is an event, and recurring
// behavior (AI decisions, stamina regeneration) is an event that schedules
// its own next instance.
//
// Module overview:
// - `models.rs`:  `Roster` (actor vitals by `ActorId`) and `Chronicle` (the
//                 tick-stamped narrative log).
// - `events.rs`:  `Reassess`, `Attack`, `RegenStamina`, `Defeated`,
//                 `Announce`.
// - `rules.rs`:   `ArenaRules` / `ArenaConfig`, JSON-loadable tuning and
//                 lineup.
// - `session.rs`: `Arena`, which seeds a `Simulation` and steps it until
//                 settled.
//
// The `arena` binary (`main.rs`) wraps `Arena` with a CLI and
// `tracing-subscriber` output.

pub mod events;
pub mod models;
pub mod rules;
pub mod session;

pub use rules::{ArenaConfig, ArenaRules, FighterSpec};
pub use session::{Arena, ArenaSummary};
