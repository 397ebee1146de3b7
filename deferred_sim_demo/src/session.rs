// A headless arena session: builds a `Simulation`, seeds it with fighters,
// and drives it one tick at a time until nothing is left to do.
//
// Setup is the only place behavior is kicked off from outside an event. For
// each fighter `Arena::new` spawns a roster entry, starts a stamina regen
// chain if the fighter begins below max, and schedules its first `Reassess`.
// Each fighter's first `Reassess` is one tick later than the previous one's,
// so the fighters do not always act in lockstep. From there on everything
// happens through events scheduling events.
//
// A session is "settled" when the queue is empty. For a config that passes
// `ArenaConfig::validate` that always happens eventually: the last fighter
// standing stops reassessing, and regen chains stop at full stamina.

use crate::events::{Reassess, start_regen};
use crate::models::{Chronicle, ChronicleEntry, Roster};
use crate::rules::ArenaConfig;
use deferred_sim::{AdvanceReport, ModelRegistry, SimConfig, Simulation, Tick};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Outcome of `Arena::run`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaSummary {
    pub ticks_run: Tick,
    pub fired: usize,
    pub discarded: usize,
    /// Events still queued when the run stopped. Zero if it settled.
    pub pending: usize,
    pub survivors: Vec<String>,
    pub chronicle: Vec<ChronicleEntry>,
}

pub struct Arena {
    sim: Simulation,
}

impl Arena {
    /// Build a session. `starting_stamina`, if set, overrides every
    /// fighter's initial stamina (clamped to their max).
    pub fn new(
        sim_config: SimConfig,
        config: &ArenaConfig,
        starting_stamina: Option<u32>,
    ) -> Self {
        let mut models = ModelRegistry::new();
        models.insert(config.rules);
        let mut sim = Simulation::with_models(sim_config, models);

        let mut fighters = Vec::with_capacity(config.fighters.len());
        for spec in &config.fighters {
            let roster = sim.model::<Roster>();
            let id = roster.spawn(&spec.name, spec.hp, spec.max_stamina);
            if let (Some(stamina), Some(actor)) = (starting_stamina, roster.get_mut(id)) {
                actor.stamina = stamina.min(actor.max_stamina);
            }
            fighters.push(id);
        }

        for (offset, &id) in fighters.iter().enumerate() {
            start_regen(&mut sim, id);
            sim.schedule::<Reassess>(1 + offset as Tick).agent = id;
        }

        let now = sim.now();
        sim.model::<Chronicle>().record(now, "The bout begins");
        info!(
            fighters = fighters.len(),
            pending = sim.pending_count(),
            "arena ready"
        );

        Self { sim }
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    pub fn is_settled(&self) -> bool {
        self.sim.pending_count() == 0
    }

    /// Advance the clock by one tick.
    pub fn step(&mut self) -> AdvanceReport {
        self.sim.advance_by(1)
    }

    /// Step until settled or until `max_ticks` ticks have run.
    pub fn run(&mut self, max_ticks: Tick) -> ArenaSummary {
        let mut ticks_run = 0;
        let mut fired = 0;
        let mut discarded = 0;

        while ticks_run < max_ticks && !self.is_settled() {
            let report = self.step();
            fired += report.fired;
            discarded += report.discarded;
            ticks_run += 1;
        }

        let pending = self.sim.pending_count();
        if pending == 0 {
            info!(ticks_run, fired, discarded, "arena settled");
        } else {
            info!(ticks_run, pending, "tick limit reached before arena settled");
        }

        ArenaSummary {
            ticks_run,
            fired,
            discarded,
            pending,
            survivors: self.survivors(),
            chronicle: self
                .sim
                .peek_model::<Chronicle>()
                .map(|c| c.entries.clone())
                .unwrap_or_default(),
        }
    }

    /// Names of living fighters, in id order.
    pub fn survivors(&self) -> Vec<String> {
        self.sim
            .peek_model::<Roster>()
            .map(|roster| {
                roster
                    .iter()
                    .filter(|(_, actor)| actor.is_alive())
                    .map(|(_, actor)| actor.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}
