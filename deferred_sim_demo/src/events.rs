// The arena's event kinds.
//
// Each one is a small payload plus the three hooks. None of them calls
// behavior directly on another; they communicate through the `Roster` and
// `Chronicle` models and by scheduling each other:
//
//   Reassess ──(stamina ≥ cost)──▶ Attack ──(target hp 0)──▶ Defeated
//      │ ▲                           │
//      └─┘ every interval            └──▶ RegenStamina ─┐
//                                                ▲      │ until full
//                                                └──────┘
//
// `Reassess` and `RegenStamina` are the self-rescheduling ones. Both stop by
// simply not scheduling the next instance: regen when stamina is full,
// reassessment when there is nobody left to fight. A dead or removed actor
// is caught by the precondition of whatever was still pending for it.

use crate::models::{ActorId, Chronicle, Roster};
use crate::rules::ArenaRules;
use deferred_sim::{Event, Simulation, Tick};

/// Start a stamina regen chain for `actor` unless one is already running or
/// the actor is already full.
pub fn start_regen(sim: &mut Simulation, actor: ActorId) {
    let rules = *sim.model::<ArenaRules>();
    let Some(a) = sim.model::<Roster>().get_mut(actor) else {
        return;
    };
    if a.regen_active || a.stamina >= a.max_stamina {
        return;
    }
    a.regen_active = true;

    let interval = rules.regen_interval.max(1);
    let regen = sim.schedule::<RegenStamina>(interval);
    regen.actor = actor;
    regen.amount = rules.regen_amount;
    regen.interval = interval;
}

fn is_living(sim: &Simulation, actor: ActorId) -> bool {
    sim.peek_model::<Roster>()
        .is_some_and(|roster| roster.living(actor).is_some())
}

// ---------------------------------------------------------------------------
// RegenStamina
// ---------------------------------------------------------------------------

/// Restores `amount` stamina every `interval` ticks until full.
#[derive(Debug, Default)]
pub struct RegenStamina {
    pub actor: ActorId,
    pub amount: u32,
    pub interval: Tick,
}

impl Event for RegenStamina {
    fn precondition(&self, sim: &Simulation) -> bool {
        is_living(sim, self.actor)
    }

    fn execute(&mut self, sim: &mut Simulation) {
        let Some(actor) = sim.model::<Roster>().get_mut(self.actor) else {
            return;
        };
        actor.stamina = (actor.stamina + self.amount).min(actor.max_stamina);
        if actor.stamina >= actor.max_stamina {
            actor.regen_active = false;
            return;
        }

        let next = sim.schedule::<RegenStamina>(self.interval.max(1));
        next.actor = self.actor;
        next.amount = self.amount;
        next.interval = self.interval;
    }
}

// ---------------------------------------------------------------------------
// Attack
// ---------------------------------------------------------------------------

/// One swing. Costs the attacker stamina and the target hp.
#[derive(Debug, Default)]
pub struct Attack {
    pub attacker: ActorId,
    pub target: ActorId,
    pub damage: u32,
    pub cost: u32,
}

impl Event for Attack {
    fn precondition(&self, sim: &Simulation) -> bool {
        let Some(roster) = sim.peek_model::<Roster>() else {
            return false;
        };
        let attacker_ready = roster
            .living(self.attacker)
            .is_some_and(|a| a.stamina >= self.cost);
        attacker_ready && roster.living(self.target).is_some()
    }

    fn execute(&mut self, sim: &mut Simulation) {
        let now = sim.now();
        let roster = sim.model::<Roster>();

        let Some(attacker) = roster.get_mut(self.attacker) else {
            return;
        };
        attacker.stamina = attacker.stamina.saturating_sub(self.cost);
        let attacker_name = attacker.name.clone();

        let Some(target) = roster.get_mut(self.target) else {
            return;
        };
        target.hp = target.hp.saturating_sub(self.damage);
        let target_name = target.name.clone();
        let hp_left = target.hp;

        sim.model::<Chronicle>().record(
            now,
            format!(
                "{attacker_name} hits {target_name} for {} ({hp_left} hp left)",
                self.damage
            ),
        );

        if hp_left == 0 {
            sim.schedule::<Defeated>(0).actor = self.target;
        }
        start_regen(sim, self.attacker);
    }
}

// ---------------------------------------------------------------------------
// Reassess
// ---------------------------------------------------------------------------

/// Periodic AI decision for one actor: attack if able, then look again
/// after `ArenaRules::reassess_interval`.
#[derive(Debug, Default)]
pub struct Reassess {
    pub agent: ActorId,
}

impl Event for Reassess {
    fn precondition(&self, sim: &Simulation) -> bool {
        is_living(sim, self.agent)
    }

    fn execute(&mut self, sim: &mut Simulation) {
        let rules = *sim.model::<ArenaRules>();
        let roster = sim.model::<Roster>();

        let Some(target) = roster.first_opponent(self.agent) else {
            let name = roster
                .get(self.agent)
                .map(|a| a.name.clone())
                .unwrap_or_default();
            let announce = sim.schedule::<Announce>(0);
            announce.text.clear();
            announce.text.push_str(&name);
            announce.text.push_str(" stands alone");
            return;
        };
        let stamina = roster.get(self.agent).map_or(0, |a| a.stamina);

        if stamina >= rules.attack_cost {
            let attack = sim.schedule::<Attack>(0);
            attack.attacker = self.agent;
            attack.target = target;
            attack.damage = rules.attack_damage;
            attack.cost = rules.attack_cost;
        }

        sim.schedule::<Reassess>(rules.reassess_interval.max(1)).agent = self.agent;
    }
}

// ---------------------------------------------------------------------------
// Defeated
// ---------------------------------------------------------------------------

/// Takes a dead actor off the roster. Anything still pending for it fails
/// its precondition from then on.
#[derive(Debug, Default)]
pub struct Defeated {
    pub actor: ActorId,
}

impl Event for Defeated {
    fn precondition(&self, sim: &Simulation) -> bool {
        sim.peek_model::<Roster>()
            .and_then(|roster| roster.get(self.actor))
            .is_some_and(|a| !a.is_alive())
    }

    fn execute(&mut self, sim: &mut Simulation) {
        let now = sim.now();
        if let Some(actor) = sim.model::<Roster>().remove(self.actor) {
            tracing::info!(actor = %self.actor, name = %actor.name, now, "actor defeated");
            sim.model::<Chronicle>()
                .record(now, format!("{} is defeated", actor.name));
        }
    }
}

// ---------------------------------------------------------------------------
// Announce
// ---------------------------------------------------------------------------

/// A chronicle line posted on the next tick. Keeps its `String` buffer
/// across pool reuse.
#[derive(Debug, Default)]
pub struct Announce {
    pub text: String,
}

impl Event for Announce {
    fn precondition(&self, _sim: &Simulation) -> bool {
        !self.text.is_empty()
    }

    fn execute(&mut self, sim: &mut Simulation) {
        let now = sim.now();
        sim.model::<Chronicle>().record(now, self.text.as_str());
    }

    fn cleanup(&mut self) {
        self.text.clear();
    }
}
