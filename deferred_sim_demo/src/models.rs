// Shared state the arena events read and mutate.
//
// Two models live in the simulation's registry:
// - `Roster`: every actor's vitals, keyed by `ActorId`. `BTreeMap` so that
//   iteration (target selection, summaries) is deterministic.
// - `Chronicle`: the narrative log, one line per notable event, stamped with
//   the tick it happened on.
//
// Events hold `ActorId`s, never references into the roster. An id whose
// actor has died or been removed is the "stale reference" case that the
// events' preconditions screen out.

use deferred_sim::Tick;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One combatant's vitals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub hp: u32,
    pub stamina: u32,
    pub max_stamina: u32,
    /// True while a `RegenStamina` chain is pending for this actor, so
    /// spending stamina does not start a second chain.
    pub regen_active: bool,
}

impl Actor {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

#[derive(Debug, Default)]
pub struct Roster {
    actors: BTreeMap<ActorId, Actor>,
    next_id: u32,
}

impl Roster {
    /// Add an actor at full stamina and return its id.
    pub fn spawn(&mut self, name: &str, hp: u32, max_stamina: u32) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        self.actors.insert(
            id,
            Actor {
                name: name.to_owned(),
                hp,
                stamina: max_stamina,
                max_stamina,
                regen_active: false,
            },
        );
        id
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// `Some(actor)` only if the actor exists and is alive.
    pub fn living(&self, id: ActorId) -> Option<&Actor> {
        self.get(id).filter(|a| a.is_alive())
    }

    /// First living actor other than `of`, in id order.
    pub fn first_opponent(&self, of: ActorId) -> Option<ActorId> {
        self.actors
            .iter()
            .find(|(id, actor)| **id != of && actor.is_alive())
            .map(|(id, _)| *id)
    }

    pub fn remove(&mut self, id: ActorId) -> Option<Actor> {
        self.actors.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActorId, &Actor)> {
        self.actors.iter().map(|(id, actor)| (*id, actor))
    }

    pub fn living_count(&self) -> usize {
        self.actors.values().filter(|a| a.is_alive()).count()
    }
}

/// A tick-stamped narrative line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChronicleEntry {
    pub tick: Tick,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct Chronicle {
    pub entries: Vec<ChronicleEntry>,
}

impl Chronicle {
    pub fn record(&mut self, tick: Tick, text: impl Into<String>) {
        self.entries.push(ChronicleEntry {
            tick,
            text: text.into(),
        });
    }
}
