// Arena tunables, loaded from JSON like `SimConfig`.
//
// `ArenaRules` is the per-tick combat tuning the events read at fire time.
// It is stored in the simulation as a model, so a hook reads it with
// `sim.model::<ArenaRules>()` the same way it reads the roster. `ArenaConfig`
// wraps the rules plus the starting lineup.

use deferred_sim::{Result, SimError, Tick};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaRules {
    /// Stamina spent per attack; an actor below this cannot swing.
    pub attack_cost: u32,
    pub attack_damage: u32,
    /// Stamina restored per regen tick.
    pub regen_amount: u32,
    /// Ticks between regen steps. Zero is treated as 1.
    pub regen_interval: Tick,
    /// Ticks between AI decisions. Zero is treated as 1.
    pub reassess_interval: Tick,
}

impl Default for ArenaRules {
    fn default() -> Self {
        Self {
            attack_cost: 3,
            attack_damage: 4,
            regen_amount: 1,
            regen_interval: 2,
            reassess_interval: 3,
        }
    }
}

/// One combatant in the starting lineup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FighterSpec {
    pub name: String,
    pub hp: u32,
    pub max_stamina: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub rules: ArenaRules,
    pub fighters: Vec<FighterSpec>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            rules: ArenaRules::default(),
            fighters: vec![
                FighterSpec {
                    name: "Ash".into(),
                    hp: 12,
                    max_stamina: 10,
                },
                FighterSpec {
                    name: "Birch".into(),
                    hp: 10,
                    max_stamina: 8,
                },
            ],
        }
    }
}

impl ArenaConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fighters.len() < 2 {
            return Err(SimError::Config(format!(
                "arena needs at least two fighters, got {}",
                self.fighters.len()
            )));
        }
        if let Some(f) = self.fighters.iter().find(|f| f.hp == 0) {
            return Err(SimError::Config(format!("fighter {:?} starts with 0 hp", f.name)));
        }
        if self.rules.attack_cost == 0 {
            return Err(SimError::Config("attack_cost must be positive".into()));
        }
        // Any one of these would keep a bout from ever settling.
        if self.rules.attack_damage == 0 {
            return Err(SimError::Config("attack_damage must be positive".into()));
        }
        if self.rules.regen_amount == 0 {
            return Err(SimError::Config("regen_amount must be positive".into()));
        }
        let cost = self.rules.attack_cost;
        if let Some(f) = self.fighters.iter().find(|f| f.max_stamina < cost) {
            return Err(SimError::Config(format!(
                "fighter {:?} has max_stamina {} below attack_cost {cost}",
                f.name, f.max_stamina
            )));
        }
        Ok(())
    }
}
