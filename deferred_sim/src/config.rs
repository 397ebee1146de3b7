// Data-driven scheduler configuration.
//
// `SimConfig` holds the few tunables the scheduler has: where the clock
// starts, and how pending-queue growth and pool growth are policed. It is
// loaded from JSON (every field optional, missing fields take defaults) and
// validated before a `Simulation` is built from it.
//
// Backpressure policy: scheduling is unbounded unless `max_pending` is set.
// `pending_warn_threshold` only logs; `max_pending` is enforced by
// `Simulation::try_schedule`, while plain `schedule` stays infallible.
//
// See also: `sim.rs` which owns the `SimConfig`, `error.rs` for the
// validation errors.

use crate::error::{Result, SimError};
use crate::types::Tick;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level scheduler configuration. Loaded from JSON, never mutated at
/// runtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Clock value for a new simulation, and the value `reset()` restores.
    pub start_tick: Tick,

    /// Hard cap on pending events, enforced by `try_schedule`. `None` means
    /// unbounded.
    pub max_pending: Option<usize>,

    /// Pending count at which a warning is logged. The warning fires once
    /// per crossing and re-arms when the queue drains back below.
    pub pending_warn_threshold: Option<usize>,

    /// Maximum idle instances kept per event kind. Releases beyond this are
    /// dropped. `None` keeps everything.
    pub max_idle_per_kind: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_tick: 0,
            max_pending: None,
            pending_warn_threshold: Some(10_000),
            max_idle_per_kind: None,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check the config for internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.max_pending == Some(0) {
            return Err(SimError::Config(
                "max_pending must be at least 1 (use null for unbounded)".into(),
            ));
        }
        match (self.pending_warn_threshold, self.max_pending) {
            (Some(warn), Some(max)) if warn > max => Err(SimError::Config(format!(
                "pending_warn_threshold ({warn}) should be <= max_pending ({max})"
            ))),
            _ => Ok(()),
        }
    }
}
