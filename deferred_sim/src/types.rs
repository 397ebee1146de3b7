// Core types shared across the scheduler.
//
// Defines the simulation clock unit (`Tick`) and `EventKind`, the runtime
// identity of a concrete event type. `EventKind` is what the pool keys its
// free lists on and what log lines carry as the `kind` field.
//
// **Critical constraint: determinism.** Time is an integer tick count. The
// scheduler never reads wall-clock time; the driver decides what "now" is.

use std::any::TypeId;
use std::fmt;

/// Simulation time unit. Fire times and delays are both expressed in ticks.
pub type Tick = u64;

/// Identity of a concrete event type.
///
/// Equality and hashing use only the `TypeId`; the name is carried for
/// logging and debugging.
#[derive(Clone, Copy, Debug)]
pub struct EventKind {
    id: TypeId,
    name: &'static str,
}

impl EventKind {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name(std::any::type_name::<T>()),
        }
    }

    pub fn id(self) -> TypeId {
        self.id
    }

    /// Unqualified type name, e.g. `RegenStamina`.
    pub fn name(self) -> &'static str {
        self.name
    }
}

impl PartialEq for EventKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventKind {}

impl std::hash::Hash for EventKind {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Strip the module path from a `type_name` string. Generic parameters are
/// left alone: `a::b::Foo<c::Bar>` becomes `Foo<c::Bar>`.
fn short_type_name(full: &'static str) -> &'static str {
    let head_end = full.find('<').unwrap_or(full.len());
    match full[..head_end].rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}
