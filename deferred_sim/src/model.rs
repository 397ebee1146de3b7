// Registry of shared model singletons, one per type.
//
// Models are the mutable state events act on (player stats, AI blackboards,
// wallet balances). The registry is a type map: `get_or_create::<M>()` builds
// `M::default()` on first request and returns the same instance on every
// later request until `reset()`.
//
// The registry is owned by a `Simulation` rather than living in a global, so
// two simulations (e.g. two tests running in parallel) never share state.
// There is no locking: the simulation is driven from one thread and hands
// out `&`/`&mut` borrows in the usual way.

use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};
use std::fmt;

/// Type-keyed store of model singletons.
#[derive(Default)]
pub struct ModelRegistry {
    models: FxHashMap<TypeId, Box<dyn Any>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The model of type `M`, created with `Default` if absent.
    pub fn get_or_create<M: Default + 'static>(&mut self) -> &mut M {
        let boxed = self.models.entry(TypeId::of::<M>()).or_insert_with(|| {
            tracing::trace!(model = std::any::type_name::<M>(), "model created");
            Box::new(M::default())
        });
        match boxed.as_mut().downcast_mut::<M>() {
            Some(model) => model,
            None => panic!(
                "model registry corrupted: entry for {} holds another type",
                std::any::type_name::<M>()
            ),
        }
    }

    /// The model of type `M`, if it has been created.
    pub fn get<M: 'static>(&self) -> Option<&M> {
        self.models
            .get(&TypeId::of::<M>())
            .and_then(|boxed| boxed.downcast_ref::<M>())
    }

    /// Mutable access to the model of type `M`, if it has been created.
    pub fn get_mut<M: 'static>(&mut self) -> Option<&mut M> {
        self.models
            .get_mut(&TypeId::of::<M>())
            .and_then(|boxed| boxed.downcast_mut::<M>())
    }

    /// Install a model, replacing any existing instance of the same type.
    /// Useful for seeding a model with non-default state before a run.
    pub fn insert<M: 'static>(&mut self, model: M) {
        self.models.insert(TypeId::of::<M>(), Box::new(model));
    }

    pub fn contains<M: 'static>(&self) -> bool {
        self.models.contains_key(&TypeId::of::<M>())
    }

    /// Number of distinct model types present.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Drop every model. The next request for each type starts fresh.
    pub fn reset(&mut self) {
        self.models.clear();
    }
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("len", &self.models.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Debug, PartialEq)]
    struct Wallet {
        coins: u32,
    }

    #[derive(Default)]
    struct Blackboard {
        alert: bool,
    }

    #[test]
    fn get_or_create_is_lazy_and_stable() {
        let mut registry = ModelRegistry::new();
        assert!(registry.get::<Wallet>().is_none());

        registry.get_or_create::<Wallet>().coins = 5;
        registry.get_or_create::<Wallet>().coins += 1;

        assert_eq!(registry.get::<Wallet>(), Some(&Wallet { coins: 6 }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn types_are_independent() {
        let mut registry = ModelRegistry::new();
        registry.get_or_create::<Wallet>().coins = 3;
        registry.get_or_create::<Blackboard>().alert = true;

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get::<Wallet>().map(|w| w.coins), Some(3));
        assert!(registry.get::<Blackboard>().is_some_and(|b| b.alert));
    }

    #[test]
    fn insert_replaces_existing() {
        let mut registry = ModelRegistry::new();
        registry.get_or_create::<Wallet>().coins = 1;
        registry.insert(Wallet { coins: 100 });

        assert_eq!(registry.get_or_create::<Wallet>().coins, 100);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn get_mut_does_not_create() {
        let mut registry = ModelRegistry::new();
        assert!(registry.get_mut::<Wallet>().is_none());
        assert!(!registry.contains::<Wallet>());

        registry.insert(Wallet::default());
        if let Some(wallet) = registry.get_mut::<Wallet>() {
            wallet.coins = 9;
        }
        assert_eq!(registry.get::<Wallet>().map(|w| w.coins), Some(9));
    }

    #[test]
    fn reset_clears_all_models() {
        let mut registry = ModelRegistry::new();
        registry.get_or_create::<Wallet>().coins = 7;
        registry.get_or_create::<Blackboard>();
        registry.reset();

        assert!(registry.is_empty());
        assert_eq!(registry.get_or_create::<Wallet>().coins, 0);
    }
}
