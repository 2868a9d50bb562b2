use crate::fixture::registry::FixtureRegistry;
use std::sync::{Arc, PoisonError, RwLock};

/// Registry shared between threads.
///
/// Changes are serialized through the write lock; readers share the read
/// lock and never see a registry in the middle of a change.
#[derive(Clone)]
pub struct SharedRegistry {
    registry: Arc<RwLock<FixtureRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: FixtureRegistry) -> SharedRegistry {
        SharedRegistry {
            registry: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn read<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&FixtureRegistry) -> R,
    {
        // A panicking reader or writer cannot leave a change half done
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        f(&registry)
    }

    pub fn modify<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut FixtureRegistry) -> R,
    {
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut registry)
    }
}

impl From<FixtureRegistry> for SharedRegistry {
    fn from(registry: FixtureRegistry) -> Self {
        SharedRegistry::new(registry)
    }
}
