//! Typed per-compilation extension storage.
//!
//! Plugins that need to share state across hooks within one build attach it
//! here, keyed by its Rust type. This is the sanctioned replacement for
//! stuffing ad hoc fields onto a host-owned object: a slot is either present
//! with the exact type a component asked for, or absent.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// Type-keyed storage for plugin state scoped to one compilation.
///
/// One slot per type. Values are `Arc`ed so the owning compilation and any
/// number of hooks can hold the same instance; dropping the compilation
/// drops the state with it.
#[derive(Default)]
pub struct Extensions {
    slots: RwLock<FxHashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `value` in the slot for `T`, returning the previous value if
    /// one was present.
    pub fn insert<T: Any + Send + Sync>(&self, value: Arc<T>) -> Option<Arc<T>> {
        self.slots
            .write()
            .insert(TypeId::of::<T>(), value)
            .and_then(|previous| previous.downcast::<T>().ok())
    }

    /// Fetch the slot for `T`.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.slots
            .read()
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|value| value.downcast::<T>().ok())
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.slots.read().contains_key(&TypeId::of::<T>())
    }
}

impl std::fmt::Debug for Extensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extensions")
            .field("slots", &self.slots.read().len())
            .finish()
    }
}
