//! Binding storage.

use std::any::{type_name, Any};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::DuplicatePolicy;
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::provider::Provider;

#[cfg(feature = "ahash")]
type IndexMap = ahash::AHashMap<Key, usize>;
#[cfg(not(feature = "ahash"))]
type IndexMap = std::collections::HashMap<Key, usize>;

// Type-erased handle for storage. The payload is always an `Rc<I>` for the
// key it was stored under, which keeps unsized interfaces storable.
pub(crate) type AnyRc = Rc<dyn Any>;

/// Erases a shared handle for storage.
#[inline]
pub(crate) fn erase<T: ?Sized + 'static>(value: Rc<T>) -> AnyRc {
    Rc::new(value)
}

/// Recovers the shared handle stored by [`erase`].
#[inline]
pub(crate) fn downcast<T: ?Sized + 'static>(value: &AnyRc) -> DiResult<Rc<T>> {
    value
        .downcast_ref::<Rc<T>>()
        .cloned()
        .ok_or(DiError::TypeMismatch(type_name::<T>()))
}

/// One registered binding: interface key plus the provider producing it.
pub(crate) struct Binding {
    pub(crate) key: Key,
    pub(crate) provider: Box<dyn Provider>,
}

/// Outcome of a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    /// Key is new
    Insert,
    /// Key exists and the new binding replaces the old one
    Replace(usize),
    /// Key exists and the new binding is dropped
    Ignore,
}

/// Ordered bindings plus a key index.
///
/// Used both as the resolver's root table and as the per-scope cache.
#[derive(Default)]
pub(crate) struct Registry {
    bindings: Vec<Binding>,
    index: IndexMap,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Decides what registering `key` would do under `policy`, without
    /// changing anything.
    pub(crate) fn admit(&self, key: &Key, policy: DuplicatePolicy) -> DiResult<Admission> {
        match (self.index.get(key), policy) {
            (None, _) => Ok(Admission::Insert),
            (Some(_), DuplicatePolicy::KeepFirst) => Ok(Admission::Ignore),
            (Some(&pos), DuplicatePolicy::Replace) => Ok(Admission::Replace(pos)),
            (Some(_), DuplicatePolicy::Reject) => Err(DiError::AlreadyBound(key.display_name())),
        }
    }

    /// Registers `provider` under `key` according to `policy`.
    ///
    /// Returns `true` when the provider became reachable.
    pub(crate) fn insert(
        &mut self,
        key: Key,
        provider: Box<dyn Provider>,
        policy: DuplicatePolicy,
    ) -> DiResult<bool> {
        match self.admit(&key, policy)? {
            Admission::Insert => {
                debug!(key = %key, lifetime = %provider.lifetime(), "binding registered");
                self.index.insert(key, self.bindings.len());
                self.bindings.push(Binding { key, provider });
                Ok(true)
            }
            Admission::Replace(pos) => {
                debug!(key = %key, lifetime = %provider.lifetime(), "binding replaced");
                self.bindings[pos] = Binding { key, provider };
                Ok(true)
            }
            Admission::Ignore => {
                warn!(key = %key, "ignoring duplicate binding, first registration wins");
                Ok(false)
            }
        }
    }

    /// First-wins insert; never fails.
    pub(crate) fn insert_first(&mut self, key: Key, provider: Box<dyn Provider>) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.bindings.len());
        self.bindings.push(Binding { key, provider });
        true
    }

    #[inline]
    pub(crate) fn lookup(&self, key: &Key) -> Option<&dyn Provider> {
        self.index
            .get(key)
            .map(|&pos| self.bindings[pos].provider.as_ref())
    }

    #[inline]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.index.contains_key(key)
    }

    /// Number of reachable bindings.
    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Bindings in registration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }
}
