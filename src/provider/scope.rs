//! Scoped instance storage.
//!
//! A `Scope` is a registry of its own: every scoped instance built while the
//! scope is passed to a resolution call is stored in it as a singleton binding
//! keyed by the implementation type. Dropping the scope drops its instances.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::key::Key;
use crate::registration::{AnyRc, Registry};

use super::SingletonProvider;

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// Cache for scoped instances.
///
/// Scoped bindings resolve to one instance per scope: two requests made with
/// the same scope share the instance, requests made with different scopes do
/// not.
///
/// # Examples
///
/// ```
/// use ferrous_resolver::{Constructor, Lifetime, Resolver};
/// use std::rc::Rc;
///
/// struct RequestContext { id: u32 }
///
/// let mut resolver = Resolver::new();
/// resolver
///     .bind_factory::<RequestContext, _>(
///         Lifetime::Scoped,
///         Constructor::from_fn(|()| Ok(RequestContext { id: 1 })),
///     )
///     .unwrap();
///
/// let mut scope = resolver.make_scope();
/// let a = resolver.get_in::<RequestContext>(&mut scope).unwrap();
/// let b = resolver.get_in::<RequestContext>(&mut scope).unwrap();
/// assert!(Rc::ptr_eq(&a, &b));
///
/// let mut other = resolver.make_scope();
/// let c = resolver.get_in::<RequestContext>(&mut other).unwrap();
/// assert!(!Rc::ptr_eq(&a, &c));
/// assert_eq!(c.id, 1);
/// ```
pub struct Scope {
    id: u64,
    cache: Registry,
}

impl Scope {
    /// Creates an empty scope.
    pub fn new() -> Self {
        let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);
        trace!(scope = id, "scope created");
        Self {
            id,
            cache: Registry::new(),
        }
    }

    /// Process-unique identifier, used in log output.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Number of instances cached in this scope.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Whether an instance of implementation type `T` has been built in this scope.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.cache.contains_key(&Key::of::<T>())
    }

    pub(crate) fn cached(&self, key: &Key) -> Option<AnyRc> {
        self.cache
            .lookup(key)
            .and_then(|provider| provider.instance().cloned())
    }

    pub(crate) fn cache(&mut self, key: Key, value: AnyRc) {
        self.cache
            .insert_first(key, Box::new(SingletonProvider::new(key, value)));
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        trace!(scope = self.id, instances = self.cache.len(), "scope dropped");
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.id)
            .field("len", &self.cache.len())
            .finish()
    }
}
